/// Engine error type.
///
/// Only programming errors and I/O surface here. Rejected intents and stale
/// bomb/enemy ids are expected during play and never become errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// Grid indexed outside its dimensions. Callers must bounds-check first.
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Attempted to overwrite a solid block.
    #[error("cell ({row}, {col}) is a solid block and cannot be changed")]
    ImmutableWall { row: usize, col: usize },

    /// A fixed layout puts the player or an enemy on a block.
    #[error("spawn cell ({row}, {col}) is not walkable")]
    BlockedSpawn { row: usize, col: usize },

    /// A fixed layout puts two actors on the same spawn cell.
    #[error("spawn cell ({row}, {col}) is used twice")]
    SpawnOverlap { row: usize, col: usize },

    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
