/// Cell types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so cell semantics are centralized here.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// +1 blast range for bombs placed afterwards
    BombRange,
    /// +1 simultaneous live bomb
    MaxBombs,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    SolidBlock,        // Indestructible, stops blasts
    DestructibleBlock, // Absorbs a blast and is destroyed
    PowerUp(PowerUpKind),
}

impl Cell {
    /// Does this cell stop movement? Power-ups never block.
    pub fn is_blocking(self) -> bool {
        matches!(self, Cell::SolidBlock | Cell::DestructibleBlock)
    }

    pub fn is_solid(self) -> bool {
        matches!(self, Cell::SolidBlock)
    }

    pub fn is_destructible(self) -> bool {
        matches!(self, Cell::DestructibleBlock)
    }

    pub fn power_up(self) -> Option<PowerUpKind> {
        match self {
            Cell::PowerUp(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn is_walkable(self) -> bool {
        !self.is_blocking()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Empty
    }
}
