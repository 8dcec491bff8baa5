/// Events emitted by intents and timer firings.
/// The presentation and scoring layers consume these; the engine never
/// calls out to them directly.

use serde::Serialize;

use crate::domain::cell::PowerUpKind;
use crate::domain::entity::{BombId, EnemyId};
use crate::domain::grid::GridPos;
use super::world::Phase;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DamageCause {
    Explosion(BombId),
    Enemy(EnemyId),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    LevelComplete,
    GameOver,

    PlayerMoved { from: GridPos, to: GridPos },
    PowerUpCollected { pos: GridPos, kind: PowerUpKind },
    PlayerDamaged { lives: u32, cause: DamageCause },
    InvincibilityEnded,

    BombPlaced { id: BombId, pos: GridPos, range: u32 },
    BombExploded { id: BombId, pos: GridPos, cells: Vec<GridPos> },
    ChainScheduled { id: BombId, by: BombId },
    BlockDestroyed { pos: GridPos },
    PowerUpSpawned { pos: GridPos, kind: PowerUpKind },

    /// Fired exactly once per enemy; the score keeper counts these.
    EnemyDestroyed { id: EnemyId, pos: GridPos },
    EnemyMoved { id: EnemyId, from: GridPos, to: GridPos },
}
