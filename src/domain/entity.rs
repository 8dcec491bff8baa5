/// Entities: Player, Enemy, Bomb, ExplosionEffect.
/// Positions are grid cells; occupancy lives here, never in the cell matrix.

use serde::{Deserialize, Serialize};

use super::grid::{GridPos, WorldPoint};

pub type BombId = u32;
pub type EnemyId = u32;
pub type EffectId = u32;

/// Movement direction of a single-cell step.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MoveDir {
    Left,
    Right,
    Up,
    Down,
}

impl MoveDir {
    /// Accepts exactly one non-zero component in {-1, 1}.
    pub fn from_delta(dx: i32, dy: i32) -> Option<MoveDir> {
        match (dx, dy) {
            (-1, 0) => Some(MoveDir::Left),
            (1, 0) => Some(MoveDir::Right),
            (0, -1) => Some(MoveDir::Up),
            (0, 1) => Some(MoveDir::Down),
            _ => None,
        }
    }

    pub fn delta(self) -> (i32, i32) {
        match self {
            MoveDir::Left => (-1, 0),
            MoveDir::Right => (1, 0),
            MoveDir::Up => (0, -1),
            MoveDir::Down => (0, 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: GridPos,
    pub lives: u32,
    pub bomb_range: u32,
    pub max_bombs: u32,
    pub is_invincible: bool,
    /// Mid-move lock: set when a move commits, cleared by the renderer.
    pub is_moving: bool,
    /// Where the renderer should animate toward while `is_moving`.
    pub visual_target: Option<WorldPoint>,
}

impl Player {
    pub fn new(pos: GridPos, lives: u32, bomb_range: u32, max_bombs: u32) -> Self {
        Player {
            pos,
            lives,
            bomb_range,
            max_bombs,
            is_invincible: false,
            is_moving: false,
            visual_target: None,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum EnemyKind {
    Normal,
    Fast,
    Chaser,
    Random,
    Stationary,
}

/// Behavior strategy. One tagged variant per movement style.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum MovePattern {
    Random,
    Follow,
    Stationary,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Normal,
        EnemyKind::Fast,
        EnemyKind::Chaser,
        EnemyKind::Random,
        EnemyKind::Stationary,
    ];

    /// (pattern, speed in steps per enemy tick)
    pub fn profile(self) -> (MovePattern, f32) {
        match self {
            EnemyKind::Normal => (MovePattern::Random, 1.0),
            EnemyKind::Fast => (MovePattern::Random, 2.0),
            EnemyKind::Chaser => (MovePattern::Follow, 1.0),
            EnemyKind::Random => (MovePattern::Random, 0.5),
            EnemyKind::Stationary => (MovePattern::Stationary, 0.0),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub pos: GridPos,
    pub kind: EnemyKind,
    pub pattern: MovePattern,
    pub speed: f32,
    /// Accumulated fractional steps; one behavior step per whole unit.
    pub move_budget: f32,
}

/// Most steps an enemy may take in a single tick.
pub const MAX_STEPS_PER_TICK: u32 = 2;

impl Enemy {
    pub fn new(id: EnemyId, pos: GridPos, kind: EnemyKind) -> Self {
        let (pattern, speed) = kind.profile();
        Enemy { id, pos, kind, pattern, speed, move_budget: 0.0 }
    }

    /// Add this tick's speed to the budget and return how many steps to take.
    pub fn take_steps(&mut self) -> u32 {
        if self.pattern == MovePattern::Stationary {
            self.move_budget = 0.0;
            return 0;
        }
        self.move_budget += self.speed;
        let mut steps = 0;
        while self.move_budget >= 1.0 && steps < MAX_STEPS_PER_TICK {
            self.move_budget -= 1.0;
            steps += 1;
        }
        // Don't bank more than one tick's worth
        self.move_budget = self.move_budget.min(1.0);
        steps
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bomb {
    pub id: BombId,
    pub pos: GridPos,
    /// Frozen at placement from the player's bomb range.
    pub range: u32,
    /// Clock time (ms) at which the fuse elapses.
    pub fuse_deadline: u64,
}

/// Purely visual blast marker; removed when the renderer reports it done.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplosionEffect {
    pub id: EffectId,
    pub pos: GridPos,
}
