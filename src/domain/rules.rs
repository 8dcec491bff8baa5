/// Movement and bomb-placement rules, truth-table driven.
///
/// Pure functions over an immutable arena view. No side effects.
/// These encode "what is legal" without performing the action.
///
/// Terrain = what the cell IS (grid). Occupancy = who is there (bombs,
/// enemies). Both are consulted, terrain first.
///
/// ## Player step
/// ┌──────────────────────────────┬────────────┬──────────────────┐
/// │ Condition (priority order)    │ Verdict    │ Notes            │
/// ├──────────────────────────────┼────────────┼──────────────────┤
/// │ Target out of bounds          │ Blocked    │ map edge         │
/// │ Target solid / destructible   │ Blocked    │                  │
/// │ Target holds a live bomb      │ Blocked    │                  │
/// │ Target holds an enemy         │ Open+enemy │ caller damages   │
/// │ Target is a power-up          │ Open+pickup│ never blocks     │
/// │ Otherwise                     │ Open       │                  │
/// └──────────────────────────────┴────────────┴──────────────────┘
///
/// ## Enemy step
/// ┌──────────────────────────────┬────────────┐
/// │ Condition                     │ Enter?     │
/// ├──────────────────────────────┼────────────┤
/// │ Out of bounds                 │ NO         │
/// │ Solid / destructible          │ NO         │
/// │ Live bomb                     │ NO         │
/// │ Another enemy                 │ NO         │
/// │ Player's cell                 │ YES (contact, no displacement) │
/// │ Otherwise                     │ YES        │
/// └──────────────────────────────┴────────────┘
///
/// ## Bomb placement
/// DENY if live bombs ≥ max_bombs, or a bomb already sits on the cell.

use super::cell::PowerUpKind;
use super::entity::{Bomb, Enemy, EnemyId, MoveDir, Player};
use super::grid::{Grid, GridPos};

/// Immutable view of terrain plus occupancy for rule queries.
pub struct ArenaView<'a> {
    pub grid: &'a Grid,
    pub bombs: &'a [Bomb],
    pub enemies: &'a [Enemy],
}

impl<'a> ArenaView<'a> {
    #[inline]
    pub fn bomb_at(&self, pos: GridPos) -> bool {
        self.bombs.iter().any(|b| b.pos == pos)
    }

    #[inline]
    pub fn enemy_at(&self, pos: GridPos) -> Option<EnemyId> {
        self.enemies.iter().find(|e| e.pos == pos).map(|e| e.id)
    }

    /// Terrain + bombs. Used by the pathfinder and enemy steps.
    #[inline]
    pub fn is_open(&self, pos: GridPos) -> bool {
        match self.grid.get(pos) {
            Some(cell) => cell.is_walkable() && !self.bomb_at(pos),
            None => false,
        }
    }
}

/// Outcome of evaluating a player step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StepVerdict {
    Blocked,
    Open {
        target: GridPos,
        power_up: Option<PowerUpKind>,
        enemy: Option<EnemyId>,
    },
}

/// Evaluate a player step. See truth table above.
pub fn player_step(view: &ArenaView, from: GridPos, dir: MoveDir) -> StepVerdict {
    let (dx, dy) = dir.delta();
    let target = match from.offset(dx, dy) {
        Some(t) => t,
        None => return StepVerdict::Blocked,
    };
    let cell = match view.grid.get(target) {
        Some(c) => c,
        None => return StepVerdict::Blocked,
    };
    if cell.is_blocking() { return StepVerdict::Blocked; }
    if view.bomb_at(target) { return StepVerdict::Blocked; }

    StepVerdict::Open {
        target,
        power_up: cell.power_up(),
        enemy: view.enemy_at(target),
    }
}

/// Can enemy `self_id` step onto `pos`? See truth table above.
pub fn enemy_can_enter(view: &ArenaView, pos: GridPos, self_id: EnemyId) -> bool {
    if !view.is_open(pos) { return false; }
    !view.enemies.iter().any(|e| e.id != self_id && e.pos == pos)
}

pub fn can_place_bomb(view: &ArenaView, player: &Player) -> bool {
    if view.bombs.len() as u32 >= player.max_bombs { return false; }
    !view.bomb_at(player.pos)
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════
