/// Enemy AI: one strategy per movement pattern.
///
/// Three modes, dispatched on `MovePattern`:
///   1. **Follow**: A* toward the player, take the first step.
///      No path → behave like Random for this step. Already on the
///      player's cell → stay.
///   2. **Random**: uniform pick among valid neighbours plus "stay".
///   3. **Stationary**: never moves.
///
/// The chosen target may be the player's cell; the caller turns that into
/// contact damage and leaves the enemy where it is.

use rand::Rng;

use super::entity::{Enemy, MovePattern};
use super::grid::GridPos;
use super::pathfind;
use super::rules::{self, ArenaView};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum EnemyMove {
    Stay,
    Step(GridPos),
}

pub fn choose_move<R: Rng + ?Sized>(
    view: &ArenaView,
    enemy: &Enemy,
    player: GridPos,
    rng: &mut R,
) -> EnemyMove {
    match enemy.pattern {
        MovePattern::Stationary => EnemyMove::Stay,
        MovePattern::Follow => follow_move(view, enemy, player, rng),
        MovePattern::Random => random_move(view, enemy, rng),
    }
}

// ── Follow mode ──

fn follow_move<R: Rng + ?Sized>(
    view: &ArenaView,
    enemy: &Enemy,
    player: GridPos,
    rng: &mut R,
) -> EnemyMove {
    if enemy.pos == player {
        return EnemyMove::Stay;
    }
    match pathfind::first_step(view, enemy.pos, player) {
        Some(next) if next == player => EnemyMove::Step(next),
        Some(next) if rules::enemy_can_enter(view, next, enemy.id) => EnemyMove::Step(next),
        // Path runs through another enemy: wait for it to clear
        Some(_) => EnemyMove::Stay,
        None => random_move(view, enemy, rng),
    }
}

// ── Random mode ──

/// Valid cardinal targets for `enemy`. "Stay" is implicit.
pub fn valid_steps(view: &ArenaView, enemy: &Enemy) -> Vec<GridPos> {
    view.grid
        .neighbors(enemy.pos)
        .filter(|&n| rules::enemy_can_enter(view, n, enemy.id))
        .collect()
}

fn random_move<R: Rng + ?Sized>(view: &ArenaView, enemy: &Enemy, rng: &mut R) -> EnemyMove {
    let steps = valid_steps(view, enemy);
    // One extra slot for "stay"
    let pick = rng.gen_range(0..=steps.len());
    match steps.get(pick) {
        Some(&target) => EnemyMove::Step(target),
        None => EnemyMove::Stay,
    }
}
