/// Player controller: move and bomb intents, damage, invincibility.
///
/// Intents are fire-and-forget. A rejected intent (wrong phase, mid-move,
/// blocked cell, bomb limit) is logged at debug level and otherwise ignored.
///
/// ## Damage
///   - ignored while invincible
///   - lives -1
///   - lives left → invincible for `invincibility_ms` (a running window is
///     replaced, not stacked)
///   - no lives left → invincibility is dropped; the phase check turns
///     this into GameOver

use crate::domain::cell::{Cell, PowerUpKind};
use crate::domain::entity::{Bomb, MoveDir};
use crate::domain::rules::{self, StepVerdict};
use crate::error::EngineResult;
use super::event::{DamageCause, GameEvent};
use super::phase;
use super::scheduler::TimerKind;
use super::world::{Phase, World};

// ══════════════════════════════════════════════════════════════
// Movement
// ══════════════════════════════════════════════════════════════

/// Try one cardinal step. Returns whether the move committed.
pub fn move_player(world: &mut World, dx: i32, dy: i32) -> EngineResult<bool> {
    if world.phase != Phase::Playing {
        log::debug!("move rejected: phase is {:?}", world.phase);
        return Ok(false);
    }
    if world.player.is_moving {
        log::debug!("move rejected: previous move still animating");
        return Ok(false);
    }
    let dir = match MoveDir::from_delta(dx, dy) {
        Some(d) => d,
        None => {
            log::debug!("move rejected: invalid delta ({dx}, {dy})");
            return Ok(false);
        }
    };

    let from = world.player.pos;
    let (target, power_up, enemy) = match rules::player_step(&world.view(), from, dir) {
        StepVerdict::Blocked => {
            log::debug!("move rejected: {dir:?} from ({}, {}) is blocked", from.row, from.col);
            return Ok(false);
        }
        StepVerdict::Open { target, power_up, enemy } => (target, power_up, enemy),
    };

    if let Some(id) = enemy {
        if !world.player.is_invincible {
            // Walking into an enemy hurts and the player stays put
            damage_player(world, DamageCause::Enemy(id));
            phase::evaluate(world);
            return Ok(false);
        }
    }

    if let Some(kind) = power_up {
        apply_power_up(world, kind);
        world.grid.set_cell(target.row, target.col, Cell::Empty)?;
        world.emit(GameEvent::PowerUpCollected { pos: target, kind });
    }

    world.player.pos = target;
    world.player.is_moving = true;
    world.player.visual_target = Some(world.grid.to_world_position(target.col, target.row));
    world.emit(GameEvent::PlayerMoved { from, to: target });

    phase::evaluate(world);
    Ok(true)
}

/// Renderer callback: the move animation finished. Idempotent.
pub fn on_movement_complete(world: &mut World) {
    world.player.is_moving = false;
    world.player.visual_target = None;
}

fn apply_power_up(world: &mut World, kind: PowerUpKind) {
    match kind {
        PowerUpKind::BombRange => world.player.bomb_range += 1,
        PowerUpKind::MaxBombs => world.player.max_bombs += 1,
    }
    log::debug!(
        "picked up {kind:?}: range {}, max bombs {}",
        world.player.bomb_range,
        world.player.max_bombs
    );
}

// ══════════════════════════════════════════════════════════════
// Bombs
// ══════════════════════════════════════════════════════════════

/// Drop a bomb on the player's cell. Returns whether one was placed.
pub fn place_bomb(world: &mut World) -> bool {
    if world.phase != Phase::Playing {
        log::debug!("bomb rejected: phase is {:?}", world.phase);
        return false;
    }
    if !rules::can_place_bomb(&world.view(), &world.player) {
        log::debug!("bomb rejected: limit reached or cell occupied");
        return false;
    }

    let id = world.next_bomb_id;
    world.next_bomb_id += 1;
    let pos = world.player.pos;
    let range = world.player.bomb_range;
    let fuse = world.config.bombs.fuse_ms;

    let timer = world.scheduler.schedule_in(fuse, TimerKind::BombFuse(id));
    world.fuse_timers.insert(id, timer);
    let fuse_deadline = world.scheduler.now().saturating_add(fuse);
    world.bombs.push(Bomb { id, pos, range, fuse_deadline });
    world.emit(GameEvent::BombPlaced { id, pos, range });
    true
}

// ══════════════════════════════════════════════════════════════
// Damage / invincibility
// ══════════════════════════════════════════════════════════════

/// Returns whether a life was lost.
pub fn damage_player(world: &mut World, cause: DamageCause) -> bool {
    if world.player.is_invincible || world.player.lives == 0 {
        return false;
    }

    world.player.lives -= 1;
    if let Some(timer) = world.invincibility_timer.take() {
        world.scheduler.cancel(timer);
    }

    if world.player.lives > 0 {
        world.player.is_invincible = true;
        let timer = world.scheduler.schedule_in(
            world.config.player.invincibility_ms,
            TimerKind::InvincibilityEnd,
        );
        world.invincibility_timer = Some(timer);
    } else {
        world.player.is_invincible = false;
    }

    log::debug!("player hit by {cause:?}, {} lives left", world.player.lives);
    world.emit(GameEvent::PlayerDamaged { lives: world.player.lives, cause });
    true
}

/// `InvincibilityEnd` timer handler.
pub fn end_invincibility(world: &mut World) {
    world.invincibility_timer = None;
    if world.player.is_invincible {
        world.player.is_invincible = false;
        world.emit(GameEvent::InvincibilityEnded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::{EnemyKind, Player};
    use crate::domain::grid::{Grid, GridPos};
    use crate::sim::world::Layout;

    fn p(row: usize, col: usize) -> GridPos {
        GridPos::new(row, col)
    }

    fn playing(rows: &[&str], enemies: Vec<(GridPos, EnemyKind)>) -> World {
        let mut w = World::with_layout(GameConfig::default().with_seed(1), Layout {
            grid: Grid::parse(rows, 1.0),
            player_spawn: p(1, 1),
            enemies,
        }).unwrap();
        w.phase = Phase::Playing;
        w
    }

    #[test]
    fn moves_are_ignored_outside_play() {
        let mut w = playing(&["=====", "=   =", "====="], vec![]);
        w.phase = Phase::Paused;
        assert!(!move_player(&mut w, 1, 0).unwrap());
        assert_eq!(w.player.pos, p(1, 1));
    }

    #[test]
    fn invalid_deltas_are_rejected() {
        let mut w = playing(&["=====", "=   =", "====="], vec![]);
        for (dx, dy) in [(0, 0), (1, 1), (2, 0), (-1, -1)] {
            assert!(!move_player(&mut w, dx, dy).unwrap());
        }
        assert_eq!(w.player.pos, p(1, 1));
    }

    #[test]
    fn move_locks_until_animation_completes() {
        let mut w = playing(&["=====", "=   =", "====="], vec![]);
        assert!(move_player(&mut w, 1, 0).unwrap());
        assert_eq!(w.player.pos, p(1, 2));
        assert!(w.player.visual_target.is_some());
        assert!(!move_player(&mut w, 1, 0).unwrap());
        on_movement_complete(&mut w);
        on_movement_complete(&mut w);
        assert!(move_player(&mut w, 1, 0).unwrap());
        assert_eq!(w.player.pos, p(1, 3));
    }

    #[test]
    fn power_up_pickup_raises_stat_and_clears_cell() {
        let mut w = playing(&["=====", "= RM=", "====="], vec![]);
        assert!(move_player(&mut w, 1, 0).unwrap());
        assert_eq!(w.player.bomb_range, 2);
        assert_eq!(w.grid.get(p(1, 2)), Some(Cell::Empty));
        on_movement_complete(&mut w);
        assert!(move_player(&mut w, 1, 0).unwrap());
        assert_eq!(w.player.max_bombs, 2);
    }

    #[test]
    fn walking_into_enemy_hurts_without_moving() {
        let mut w = playing(&["=====", "=   =", "====="], vec![(p(1, 2), EnemyKind::Stationary)]);
        assert!(!move_player(&mut w, 1, 0).unwrap());
        assert_eq!(w.player.pos, p(1, 1));
        assert_eq!(w.player.lives, 2);
        assert!(w.player.is_invincible);
    }

    #[test]
    fn rejected_moves_leave_player_untouched() {
        let mut w = playing(&["=====", "=   =", "====="], vec![(p(1, 2), EnemyKind::Stationary)]);
        let before = w.player.clone();
        assert!(!move_player(&mut w, 0, -1).unwrap()); // wall
        assert!(!move_player(&mut w, -1, 0).unwrap()); // wall
        assert_eq!(w.player, before);

        // Bumping the enemy costs a life, nothing else changes
        assert!(!move_player(&mut w, 1, 0).unwrap());
        let expected = Player { lives: before.lives - 1, is_invincible: true, ..before };
        assert_eq!(w.player, expected);
    }

    #[test]
    fn invincible_player_walks_through_enemy_cell() {
        let mut w = playing(&["=====", "=   =", "====="], vec![(p(1, 2), EnemyKind::Stationary)]);
        w.player.is_invincible = true;
        assert!(move_player(&mut w, 1, 0).unwrap());
        assert_eq!(w.player.pos, p(1, 2));
        assert_eq!(w.player.lives, 3);
    }

    #[test]
    fn bomb_limit_and_frozen_range() {
        let mut w = playing(&["=====", "=   =", "====="], vec![]);
        assert!(place_bomb(&mut w));
        assert!(!place_bomb(&mut w)); // max_bombs = 1
        w.player.bomb_range = 5;
        assert_eq!(w.bombs[0].range, 1);
        assert_eq!(w.bombs[0].fuse_deadline, 2000);
        assert!(w.fuse_timers.contains_key(&w.bombs[0].id));
    }

    #[test]
    fn huge_fuse_deadline_saturates() {
        let mut w = playing(&["=====", "=   =", "====="], vec![]);
        w.scheduler.advance_to(10);
        w.config.bombs.fuse_ms = u64::MAX;
        assert!(place_bomb(&mut w));
        let timer = w.fuse_timers[&w.bombs[0].id];
        assert_eq!(w.bombs[0].fuse_deadline, u64::MAX);
        assert_eq!(w.scheduler.deadline(timer), Some(u64::MAX));
    }

    #[test]
    fn damage_replaces_invincibility_window() {
        let mut w = playing(&["=====", "=   =", "====="], vec![]);
        assert!(damage_player(&mut w, DamageCause::Enemy(0)));
        let first = w.invincibility_timer.unwrap();
        assert!(!damage_player(&mut w, DamageCause::Enemy(0))); // invincible
        w.player.is_invincible = false;
        assert!(damage_player(&mut w, DamageCause::Enemy(0)));
        assert!(!w.scheduler.is_live(first));
        assert_eq!(w.scheduler.live_count(), 1);
    }

    #[test]
    fn last_life_drops_invincibility() {
        let mut w = playing(&["=====", "=   =", "====="], vec![]);
        w.player.lives = 1;
        assert!(damage_player(&mut w, DamageCause::Explosion(0)));
        assert_eq!(w.player.lives, 0);
        assert!(!w.player.is_invincible);
        assert_eq!(w.invincibility_timer, None);
    }
}
