/// The step function: advances the world clock by `dt_ms`.
///
/// Processing order:
///   1. Not `Playing` → nothing moves, the clock stays frozen
///   2. Deferred work from the previous turn (player blast checks),
///      reading the player's current position
///   3. Due timers in `(deadline, arming order)`, phase check after each
///   4. Clock settles at `now + dt_ms`
///
/// Firing stops the moment the phase leaves `Playing`; whatever is still
/// queued stays put until the next reset.

use crate::error::EngineResult;
use super::event::GameEvent;
use super::scheduler::{Deferred, TimerId, TimerKind};
use super::world::{Phase, World};
use super::{enemy, explosion, phase, player};

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

/// Run one scheduling turn and return every event raised since the last
/// drain.
pub fn advance(world: &mut World, dt_ms: u64) -> EngineResult<Vec<GameEvent>> {
    if world.phase != Phase::Playing {
        return Ok(world.drain_events());
    }

    run_deferred(world);

    let target = world.scheduler.now().saturating_add(dt_ms);
    while world.phase == Phase::Playing {
        let Some((id, kind)) = world.scheduler.pop_due(target) else { break };
        fire(world, id, kind)?;
        phase::evaluate(world);
    }

    if world.phase == Phase::Playing {
        world.scheduler.advance_to(target);
    }
    Ok(world.drain_events())
}

// ══════════════════════════════════════════════════════════════
// Deferred work
// ══════════════════════════════════════════════════════════════

fn run_deferred(world: &mut World) {
    while world.phase == Phase::Playing {
        let Some(work) = world.scheduler.pop_deferred() else { break };
        match work {
            Deferred::PlayerBlast { bomb, cells } => {
                explosion::resolve_player_blast(world, bomb, &cells);
            }
        }
        phase::evaluate(world);
    }
}

// ══════════════════════════════════════════════════════════════
// Timer dispatch
// ══════════════════════════════════════════════════════════════

fn fire(world: &mut World, id: TimerId, kind: TimerKind) -> EngineResult<()> {
    match kind {
        TimerKind::BombFuse(bomb) | TimerKind::ChainDetonation(bomb) => {
            explosion::detonate(world, bomb)?;
        }
        TimerKind::EnemyTick => {
            world.enemy_timer = None;
            enemy::tick_enemies(world);
            if world.phase == Phase::Playing {
                phase::arm_enemy_tick(world);
            }
        }
        TimerKind::InvincibilityEnd => {
            if world.invincibility_timer == Some(id) {
                player::end_invincibility(world);
            }
        }
    }
    Ok(())
}
