/// Explosion resolution.
///
/// ## Order inside one detonation
///   0. Bomb leaves the registry, its fuse timer is cancelled. Unknown id
///      (already exploded, or wiped by a reset) → nothing happens.
///   1. Rays are cast; destructible blocks reached become `Empty` and each
///      rolls for a power-up.
///   2. Enemies standing in any affected cell are destroyed.
///   3. Rolled power-ups land only in cells that are still `Empty`.
///   4. Player damage is *deferred* to the next scheduling turn with the
///      affected cells, so it checks wherever the player is by then.
///   5. Other live bombs inside the area that have not already exploded or
///      been queued get a chain timer (`chain_delay_ms`). The chained bomb
///      keeps its own range.
///
/// Steps 0–3 and 5 run back to back; nothing else touches the world
/// in between.

use rand::Rng;

use crate::domain::blast::blast_area;
use crate::domain::cell::{Cell, PowerUpKind};
use crate::domain::entity::{BombId, EffectId, ExplosionEffect};
use crate::domain::grid::GridPos;
use crate::error::EngineResult;
use super::event::{DamageCause, GameEvent};
use super::player;
use super::scheduler::{Deferred, TimerKind};
use super::world::World;

/// Detonate `bomb_id`. Returns false if there was no such live bomb.
pub fn detonate(world: &mut World, bomb_id: BombId) -> EngineResult<bool> {
    let idx = match world.bombs.iter().position(|b| b.id == bomb_id) {
        Some(i) => i,
        None => {
            log::debug!("bomb {bomb_id} already gone, ignoring detonation");
            return Ok(false);
        }
    };

    // (0) leave the registry
    let bomb = world.bombs.remove(idx);
    if let Some(timer) = world.fuse_timers.remove(&bomb_id) {
        world.scheduler.cancel(timer);
    }
    world.detonated.insert(bomb_id);

    // (1) rays + block destruction
    let area = blast_area(&world.grid, bomb.pos, bomb.range);
    let mut drops: Vec<(GridPos, PowerUpKind)> = Vec::new();
    for &pos in &area.destroyed_blocks {
        world.grid.set_cell(pos.row, pos.col, Cell::Empty)?;
        world.emit(GameEvent::BlockDestroyed { pos });
        if let Some(kind) = roll_power_up(world) {
            drops.push((pos, kind));
        }
    }

    // (2) enemies
    let (hit, survivors): (Vec<_>, Vec<_>) = std::mem::take(&mut world.enemies)
        .into_iter()
        .partition(|e| area.contains(e.pos));
    world.enemies = survivors;
    for enemy in hit {
        log::debug!("enemy {} ({:?}) destroyed by bomb {bomb_id}", enemy.id, enemy.kind);
        world.emit(GameEvent::EnemyDestroyed { id: enemy.id, pos: enemy.pos });
    }

    // (3) power-ups, never on top of anything
    for (pos, kind) in drops {
        if world.grid.get(pos) == Some(Cell::Empty) {
            world.grid.set_cell(pos.row, pos.col, Cell::PowerUp(kind))?;
            world.emit(GameEvent::PowerUpSpawned { pos, kind });
        }
    }

    // (4) player damage reads the position on the next turn
    world.scheduler.defer(Deferred::PlayerBlast { bomb: bomb_id, cells: area.cells.clone() });

    // (5) chain reactions
    let chained: Vec<BombId> = world.bombs.iter()
        .filter(|b| area.contains(b.pos) && !world.detonated.contains(&b.id))
        .map(|b| b.id)
        .collect();
    for other in chained {
        world.detonated.insert(other);
        if let Some(timer) = world.fuse_timers.remove(&other) {
            world.scheduler.cancel(timer);
        }
        let timer = world.scheduler.schedule_in(
            world.config.bombs.chain_delay_ms,
            TimerKind::ChainDetonation(other),
        );
        // The chain timer replaces the fuse, so the bomb reports its new deadline
        if let (Some(deadline), Some(b)) = (
            world.scheduler.deadline(timer),
            world.bombs.iter_mut().find(|b| b.id == other),
        ) {
            b.fuse_deadline = deadline;
        }
        log::debug!("bomb {other} chained by bomb {bomb_id}");
        world.emit(GameEvent::ChainScheduled { id: other, by: bomb_id });
    }

    for &pos in &area.cells {
        let id = world.next_effect_id;
        world.next_effect_id += 1;
        world.effects.push(ExplosionEffect { id, pos });
    }

    log::debug!(
        "bomb {bomb_id} exploded at ({}, {}) covering {} cells",
        bomb.pos.row,
        bomb.pos.col,
        area.cells.len()
    );
    world.emit(GameEvent::BombExploded { id: bomb_id, pos: bomb.pos, cells: area.cells });
    Ok(true)
}

/// Deferred half of a detonation: damage the player if they are standing
/// in the blast *now*.
pub fn resolve_player_blast(world: &mut World, bomb: BombId, cells: &[GridPos]) -> bool {
    if !cells.contains(&world.player.pos) {
        return false;
    }
    player::damage_player(world, DamageCause::Explosion(bomb))
}

/// Renderer callback: the visual for `id` has finished. Idempotent.
pub fn on_effect_complete(world: &mut World, id: EffectId) -> bool {
    let before = world.effects.len();
    world.effects.retain(|e| e.id != id);
    world.effects.len() != before
}

fn roll_power_up(world: &mut World) -> Option<PowerUpKind> {
    if world.rng.gen::<f64>() >= world.config.powerups.spawn_chance {
        return None;
    }
    Some(if world.rng.gen_bool(0.5) { PowerUpKind::BombRange } else { PowerUpKind::MaxBombs })
}
