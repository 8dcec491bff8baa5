/// Arena builder.
///
/// ## Generated layout
///   - border cells and every (even row, even col) cell: `SolidBlock`
///   - safe zone around the player spawn (1,1): (1,1), (1,2), (2,1)
///   - enemy spawn cells: reserved while blocks are laid, so they end up
///     `Empty` once the roster is placed
///   - every other cell: `DestructibleBlock` with `destructible_chance`
///
/// ## Enemy spawns
/// Taken from a fixed list of far anchors (corners, edge midpoints, centre),
/// skipping walls and the safe zone. If more enemies are configured than
/// anchors fit, the rest are drawn from open cells away from the player.
///
/// Kinds cycle through `EnemyKind::ALL` in order, so the default count of
/// five spawns one of each.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::domain::cell::Cell;
use crate::domain::entity::{Enemy, EnemyKind, Player};
use crate::domain::grid::{Grid, GridPos};
use super::world::World;

pub const PLAYER_SPAWN: GridPos = GridPos::new(1, 1);

/// Minimum Manhattan distance between the player spawn and an extra
/// (non-anchor) enemy spawn.
const MIN_SPAWN_DISTANCE: u32 = 4;

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Lay out a fresh arena. Returns the grid and the enemy spawn cells.
pub fn create_grid<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> (Grid, Vec<GridPos>) {
    let rows = config.grid.rows;
    let cols = config.grid.cols;
    let mut grid = Grid::new(rows, cols, config.grid.cell_size);

    let spawns = enemy_spawn_cells(rows, cols, config.enemies.count, rng);
    let reserved: HashSet<GridPos> = spawns.iter().copied().collect();

    for row in 0..rows {
        for col in 0..cols {
            let pos = GridPos::new(row, col);
            let cell = if is_fixed_wall(rows, cols, pos) {
                Cell::SolidBlock
            } else if is_safe_zone(pos) || reserved.contains(&pos) {
                Cell::Empty
            } else if rng.gen::<f64>() < config.grid.destructible_chance {
                Cell::DestructibleBlock
            } else {
                Cell::Empty
            };
            grid.lay(pos, cell);
        }
    }

    (grid, spawns)
}

/// Build the enemy registry. Ids follow roster order.
pub fn spawn_enemies(roster: &[(GridPos, EnemyKind)]) -> Vec<Enemy> {
    roster
        .iter()
        .enumerate()
        .map(|(i, &(pos, kind))| Enemy::new(i as u32, pos, kind))
        .collect()
}

/// Tear everything down and rebuild the arena: grid, roster, player,
/// timers, bookkeeping. Phase is left to the caller.
pub fn reset_world(world: &mut World) {
    world.scheduler.clear();
    world.fuse_timers.clear();
    world.invincibility_timer = None;
    world.enemy_timer = None;
    world.detonated.clear();
    world.bombs.clear();
    world.effects.clear();
    world.next_bomb_id = 0;
    world.next_effect_id = 0;

    let (grid, spawn, roster) = match &world.layout {
        Some(layout) => (layout.grid.clone(), layout.player_spawn, layout.enemies.clone()),
        None => {
            let (grid, spawns) = create_grid(&world.config, &mut world.rng);
            (grid, PLAYER_SPAWN, default_roster(&spawns))
        }
    };

    world.grid = grid;
    world.enemies = spawn_enemies(&roster);
    // Spawn markers are transient: make sure nothing is left under a roster entry
    for &(pos, _) in &roster {
        if world.grid.get(pos).map_or(false, |c| !c.is_solid()) {
            world.grid.lay(pos, Cell::Empty);
        }
    }

    world.player = Player::new(
        spawn,
        world.config.player.lives,
        world.config.bombs.start_range,
        world.config.bombs.start_max_bombs,
    );

    log::debug!(
        "arena reset: {}x{} grid, {} enemies",
        world.grid.rows(),
        world.grid.cols(),
        world.enemies.len()
    );
}

// ══════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════

fn is_fixed_wall(rows: usize, cols: usize, pos: GridPos) -> bool {
    let border = pos.row == 0 || pos.col == 0 || pos.row + 1 == rows || pos.col + 1 == cols;
    let pillar = pos.row % 2 == 0 && pos.col % 2 == 0;
    border || pillar
}

fn is_safe_zone(pos: GridPos) -> bool {
    pos == PLAYER_SPAWN || pos == GridPos::new(1, 2) || pos == GridPos::new(2, 1)
}

/// Nearest odd index at or below the midpoint. Odd rows/cols are never pillars.
fn odd_mid(n: usize) -> usize {
    let m = n / 2;
    if m % 2 == 0 { m.saturating_sub(1).max(1) } else { m }
}

fn enemy_spawn_cells<R: Rng + ?Sized>(
    rows: usize,
    cols: usize,
    count: usize,
    rng: &mut R,
) -> Vec<GridPos> {
    if rows < 3 || cols < 3 {
        return vec![];
    }
    let (last_r, last_c) = (rows - 2, cols - 2);
    let (mid_r, mid_c) = (odd_mid(rows), odd_mid(cols));
    let anchors = [
        GridPos::new(last_r, last_c),
        GridPos::new(1, last_c),
        GridPos::new(last_r, 1),
        GridPos::new(mid_r, mid_c),
        GridPos::new(1, mid_c),
        GridPos::new(mid_r, 1),
        GridPos::new(last_r, mid_c),
        GridPos::new(mid_r, last_c),
    ];

    let usable = |pos: GridPos| !is_fixed_wall(rows, cols, pos) && !is_safe_zone(pos);

    let mut picked: Vec<GridPos> = Vec::with_capacity(count);
    for pos in anchors {
        if picked.len() == count { break; }
        if usable(pos) && !picked.contains(&pos) {
            picked.push(pos);
        }
    }

    if picked.len() < count {
        let mut open: Vec<GridPos> = (1..rows - 1)
            .flat_map(|row| (1..cols - 1).map(move |col| GridPos::new(row, col)))
            .filter(|&p| usable(p) && !picked.contains(&p))
            .collect();
        open.shuffle(rng);
        // Far cells first, near ones only if the arena is too small
        open.sort_by_key(|p| p.manhattan(PLAYER_SPAWN) < MIN_SPAWN_DISTANCE);
        let missing = count - picked.len();
        picked.extend(open.into_iter().take(missing));
    }

    if picked.len() < count {
        log::warn!("arena {rows}x{cols} only fits {} of {count} enemies", picked.len());
    }
    picked
}

fn default_roster(spawns: &[GridPos]) -> Vec<(GridPos, EnemyKind)> {
    spawns
        .iter()
        .enumerate()
        .map(|(i, &pos)| (pos, EnemyKind::ALL[i % EnemyKind::ALL.len()]))
        .collect()
}
