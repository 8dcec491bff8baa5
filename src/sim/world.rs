/// World: the complete state of a running arena.
///
/// ## Ownership
///
/// One `World` per session, threaded explicitly through every operation.
/// Terrain lives in `grid`; who stands where lives in the registries
/// (`player`, `bombs`, `enemies`). The two are never mixed: a bomb or an
/// enemy never writes itself into a cell.
///
/// Fields are public for reading (renderers, tests). Mutation goes through
/// the `sim` operations so the scheduler and the registries stay in step.
///
/// ## Bookkeeping
///   - `fuse_timers`: bomb id → its pending fuse timer
///   - `detonated`: ids already exploded or already queued to chain;
///     guards against double detonation in cyclic chains
///   - `events`: outbound queue, drained by `advance` / `drain_events`

use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::domain::entity::{
    Bomb, BombId, EffectId, Enemy, EnemyId, EnemyKind, ExplosionEffect, Player,
};
use crate::domain::grid::{Grid, GridPos};
use crate::domain::rules::ArenaView;
use crate::error::{EngineError, EngineResult};
use super::event::GameEvent;
use super::scheduler::{Scheduler, TimerId};
use super::{enemy, explosion, level, phase, player, step};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Phase {
    Menu,
    Playing,
    Paused,
    GameOver,
    LevelComplete,
}

/// A hand-built arena. Menu resets rebuild exactly this layout instead of
/// rolling a new one.
#[derive(Clone, Debug)]
pub struct Layout {
    pub grid: Grid,
    pub player_spawn: GridPos,
    pub enemies: Vec<(GridPos, EnemyKind)>,
}

impl Layout {
    pub fn validate(&self) -> EngineResult<()> {
        let mut taken: HashSet<GridPos> = HashSet::new();
        let spawns = std::iter::once(self.player_spawn)
            .chain(self.enemies.iter().map(|&(pos, _)| pos));
        for pos in spawns {
            let cell = self.grid.cell_at(pos.row, pos.col)?;
            if cell.is_blocking() {
                return Err(EngineError::BlockedSpawn { row: pos.row, col: pos.col });
            }
            if !taken.insert(pos) {
                return Err(EngineError::SpawnOverlap { row: pos.row, col: pos.col });
            }
        }
        Ok(())
    }
}

pub struct World {
    pub config: GameConfig,
    pub phase: Phase,

    // ── Terrain ──
    pub grid: Grid,

    // ── Registries ──
    pub player: Player,
    pub bombs: Vec<Bomb>,
    pub enemies: Vec<Enemy>,
    pub effects: Vec<ExplosionEffect>,

    // ── Timers ──
    pub scheduler: Scheduler,
    pub fuse_timers: HashMap<BombId, TimerId>,
    pub invincibility_timer: Option<TimerId>,
    pub enemy_timer: Option<TimerId>,
    pub detonated: HashSet<BombId>,

    pub rng: StdRng,
    pub events: Vec<GameEvent>,

    pub(crate) layout: Option<Layout>,
    pub(crate) next_bomb_id: BombId,
    pub(crate) next_effect_id: EffectId,
}

impl World {
    /// Fresh session in `Menu` with a generated arena.
    pub fn new(config: GameConfig) -> Self {
        Self::build(config, None)
    }

    /// Fresh session in `Menu` on a fixed arena. Every spawn must sit on a
    /// distinct walkable cell inside the grid.
    pub fn with_layout(config: GameConfig, layout: Layout) -> EngineResult<Self> {
        layout.validate()?;
        Ok(Self::build(config, Some(layout)))
    }

    fn build(config: GameConfig, layout: Option<Layout>) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let player = Player::new(
            GridPos::new(1, 1),
            config.player.lives,
            config.bombs.start_range,
            config.bombs.start_max_bombs,
        );
        let mut world = World {
            grid: Grid::new(config.grid.rows, config.grid.cols, config.grid.cell_size),
            config,
            phase: Phase::Menu,
            player,
            bombs: Vec::new(),
            enemies: Vec::new(),
            effects: Vec::new(),
            scheduler: Scheduler::new(),
            fuse_timers: HashMap::new(),
            invincibility_timer: None,
            enemy_timer: None,
            detonated: HashSet::new(),
            rng,
            events: Vec::new(),
            layout,
            next_bomb_id: 0,
            next_effect_id: 0,
        };
        level::reset_world(&mut world);
        world
    }

    /// Borrow terrain plus occupancy for rule queries.
    pub fn view(&self) -> ArenaView<'_> {
        ArenaView { grid: &self.grid, bombs: &self.bombs, enemies: &self.enemies }
    }

    /// Engine clock in milliseconds.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    pub fn bomb(&self, id: BombId) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.id == id)
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

// ── Command API ──
//
// Thin method forms of the `sim` operations for hosts that prefer
// `world.place_bomb()` over `player::place_bomb(&mut world)`.

impl World {
    pub fn start_game(&mut self) -> bool {
        phase::start_game(self)
    }

    pub fn pause(&mut self) -> bool {
        phase::pause(self)
    }

    pub fn resume(&mut self) -> bool {
        phase::resume(self)
    }

    pub fn return_to_menu(&mut self) {
        phase::return_to_menu(self)
    }

    pub fn move_player(&mut self, dx: i32, dy: i32) -> EngineResult<bool> {
        player::move_player(self, dx, dy)
    }

    pub fn place_bomb(&mut self) -> bool {
        player::place_bomb(self)
    }

    pub fn on_movement_complete(&mut self) {
        player::on_movement_complete(self)
    }

    pub fn on_explosion_effect_complete(&mut self, id: EffectId) -> bool {
        explosion::on_effect_complete(self, id)
    }

    pub fn tick_enemies(&mut self) {
        enemy::tick_enemies(self)
    }

    pub fn advance(&mut self, dt_ms: u64) -> EngineResult<Vec<GameEvent>> {
        step::advance(self, dt_ms)
    }
}
