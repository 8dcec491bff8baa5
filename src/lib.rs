//! Grid arena engine for a bomb-placing action game.
//!
//! The crate owns the rules and state of one session: the cell grid, the
//! player, bombs with fuse and chain timers, enemies with per-kind movement,
//! and the phase machine. Rendering and input belong to the host, which
//! feeds intents in, calls [`World::advance`] with elapsed time, and reads
//! back a [`WorldSnapshot`] plus a stream of [`GameEvent`]s.
//!
//! ```no_run
//! use blastgrid::{GameConfig, World};
//!
//! let mut world = World::new(GameConfig::load());
//! world.start_game();
//! world.move_player(1, 0)?;
//! world.on_movement_complete();
//! world.place_bomb();
//! for event in world.advance(16)? {
//!     println!("{event:?}");
//! }
//! # Ok::<(), blastgrid::EngineError>(())
//! ```
//!
//! Layers:
//!   - [`domain`]: pure data and rules (cells, grid, entities, blast rays,
//!     pathfinding, enemy strategies)
//!   - [`sim`]: the stateful session (scheduler, explosions, controllers,
//!     phases, snapshots)

pub mod config;
pub mod domain;
pub mod error;
pub mod sim;

pub use config::GameConfig;
pub use domain::cell::{Cell, PowerUpKind};
pub use domain::entity::{Bomb, Enemy, EnemyKind, MovePattern, Player};
pub use domain::grid::{Grid, GridPos, WorldPoint};
pub use error::{EngineError, EngineResult};
pub use sim::event::{DamageCause, GameEvent};
pub use sim::snapshot::WorldSnapshot;
pub use sim::world::{Layout, Phase, World};
