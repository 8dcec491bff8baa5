pub mod enemy;
pub mod event;
pub mod explosion;
pub mod level;
pub mod phase;
pub mod player;
pub mod scheduler;
pub mod snapshot;
pub mod step;
pub mod world;
