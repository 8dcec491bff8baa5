/// Read-only snapshot of a running world.
///
/// Everything a renderer or an outside observer needs for one frame:
/// terrain, registries, effects, phase, clock, and pending timers as plain
/// data. Serializes with serde; `snapshot_json` is the JSON form.
///
/// Snapshots are never fed back into the engine.

use serde::Serialize;

use crate::domain::entity::{Bomb, Enemy, ExplosionEffect, Player};
use crate::domain::grid::Grid;
use crate::error::EngineResult;
use super::scheduler::PendingTimer;
use super::world::{Phase, World};

#[derive(Clone, Debug, Serialize)]
pub struct WorldSnapshot {
    pub phase: Phase,
    pub clock_ms: u64,
    pub grid: Grid,
    pub player: Player,
    pub bombs: Vec<Bomb>,
    pub enemies: Vec<Enemy>,
    pub effects: Vec<ExplosionEffect>,
    pub timers: Vec<PendingTimer>,
}

impl World {
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            phase: self.phase,
            clock_ms: self.now(),
            grid: self.grid.clone(),
            player: self.player.clone(),
            bombs: self.bombs.clone(),
            enemies: self.enemies.clone(),
            effects: self.effects.clone(),
            timers: self.scheduler.pending(),
        }
    }

    pub fn snapshot_json(&self) -> EngineResult<String> {
        Ok(serde_json::to_string(&self.snapshot())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::scheduler::TimerKind;

    #[test]
    fn snapshot_exposes_timers_as_data() {
        let mut w = World::new(GameConfig::default().with_seed(6));
        w.start_game();
        assert!(w.place_bomb());
        let snap = w.snapshot();
        assert_eq!(snap.phase, Phase::Playing);
        let kinds: Vec<_> = snap.timers.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![TimerKind::EnemyTick, TimerKind::BombFuse(0)]);
        assert_eq!(snap.bombs.len(), 1);
    }

    #[test]
    fn json_has_expected_fields() {
        let w = World::new(GameConfig::default().with_seed(6));
        let json = w.snapshot_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["phase"], "Menu");
        assert_eq!(value["clock_ms"], 0);
        assert_eq!(value["grid"]["rows"], 13);
        assert_eq!(value["enemies"].as_array().map(|a| a.len()), Some(5));
        assert_eq!(value["player"]["lives"], 3);
    }
}
