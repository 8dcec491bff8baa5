/// Game phase state machine.
///
/// ```text
///   Menu ──start_game──▶ Playing ◀──resume── Paused
///                          │  └────pause────▶
///                          ├── lives == 0 ──▶ GameOver
///                          └── no enemies ──▶ LevelComplete
///   any ──return_to_menu──▶ Menu   (full teardown + rebuild)
/// ```
///
/// `evaluate` runs after every state-affecting operation. GameOver wins
/// when both terminal conditions hold at once. LevelComplete waits until
/// no player blast check is queued, since that check may still cost the
/// last life.

use super::event::GameEvent;
use super::level;
use super::scheduler::TimerKind;
use super::world::{Phase, World};

pub fn start_game(world: &mut World) -> bool {
    if world.phase != Phase::Menu { return false; }
    set_phase(world, Phase::Playing);
    arm_enemy_tick(world);
    evaluate(world);
    true
}

pub fn pause(world: &mut World) -> bool {
    if world.phase != Phase::Playing { return false; }
    set_phase(world, Phase::Paused);
    true
}

pub fn resume(world: &mut World) -> bool {
    if world.phase != Phase::Paused { return false; }
    set_phase(world, Phase::Playing);
    true
}

/// Tear down every timer and registry and rebuild the arena.
pub fn return_to_menu(world: &mut World) {
    level::reset_world(world);
    if world.phase != Phase::Menu {
        set_phase(world, Phase::Menu);
    }
}

/// Check terminal conditions. Only acts while `Playing`.
pub fn evaluate(world: &mut World) {
    if world.phase != Phase::Playing { return; }

    if world.player.lives == 0 {
        set_phase(world, Phase::GameOver);
        world.emit(GameEvent::GameOver);
    } else if world.enemies.is_empty() && world.scheduler.deferred_len() == 0 {
        set_phase(world, Phase::LevelComplete);
        world.emit(GameEvent::LevelComplete);
    }
}

/// Arm the periodic enemy tick. Called on start and after each firing.
pub(crate) fn arm_enemy_tick(world: &mut World) {
    if let Some(old) = world.enemy_timer.take() {
        world.scheduler.cancel(old);
    }
    let timer = world.scheduler.schedule_in(world.config.enemies.tick_ms, TimerKind::EnemyTick);
    world.enemy_timer = Some(timer);
}

fn set_phase(world: &mut World, to: Phase) {
    let from = world.phase;
    world.phase = to;
    log::debug!("phase {from:?} -> {to:?}");
    world.emit(GameEvent::PhaseChanged { from, to });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::scheduler::Deferred;

    fn world() -> World {
        World::new(GameConfig::default().with_seed(21))
    }

    #[test]
    fn legal_transitions() {
        let mut w = world();
        assert!(!pause(&mut w));
        assert!(!resume(&mut w));
        assert!(start_game(&mut w));
        assert_eq!(w.phase, Phase::Playing);
        assert!(!start_game(&mut w));
        assert!(pause(&mut w));
        assert_eq!(w.phase, Phase::Paused);
        assert!(resume(&mut w));
        assert_eq!(w.phase, Phase::Playing);
    }

    #[test]
    fn start_arms_enemy_tick() {
        let mut w = world();
        start_game(&mut w);
        let timer = w.enemy_timer.unwrap();
        assert_eq!(w.scheduler.deadline(timer), Some(500));
    }

    #[test]
    fn game_over_beats_level_complete() {
        let mut w = world();
        start_game(&mut w);
        w.drain_events();
        w.player.lives = 0;
        w.enemies.clear();
        evaluate(&mut w);
        assert_eq!(w.phase, Phase::GameOver);
        assert_eq!(w.drain_events(), vec![
            GameEvent::PhaseChanged { from: Phase::Playing, to: Phase::GameOver },
            GameEvent::GameOver,
        ]);
        // Terminal: evaluating again changes nothing
        evaluate(&mut w);
        assert!(w.events.is_empty());
    }

    #[test]
    fn level_complete_when_last_enemy_gone() {
        let mut w = world();
        start_game(&mut w);
        w.enemies.clear();
        evaluate(&mut w);
        assert_eq!(w.phase, Phase::LevelComplete);
        let completes = w.events.iter().filter(|e| **e == GameEvent::LevelComplete).count();
        assert_eq!(completes, 1);
    }

    #[test]
    fn level_complete_waits_for_queued_blast_check() {
        let mut w = world();
        start_game(&mut w);
        w.enemies.clear();
        w.scheduler.defer(Deferred::PlayerBlast { bomb: 0, cells: vec![] });
        evaluate(&mut w);
        assert_eq!(w.phase, Phase::Playing);
        w.scheduler.pop_deferred();
        evaluate(&mut w);
        assert_eq!(w.phase, Phase::LevelComplete);
    }

    #[test]
    fn return_to_menu_resets_everything() {
        let mut w = world();
        start_game(&mut w);
        w.player.lives = 1;
        w.player.bomb_range = 4;
        w.detonated.insert(3);
        w.enemies.truncate(2);
        return_to_menu(&mut w);
        assert_eq!(w.phase, Phase::Menu);
        assert_eq!(w.player.lives, 3);
        assert_eq!(w.player.bomb_range, 1);
        assert_eq!(w.enemies.len(), 5);
        assert!(w.detonated.is_empty());
        assert_eq!(w.scheduler.live_count(), 0);
        assert_eq!(w.enemy_timer, None);
    }
}
