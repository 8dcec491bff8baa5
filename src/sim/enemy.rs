/// Enemy controller: one tick of behavior for every enemy.
///
/// Enemies act in registry order. Each spends its step budget (see
/// `Enemy::take_steps`); every step asks its strategy for a move. A move
/// onto the player's cell is contact: the player takes damage, the enemy
/// stays where it is and its turn ends.

use crate::domain::ai::{self, EnemyMove};
use crate::domain::entity::EnemyId;
use crate::domain::rules::ArenaView;
use super::event::{DamageCause, GameEvent};
use super::world::{Phase, World};
use super::{phase, player};

pub fn tick_enemies(world: &mut World) {
    let ids: Vec<EnemyId> = world.enemies.iter().map(|e| e.id).collect();

    for id in ids {
        if world.phase != Phase::Playing { break; }
        let Some(idx) = world.enemies.iter().position(|e| e.id == id) else { continue };

        let steps = world.enemies[idx].take_steps();
        for _ in 0..steps {
            let choice = {
                let view = ArenaView {
                    grid: &world.grid,
                    bombs: &world.bombs,
                    enemies: &world.enemies,
                };
                ai::choose_move(&view, &world.enemies[idx], world.player.pos, &mut world.rng)
            };

            match choice {
                EnemyMove::Stay => {}
                EnemyMove::Step(target) if target == world.player.pos => {
                    log::trace!("enemy {id} touched the player");
                    player::damage_player(world, DamageCause::Enemy(id));
                    phase::evaluate(world);
                    break;
                }
                EnemyMove::Step(target) => {
                    let from = world.enemies[idx].pos;
                    world.enemies[idx].pos = target;
                    log::trace!(
                        "enemy {id} ({}, {}) -> ({}, {})",
                        from.row, from.col, target.row, target.col
                    );
                    world.emit(GameEvent::EnemyMoved { id, from, to: target });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::entity::{Bomb, EnemyKind};
    use crate::domain::grid::{Grid, GridPos};
    use crate::sim::world::Layout;

    fn p(row: usize, col: usize) -> GridPos {
        GridPos::new(row, col)
    }

    fn playing(rows: &[&str], player: GridPos, enemies: Vec<(GridPos, EnemyKind)>) -> World {
        let mut w = World::with_layout(GameConfig::default().with_seed(8), Layout {
            grid: Grid::parse(rows, 1.0),
            player_spawn: player,
            enemies,
        }).unwrap();
        w.phase = Phase::Playing;
        w
    }

    #[test]
    fn chaser_closes_in() {
        let mut w = playing(&["       "], p(0, 0), vec![(p(0, 6), EnemyKind::Chaser)]);
        tick_enemies(&mut w);
        assert_eq!(w.enemies[0].pos, p(0, 5));
        tick_enemies(&mut w);
        assert_eq!(w.enemies[0].pos, p(0, 4));
    }

    #[test]
    fn contact_damages_without_displacement() {
        let mut w = playing(&["   "], p(0, 0), vec![(p(0, 1), EnemyKind::Chaser)]);
        tick_enemies(&mut w);
        assert_eq!(w.enemies[0].pos, p(0, 1));
        assert_eq!(w.player.pos, p(0, 0));
        assert_eq!(w.player.lives, 2);
    }

    #[test]
    fn invincible_player_blocks_enemy_without_damage() {
        let mut w = playing(&["   "], p(0, 0), vec![(p(0, 1), EnemyKind::Chaser)]);
        // Two steps banked; the first touches the player and ends the turn
        w.enemies[0].speed = 2.0;
        w.player.is_invincible = true;
        tick_enemies(&mut w);
        assert_eq!(w.player.lives, 3);
        assert_eq!(w.enemies[0].pos, p(0, 1));
        assert!(!w.events.iter().any(|e| matches!(e, GameEvent::EnemyMoved { .. })));
        assert!(!w.events.iter().any(|e| matches!(e, GameEvent::PlayerDamaged { .. })));
    }

    #[test]
    fn enemies_never_enter_bombs_or_walls() {
        let mut w = playing(&[
            "=====",
            "=   =",
            "= = =",
            "=   =",
            "=====",
        ], p(1, 1), vec![(p(3, 3), EnemyKind::Fast), (p(3, 1), EnemyKind::Normal)]);
        w.bombs.push(Bomb { id: 0, pos: p(2, 3), range: 1, fuse_deadline: 0 });
        for _ in 0..50 {
            tick_enemies(&mut w);
            for e in &w.enemies {
                assert!(w.grid.get(e.pos).map_or(false, |c| c.is_walkable()));
                assert_ne!(e.pos, p(2, 3));
            }
            assert_ne!(w.enemies[0].pos, w.enemies[1].pos);
            w.player.is_invincible = true;
        }
    }

    #[test]
    fn stationary_enemy_stays_put() {
        let mut w = playing(&["   "], p(0, 0), vec![(p(0, 2), EnemyKind::Stationary)]);
        for _ in 0..10 {
            tick_enemies(&mut w);
        }
        assert_eq!(w.enemies[0].pos, p(0, 2));
        assert!(w.events.is_empty());
    }

    #[test]
    fn no_ticks_after_game_over() {
        let mut w = playing(&["   "], p(0, 0), vec![(p(0, 1), EnemyKind::Chaser)]);
        w.player.lives = 1;
        tick_enemies(&mut w);
        assert_eq!(w.phase, Phase::GameOver);
    }
}
