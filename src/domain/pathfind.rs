/// Enemy pathfinding: A* over 4-connected cells, Manhattan heuristic.
///
/// Impassable: SolidBlock, DestructibleBlock, live-bomb cells.
/// Start and goal are always admitted (the goal is usually the player's
/// cell, which may hold the bomb they just dropped).
///
/// Tie-breaking between equal-cost frontier nodes is whatever the search
/// yields; callers must not depend on which of several shortest paths
/// comes back.

use pathfinding::prelude::astar;

use super::grid::GridPos;
use super::rules::ArenaView;

/// Full cell sequence from `start` to `goal`, both inclusive.
/// `None` when unreachable. That is a normal outcome, not an error.
pub fn find_path(view: &ArenaView, start: GridPos, goal: GridPos) -> Option<Vec<GridPos>> {
    if !view.grid.contains(start) || !view.grid.contains(goal) {
        return None;
    }

    astar(
        &start,
        |&pos| {
            view.grid
                .neighbors(pos)
                .filter(|&n| n == goal || view.is_open(n))
                .map(|n| (n, 1u32))
                .collect::<Vec<_>>()
        },
        |&pos| pos.manhattan(goal),
        |&pos| pos == goal,
    )
    .map(|(path, _cost)| path)
}

/// First step along the shortest path, if there is one to take.
pub fn first_step(view: &ArenaView, start: GridPos, goal: GridPos) -> Option<GridPos> {
    find_path(view, start, goal).and_then(|path| path.get(1).copied())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Bomb;
    use crate::domain::grid::Grid;

    fn p(row: usize, col: usize) -> GridPos {
        GridPos::new(row, col)
    }

    fn is_contiguous(path: &[GridPos]) -> bool {
        path.windows(2).all(|w| w[0].manhattan(w[1]) == 1)
    }

    #[test]
    fn straight_line() {
        let g = Grid::new(1, 5, 1.0);
        let v = ArenaView { grid: &g, bombs: &[], enemies: &[] };
        let path = find_path(&v, p(0, 0), p(0, 4)).unwrap();
        assert_eq!(path, vec![p(0, 0), p(0, 1), p(0, 2), p(0, 3), p(0, 4)]);
    }

    #[test]
    fn routes_around_walls() {
        let g = Grid::parse(&[
            "=====",
            "= = =",
            "=   =",
            "=====",
        ], 1.0);
        let v = ArenaView { grid: &g, bombs: &[], enemies: &[] };
        let path = find_path(&v, p(1, 1), p(1, 3)).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.first(), Some(&p(1, 1)));
        assert_eq!(path.last(), Some(&p(1, 3)));
        assert!(is_contiguous(&path));
    }

    #[test]
    fn destructible_blocks_are_impassable() {
        let g = Grid::parse(&[" # "], 1.0);
        let v = ArenaView { grid: &g, bombs: &[], enemies: &[] };
        assert_eq!(find_path(&v, p(0, 0), p(0, 2)), None);
    }

    #[test]
    fn bombs_are_impassable() {
        let g = Grid::new(1, 3, 1.0);
        let bombs = [Bomb { id: 0, pos: p(0, 1), range: 1, fuse_deadline: 0 }];
        let v = ArenaView { grid: &g, bombs: &bombs, enemies: &[] };
        assert_eq!(find_path(&v, p(0, 0), p(0, 2)), None);
        assert_eq!(first_step(&v, p(0, 0), p(0, 2)), None);
    }

    #[test]
    fn goal_on_bomb_is_reachable() {
        let g = Grid::new(1, 3, 1.0);
        let bombs = [Bomb { id: 0, pos: p(0, 2), range: 1, fuse_deadline: 0 }];
        let v = ArenaView { grid: &g, bombs: &bombs, enemies: &[] };
        assert_eq!(first_step(&v, p(0, 0), p(0, 2)), Some(p(0, 1)));
    }

    #[test]
    fn path_to_self_has_no_step() {
        let g = Grid::new(2, 2, 1.0);
        let v = ArenaView { grid: &g, bombs: &[], enemies: &[] };
        assert_eq!(find_path(&v, p(1, 1), p(1, 1)), Some(vec![p(1, 1)]));
        assert_eq!(first_step(&v, p(1, 1), p(1, 1)), None);
    }
}
