/// Blast ray casting. Pure, no grid mutation.
///
/// From the bomb cell, one ray per cardinal direction walks up to `range`
/// steps:
///   - SolidBlock: ray stops, cell NOT affected
///   - DestructibleBlock: cell affected and recorded for destruction, ray stops
///   - anything else (empty, power-up, other bombs): cell affected, ray continues
///   - grid edge: ray stops
///
/// The bomb cell itself is always affected.

use serde::{Deserialize, Serialize};

use super::grid::{Grid, GridPos, DIRS};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlastArea {
    pub origin: GridPos,
    /// Every affected cell, origin first. No duplicates.
    pub cells: Vec<GridPos>,
    /// Destructible blocks reached (subset of `cells`).
    pub destroyed_blocks: Vec<GridPos>,
}

impl BlastArea {
    pub fn contains(&self, pos: GridPos) -> bool {
        self.cells.contains(&pos)
    }
}

pub fn blast_area(grid: &Grid, origin: GridPos, range: u32) -> BlastArea {
    let mut cells = vec![origin];
    let mut destroyed_blocks = Vec::new();

    for &(dx, dy) in &DIRS {
        for dist in 1..=range as i32 {
            let pos = match origin.offset(dx * dist, dy * dist) {
                Some(p) => p,
                None => break,
            };
            let cell = match grid.get(pos) {
                Some(c) => c,
                None => break,
            };
            if cell.is_solid() { break; }
            cells.push(pos);
            if cell.is_destructible() {
                destroyed_blocks.push(pos);
                break;
            }
        }
    }

    BlastArea { origin, cells, destroyed_blocks }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn set(cells: &[GridPos]) -> HashSet<GridPos> {
        cells.iter().copied().collect()
    }

    fn p(row: usize, col: usize) -> GridPos {
        GridPos::new(row, col)
    }

    #[test]
    fn open_field_range_two_is_a_plus() {
        let g = Grid::new(5, 5, 1.0);
        let area = blast_area(&g, p(2, 2), 2);
        let expected = set(&[
            p(2, 2),
            p(1, 2), p(0, 2), p(3, 2), p(4, 2),
            p(2, 1), p(2, 0), p(2, 3), p(2, 4),
        ]);
        assert_eq!(set(&area.cells), expected);
        assert_eq!(area.cells.len(), 9);
        assert!(area.destroyed_blocks.is_empty());
        assert_eq!(area.cells[0], p(2, 2));
    }

    #[test]
    fn solid_wall_is_excluded_and_stops_ray() {
        let g = Grid::parse(&[
            "     ",
            "     ",
            " =   ",
            "     ",
            "     ",
        ], 1.0);
        let area = blast_area(&g, p(2, 2), 2);
        assert!(!area.contains(p(2, 1)));
        assert!(!area.contains(p(2, 0)));
        assert!(area.contains(p(2, 4)));
    }

    #[test]
    fn destructible_absorbs_blast() {
        let g = Grid::parse(&["  # #"], 1.0);
        let area = blast_area(&g, p(0, 0), 4);
        assert!(area.contains(p(0, 2)));
        assert!(!area.contains(p(0, 3)));
        assert!(!area.contains(p(0, 4)));
        assert_eq!(area.destroyed_blocks, vec![p(0, 2)]);
    }

    #[test]
    fn power_ups_do_not_stop_rays() {
        let g = Grid::parse(&["RM  "], 1.0);
        let area = blast_area(&g, p(0, 3), 3);
        assert!(area.contains(p(0, 0)));
        assert!(area.contains(p(0, 1)));
    }

    #[test]
    fn range_zero_only_hits_origin() {
        let g = Grid::new(3, 3, 1.0);
        assert_eq!(blast_area(&g, p(1, 1), 0).cells, vec![p(1, 1)]);
    }

    #[test]
    fn rays_clip_at_grid_edge() {
        let g = Grid::new(3, 3, 1.0);
        let area = blast_area(&g, p(0, 0), 5);
        assert_eq!(set(&area.cells), set(&[p(0, 0), p(0, 1), p(0, 2), p(1, 0), p(2, 0)]));
    }
}
