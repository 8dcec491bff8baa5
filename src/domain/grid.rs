/// Grid model: the cell matrix plus coordinate conversions.
///
/// Storage is `cells[row][col]`. Dimensions are fixed once built.
///
/// ## Access rules
///   - `cell_at` / `set_cell` are the checked API: out-of-bounds is an error,
///     and a `SolidBlock` can never be turned into anything else.
///   - `get` is the hot-path read used by blast rays and pathfinding; it
///     returns `None` outside the grid so callers bounds-check by matching.
///
/// ## World space
///   `to_world_position(col, row)` centres the grid on the origin of the
///   x/z plane (y is height and always 0). `to_grid_position` inverts it.

use serde::{Deserialize, Serialize};

use super::cell::{Cell, PowerUpKind};
use crate::error::{EngineError, EngineResult};

/// Cardinal steps as (dx, dy) = (column delta, row delta).
pub const DIRS: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize, PartialOrd, Ord)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub const fn new(row: usize, col: usize) -> Self {
        GridPos { row, col }
    }

    /// Step by (dx, dy). Only rejects negative coordinates; the grid
    /// decides whether the result is inside it.
    pub fn offset(self, dx: i32, dy: i32) -> Option<GridPos> {
        let col = self.col as i64 + dx as i64;
        let row = self.row as i64 + dy as i64;
        if col < 0 || row < 0 {
            return None;
        }
        Some(GridPos::new(row as usize, col as usize))
    }

    pub fn manhattan(self, other: GridPos) -> u32 {
        (self.row.abs_diff(other.row) + self.col.abs_diff(other.col)) as u32
    }
}

/// A point in renderer world space.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cell_size: f32,
    cells: Vec<Vec<Cell>>,
}

// ── Construction ──

impl Grid {
    /// An all-empty grid. Walls are laid by the level builder.
    pub fn new(rows: usize, cols: usize, cell_size: f32) -> Self {
        Grid {
            rows,
            cols,
            cell_size,
            cells: vec![vec![Cell::Empty; cols]; rows],
        }
    }

    /// Build a grid from a string diagram, one string per row.
    ///
    /// Legend: `=` solid, `#` destructible, `R` bomb-range power-up,
    /// `M` max-bombs power-up, anything else empty.
    pub fn parse(rows: &[&str], cell_size: f32) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Grid::new(height, width, cell_size);
        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                grid.cells[row][col] = match ch {
                    '=' => Cell::SolidBlock,
                    '#' => Cell::DestructibleBlock,
                    'R' => Cell::PowerUp(PowerUpKind::BombRange),
                    'M' => Cell::PowerUp(PowerUpKind::MaxBombs),
                    _ => Cell::Empty,
                };
            }
        }
        grid
    }

    /// Unchecked write used while a level is being laid out.
    pub(crate) fn lay(&mut self, pos: GridPos, cell: Cell) {
        if self.contains(pos) {
            self.cells[pos.row][pos.col] = cell;
        }
    }
}

// ── Queries ──

impl Grid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Row-major view for renderers and snapshots.
    pub fn cells(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    #[inline]
    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Hot-path read: `None` outside the grid.
    #[inline]
    pub fn get(&self, pos: GridPos) -> Option<Cell> {
        if self.contains(pos) {
            Some(self.cells[pos.row][pos.col])
        } else {
            None
        }
    }

    pub fn cell_at(&self, row: usize, col: usize) -> EngineResult<Cell> {
        self.get(GridPos::new(row, col))
            .ok_or_else(|| self.out_of_bounds(row, col))
    }

    /// In-bounds cardinal neighbours of `pos`.
    pub fn neighbors(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        DIRS.iter()
            .filter_map(move |&(dx, dy)| pos.offset(dx, dy))
            .filter(move |p| self.contains(*p))
    }

    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().flatten().filter(|&&c| c == cell).count()
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> EngineError {
        EngineError::OutOfBounds { row, col, rows: self.rows, cols: self.cols }
    }
}

// ── Mutation ──

impl Grid {
    /// Checked write. Solid blocks are immutable.
    pub fn set_cell(&mut self, row: usize, col: usize, value: Cell) -> EngineResult<()> {
        let current = self.cell_at(row, col)?;
        if current.is_solid() && value != Cell::SolidBlock {
            return Err(EngineError::ImmutableWall { row, col });
        }
        self.cells[row][col] = value;
        Ok(())
    }
}

// ── Coordinate mapping ──

impl Grid {
    fn centre(&self) -> (f32, f32) {
        (
            (self.cols.saturating_sub(1)) as f32 / 2.0,
            (self.rows.saturating_sub(1)) as f32 / 2.0,
        )
    }

    pub fn to_world_position(&self, col: usize, row: usize) -> WorldPoint {
        let (cx, cz) = self.centre();
        WorldPoint {
            x: (col as f32 - cx) * self.cell_size,
            y: 0.0,
            z: (row as f32 - cz) * self.cell_size,
        }
    }

    /// Inverse of `to_world_position`. `None` if the point falls outside.
    pub fn to_grid_position(&self, x: f32, z: f32) -> Option<GridPos> {
        if !x.is_finite() || !z.is_finite() || self.cell_size <= 0.0 {
            return None;
        }
        let (cx, cz) = self.centre();
        let col = (x / self.cell_size + cx).round();
        let row = (z / self.cell_size + cz).round();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let pos = GridPos::new(row as usize, col as usize);
        self.contains(pos).then_some(pos)
    }
}
