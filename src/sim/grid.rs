//! Spatial grid shared by every simulation component
//!
//! Cells are addressed as (x, y) with (0, 0) in the top-left corner. A world
//! position `(px, py)` lies in cell `(floor(px), floor(py))`. Any lookup outside
//! the grid reads as `Wall`, so callers never need their own bounds checks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Occupancy of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Wall,
    Open,
}

/// Rectangular wall/open occupancy grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid with every cell set to `Wall`
    pub fn filled(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Wall; width * height],
        }
    }

    /// Build a grid from rows of characters: `#` is a wall, anything else is open.
    /// Short rows are padded with walls.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::filled(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch != '#' {
                    grid.set(x, y, Cell::Open);
                }
            }
        }
        grid
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Cell at (x, y); out of bounds reads as `Wall`
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Cell {
        self.index(x, y).map_or(Cell::Wall, |i| self.cells[i])
    }

    /// Cell at signed coordinates; negative or out-of-range reads as `Wall`
    #[inline]
    pub fn get_signed(&self, x: i64, y: i64) -> Cell {
        if x < 0 || y < 0 {
            return Cell::Wall;
        }
        self.get(x as usize, y as usize)
    }

    /// Set a cell; writes outside the grid are ignored
    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(i) = self.index(x, y) {
            self.cells[i] = cell;
        }
    }

    #[inline]
    pub fn is_open(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Cell::Open
    }

    /// Whether the cell containing a world position is a wall
    #[inline]
    pub fn is_wall_at(&self, pos: Vec2) -> bool {
        self.get_signed(pos.x.floor() as i64, pos.y.floor() as i64) == Cell::Wall
    }

    /// Whether (x, y) lies on the outermost ring of cells
    pub fn is_border(&self, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x + 1 == self.width || y + 1 == self.height
    }

    /// Open 4-neighbours of (x, y) in fixed order: down, right, up, left
    pub fn open_neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        const DIRS: [(i64, i64); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
        DIRS.iter().filter_map(move |&(dx, dy)| {
            let nx = x as i64 + dx;
            let ny = y as i64 + dy;
            (self.get_signed(nx, ny) == Cell::Open).then_some((nx as usize, ny as usize))
        })
    }

    /// All open cells in row-major order
    pub fn open_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == Cell::Open)
            .map(|(i, _)| (i % self.width, i / self.width))
    }
}

/// World-space centre of a cell
#[inline]
pub fn cell_center(cell: (usize, usize)) -> Vec2 {
    Vec2::new(cell.0 as f32 + 0.5, cell.1 as f32 + 0.5)
}

/// Cell containing a world position (clamped at zero)
#[inline]
pub fn cell_of(pos: Vec2) -> (usize, usize) {
    (pos.x.max(0.0).floor() as usize, pos.y.max(0.0).floor() as usize)
}
