//! Procedural maze generation
//!
//! Randomized depth-first carving over a lattice of step 2, driven by an
//! explicit stack. The result is a perfect maze: every open cell is reachable
//! from the start and there is exactly one path between any two of them.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use crate::consts::{MIN_MAZE_SIZE, START_CELL};

/// Lattice offsets, two cells away along each axis
const LATTICE_DIRS: [(i64, i64); 4] = [(0, 2), (2, 0), (0, -2), (-2, 0)];

/// A generated maze with its spawn and exit cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Maze {
    pub grid: Grid,
    pub start: (usize, usize),
    pub exit: (usize, usize),
}

/// Carve a perfect maze of the given size and pick its exit.
///
/// Sizes below `MIN_MAZE_SIZE` are raised to it. Odd sizes use every interior
/// row and column; with even sizes the last interior row/column stays solid.
pub fn generate<R: Rng + ?Sized>(width: usize, height: usize, rng: &mut R) -> Maze {
    let width = width.max(MIN_MAZE_SIZE);
    let height = height.max(MIN_MAZE_SIZE);
    let mut grid = Grid::filled(width, height);

    let start = START_CELL;
    grid.set(start.0, start.1, Cell::Open);
    let mut stack = vec![start];

    while let Some(&(x, y)) = stack.last() {
        let candidates: Vec<(usize, usize)> = LATTICE_DIRS
            .iter()
            .filter_map(|&(dx, dy)| {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                let inside = nx > 0 && ny > 0 && nx < width as i64 - 1 && ny < height as i64 - 1;
                (inside && grid.get(nx as usize, ny as usize) == Cell::Wall)
                    .then_some((nx as usize, ny as usize))
            })
            .collect();

        if candidates.is_empty() {
            stack.pop();
            continue;
        }

        let (nx, ny) = candidates[rng.random_range(0..candidates.len())];
        grid.set((x + nx) / 2, (y + ny) / 2, Cell::Open);
        grid.set(nx, ny, Cell::Open);
        stack.push((nx, ny));
    }

    let exit = farthest_cell(&grid, start);
    log::debug!("Carved {}x{} maze, exit at {:?}", width, height, exit);

    Maze { grid, start, exit }
}

/// Breadth-first distances (in moves) from `from` to every reachable open cell.
/// Unreachable and wall cells are `None`.
pub fn bfs_depths(grid: &Grid, from: (usize, usize)) -> Vec<Option<u32>> {
    let mut depths = vec![None; grid.width() * grid.height()];
    if !grid.is_open(from.0, from.1) {
        return depths;
    }

    let mut queue = VecDeque::new();
    depths[from.1 * grid.width() + from.0] = Some(0);
    queue.push_back(from);

    while let Some((x, y)) = queue.pop_front() {
        let d = depths[y * grid.width() + x].unwrap_or(0);
        for (nx, ny) in grid.open_neighbors(x, y) {
            let slot = &mut depths[ny * grid.width() + nx];
            if slot.is_none() {
                *slot = Some(d + 1);
                queue.push_back((nx, ny));
            }
        }
    }

    depths
}

/// The reachable cell with the greatest BFS depth from `from`.
///
/// Ties keep the first cell dequeued at that depth. If nothing else is
/// reachable the answer is `from` itself.
pub fn farthest_cell(grid: &Grid, from: (usize, usize)) -> (usize, usize) {
    let mut best = (from, 0u32);
    let mut visited = vec![false; grid.width() * grid.height()];
    let mut queue = VecDeque::new();

    if grid.is_open(from.0, from.1) {
        visited[from.1 * grid.width() + from.0] = true;
        queue.push_back((from, 0u32));
    }

    while let Some(((x, y), d)) = queue.pop_front() {
        if d > best.1 {
            best = ((x, y), d);
        }
        for (nx, ny) in grid.open_neighbors(x, y) {
            let seen = &mut visited[ny * grid.width() + nx];
            if !*seen {
                *seen = true;
                queue.push_back(((nx, ny), d + 1));
            }
        }
    }

    best.0
}

/// Next cell to step into on a shortest path from `from` to `to`, if reachable.
pub fn next_step_towards(
    grid: &Grid,
    from: (usize, usize),
    to: (usize, usize),
) -> Option<(usize, usize)> {
    if from == to {
        return Some(to);
    }
    // Search backwards so the neighbour of `from` with the smallest depth is the next step
    let depths = bfs_depths(grid, to);
    grid.open_neighbors(from.0, from.1)
        .filter_map(|(nx, ny)| depths[ny * grid.width() + nx].map(|d| (d, (nx, ny))))
        .min_by_key(|(d, _)| *d)
        .map(|(_, cell)| cell)
}
