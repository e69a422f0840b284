//! Enemy placement
//!
//! Rejection sampling over interior cells, bounded by `MAX_SPAWN_ATTEMPTS`.
//! When sampling keeps failing the remaining enemies are placed by scanning
//! eligible cells in row-major order, so placement always terminates.

use rand::Rng;

use super::grid::{Grid, cell_center};
use super::state::Enemy;
use crate::consts::MAX_SPAWN_ATTEMPTS;

/// Whether an enemy may stand in `cell`
fn eligible(grid: &Grid, cell: (usize, usize), start: (usize, usize), min_distance: f32) -> bool {
    grid.is_open(cell.0, cell.1)
        && cell_center(cell).distance(cell_center(start)) >= min_distance
}

/// Place up to `count` enemies on distinct open cells at least `min_distance`
/// from the start cell centre. Fewer are returned only if the maze has fewer
/// eligible cells.
pub fn spawn_enemies<R: Rng + ?Sized>(
    grid: &Grid,
    start: (usize, usize),
    count: usize,
    min_distance: f32,
    rng: &mut R,
) -> Vec<Enemy> {
    let cells = grid.width() * grid.height();
    let mut taken: Vec<(usize, usize)> = Vec::with_capacity(count.min(cells));
    let interior_w = grid.width().saturating_sub(2);
    let interior_h = grid.height().saturating_sub(2);

    let mut attempts = 0;
    if interior_w > 0 && interior_h > 0 {
        while taken.len() < count && attempts < MAX_SPAWN_ATTEMPTS {
            attempts += 1;
            let cell = (
                rng.random_range(0..interior_w) + 1,
                rng.random_range(0..interior_h) + 1,
            );
            if eligible(grid, cell, start, min_distance) && !taken.contains(&cell) {
                taken.push(cell);
            }
        }
    }

    if taken.len() < count {
        log::debug!(
            "Random placement found {} of {} enemies after {} attempts, scanning",
            taken.len(),
            count,
            attempts
        );
        let fallback: Vec<_> = grid
            .open_cells()
            .filter(|&c| eligible(grid, c, start, min_distance) && !taken.contains(&c))
            .take(count - taken.len())
            .collect();
        taken.extend(fallback);
    }

    if taken.len() < count {
        log::warn!(
            "Maze only has room for {} of {} requested enemies",
            taken.len(),
            count
        );
    }

    taken.into_iter().map(|c| Enemy::new(cell_center(c))).collect()
}
