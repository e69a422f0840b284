//! Collision detection and response against the wall grid
//!
//! An entity is a square of half-width `clearance` centred on its position.
//! Moves are resolved one axis at a time, which lets the player slide along a
//! wall when only the perpendicular component is blocked.

use glam::Vec2;

use super::grid::Grid;

/// Result of a per-axis move attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    /// Position after the move
    pub pos: Vec2,
    /// The X component was applied
    pub moved_x: bool,
    /// The Y component was applied
    pub moved_y: bool,
}

impl MoveResult {
    #[inline]
    pub fn moved(&self) -> bool {
        self.moved_x || self.moved_y
    }
}

/// Whether a square footprint of half-width `clearance` at `pos` touches only open cells
pub fn can_occupy(pos: Vec2, grid: &Grid, clearance: f32) -> bool {
    let corners = [
        Vec2::new(pos.x - clearance, pos.y - clearance),
        Vec2::new(pos.x + clearance, pos.y - clearance),
        Vec2::new(pos.x - clearance, pos.y + clearance),
        Vec2::new(pos.x + clearance, pos.y + clearance),
    ];
    corners.iter().all(|&c| !grid.is_wall_at(c))
}

/// Apply `delta` to `pos`, X first then Y, keeping each non-zero component
/// only if the footprint stays clear.
pub fn try_move(pos: Vec2, delta: Vec2, grid: &Grid, clearance: f32) -> MoveResult {
    let mut result = MoveResult {
        pos,
        moved_x: false,
        moved_y: false,
    };

    let stepped_x = Vec2::new(pos.x + delta.x, pos.y);
    if delta.x != 0.0 && can_occupy(stepped_x, grid, clearance) {
        result.pos = stepped_x;
        result.moved_x = true;
    }

    let stepped_y = Vec2::new(result.pos.x, result.pos.y + delta.y);
    if delta.y != 0.0 && can_occupy(stepped_y, grid, clearance) {
        result.pos = stepped_y;
        result.moved_y = true;
    }

    result
}
