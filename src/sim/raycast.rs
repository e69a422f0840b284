//! Grid ray casting (digital differential analyzer)
//!
//! Marches a ray cell by cell, always stepping across whichever grid line
//! (vertical or horizontal) is nearer, until it enters a wall cell.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, Grid};
use crate::consts::{INFINITE_DELTA, MAX_RAY_DISTANCE};

/// Which kind of wall face a ray struck
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallFace {
    /// Crossed a vertical grid line (x-side)
    Vertical,
    /// Crossed a horizontal grid line (y-side)
    Horizontal,
}

/// Result of a ray cast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// Distance along the ray to the struck face (no fisheye correction)
    pub distance: f32,
    /// Struck face, `None` when nothing was hit within `MAX_RAY_DISTANCE`
    pub side: Option<WallFace>,
}

impl RayHit {
    pub fn miss() -> Self {
        Self {
            distance: MAX_RAY_DISTANCE,
            side: None,
        }
    }

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.side.is_some()
    }
}

/// Cast a ray from `origin` at `angle` (radians) through `grid`.
///
/// Leaving the grid counts as hitting a wall.
pub fn cast(origin: Vec2, angle: f32, grid: &Grid) -> RayHit {
    let dir = Vec2::new(angle.cos(), angle.sin());

    let mut map_x = origin.x.floor() as i64;
    let mut map_y = origin.y.floor() as i64;

    let delta_x = if dir.x == 0.0 { INFINITE_DELTA } else { (1.0 / dir.x).abs() };
    let delta_y = if dir.y == 0.0 { INFINITE_DELTA } else { (1.0 / dir.y).abs() };

    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - map_x as f32) * delta_x)
    } else {
        (1, (map_x as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - map_y as f32) * delta_y)
    } else {
        (1, (map_y as f32 + 1.0 - origin.y) * delta_y)
    };

    loop {
        // Distance to the grid line about to be crossed
        let (travelled, face) = if side_x < side_y {
            let t = side_x;
            side_x += delta_x;
            map_x += step_x;
            (t, WallFace::Vertical)
        } else {
            let t = side_y;
            side_y += delta_y;
            map_y += step_y;
            (t, WallFace::Horizontal)
        };

        if travelled >= MAX_RAY_DISTANCE {
            return RayHit::miss();
        }

        if grid.get_signed(map_x, map_y) == Cell::Wall {
            return RayHit {
                distance: travelled,
                side: Some(face),
            };
        }
    }
}
