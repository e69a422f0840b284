//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame delta supplied by the caller, clamped per step
//! - Seeded RNG only
//! - Stable iteration order (bullets by firing order, enemies by placement)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod grid;
pub mod input;
pub mod maze;
pub mod raycast;
pub mod spawn;
pub mod state;
pub mod tick;

pub use autopilot::autopilot_input;
pub use collision::{MoveResult, can_occupy, try_move};
pub use grid::{Cell, Grid, cell_center, cell_of};
pub use input::{InputState, Key};
pub use maze::{Maze, bfs_depths, farthest_cell, generate, next_step_towards};
pub use raycast::{RayHit, WallFace, cast};
pub use spawn::spawn_enemies;
pub use state::{
    Aim, AimMode, Bullet, Enemy, GameEvent, GameState, Player, RngState, SessionPhase, Viewport,
};
pub use tick::{MoveKeys, TickInput, start_level, tick};
