//! Maze Gunner - A ray-cast first-person maze shooter
//!
//! Core modules:
//! - `sim`: Simulation (maze, grid, ray casting, collisions, session phases)
//! - `renderer`: Frame primitives and CPU rasterizer
//! - `hud`: HUD scalars and overlay text
//! - `audio`: Fire-and-forget sound effect dispatch
//! - `config`: Data-driven level table and tuning

pub mod audio;
pub mod config;
pub mod hud;
pub mod renderer;
pub mod sim;

pub use config::{ConfigError, GameConfig, LevelSpec, Tuning};
pub use hud::Hud;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::PI;

    /// Fixed timestep for headless runs (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Largest frame delta the simulation will integrate in one step
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Horizontal field of view (60 degrees)
    pub const FOV: f32 = PI / 3.0;

    /// Ray marching gives up after this many grid units
    pub const MAX_RAY_DISTANCE: f32 = 20.0;
    /// Step delta used when a ray direction component is exactly zero
    pub const INFINITE_DELTA: f32 = 1e30;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 3.0;
    pub const PLAYER_CLEARANCE: f32 = 0.18;
    /// Longest player move between collision checks
    pub const MOVE_SUBSTEP: f32 = 0.25;
    /// Upper bound on configured player and bullet speeds (units per second)
    pub const MAX_SPEED: f32 = 100.0;
    /// Radians of turn per pixel of pointer movement
    pub const MOUSE_SENSITIVITY: f32 = 0.002;

    /// Bullet defaults
    pub const BULLET_SPEED: f32 = 10.0;
    /// Bullets spawn this far in front of the player
    pub const BULLET_SPAWN_OFFSET: f32 = 0.6;
    /// Longest distance a bullet travels between wall/enemy checks
    pub const BULLET_SUBSTEP: f32 = 0.25;
    pub const BULLET_HIT_RADIUS: f32 = 0.5;

    /// Hit flash countdown (seconds)
    pub const HIT_FLASH_DURATION: f32 = 0.3;

    /// Player must be this close to the exit centre to finish a level
    pub const EXIT_RADIUS: f32 = 1.0;

    /// Enemy placement
    pub const ENEMY_MIN_START_DISTANCE: f32 = 3.0;
    pub const MAX_SPAWN_ATTEMPTS: u32 = 1000;

    /// Start cell (grid coordinates)
    pub const START_CELL: (usize, usize) = (1, 1);

    /// Smallest maze edge the generator accepts
    pub const MIN_MAZE_SIZE: usize = 5;
    /// Largest maze edge a config may request
    pub const MAX_MAZE_SIZE: usize = 255;

    /// Minimap edge in pixels
    pub const MINIMAP_SIZE: f32 = 200.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for inputs just below a multiple of it
    if wrapped >= PI { wrapped - TAU } else { wrapped }
}
