//! Demo mode: a computer player that produces `TickInput`
//!
//! Starts levels from idle screens, shoots any enemy it has a clear line to and
//! otherwise walks the shortest path toward the closest enemy or, once the level
//! is clear, the exit.

use glam::Vec2;

use super::grid::{cell_center, cell_of};
use super::maze::{bfs_depths, next_step_towards};
use super::raycast::cast;
use super::state::{GameState, SessionPhase};
use super::tick::{MoveKeys, TickInput};
use crate::consts::FOV;
use crate::normalize_angle;

/// Largest pointer motion produced per step (pixels)
const MAX_TURN_PIXELS: f32 = 40.0;
/// Fire once the shot would land this close to the target bearing (radians)
const AIM_TOLERANCE: f32 = 0.03;
/// Walk forward only while roughly facing the next waypoint (radians)
const WALK_TOLERANCE: f32 = 0.4;

/// Compute the input the demo player would give this step
pub fn autopilot_input(state: &GameState) -> TickInput {
    match state.phase {
        phase if phase.is_idle() => {
            return TickInput {
                start: true,
                ..Default::default()
            };
        }
        SessionPhase::Paused => {
            return TickInput {
                pause: true,
                ..Default::default()
            };
        }
        _ => {}
    }

    let mut input = TickInput {
        pointer_locked: true,
        ..Default::default()
    };

    if let Some(target) = visible_enemy(state) {
        // Pointer motion turns the view and drags the locked reticle with it,
        // so both contribute to where the next shot goes.
        let per_pixel = state.config.tuning.mouse_sensitivity + FOV / state.viewport.width;
        let error = normalize_angle(bearing(state.player.pos, target) - firing_angle(state));
        input.pointer_delta.x = (error / per_pixel).clamp(-MAX_TURN_PIXELS, MAX_TURN_PIXELS);
        input.fire = error.abs() < AIM_TOLERANCE && state.bullets.is_empty();
        return input;
    }

    if let Some(waypoint) = next_waypoint(state) {
        let error = normalize_angle(bearing(state.player.pos, waypoint) - state.player.angle);
        input.pointer_delta.x = (error / state.config.tuning.mouse_sensitivity)
            .clamp(-MAX_TURN_PIXELS, MAX_TURN_PIXELS);
        input.movement = MoveKeys {
            forward: error.abs() < WALK_TOLERANCE,
            ..Default::default()
        };
    }

    input
}

fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Direction a bullet fired now would travel
fn firing_angle(state: &GameState) -> f32 {
    state.player.angle + (state.aim.reticle.x / state.viewport.width - 0.5) * FOV
}

/// Nearest living enemy with nothing but open floor in between
fn visible_enemy(state: &GameState) -> Option<Vec2> {
    let origin = state.player.pos;
    state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .filter_map(|e| {
            let dist = origin.distance(e.pos);
            let hit = cast(origin, bearing(origin, e.pos), &state.maze.grid);
            (hit.distance >= dist).then_some((dist, e.pos))
        })
        .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(_, pos)| pos)
}

/// Centre of the next cell on the path to the closest living enemy, or to the exit
fn next_waypoint(state: &GameState) -> Option<Vec2> {
    let grid = &state.maze.grid;
    let here = cell_of(state.player.pos);
    let depths = bfs_depths(grid, here);
    let goal = state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .map(|e| cell_of(e.pos))
        .filter_map(|(x, y)| {
            let depth = depths.get(y * grid.width() + x).copied().flatten()?;
            Some((depth, (x, y)))
        })
        .min_by_key(|(d, _)| *d)
        .map(|(_, cell)| cell)
        .unwrap_or(state.maze.exit);
    next_step_towards(grid, here, goal).map(cell_center)
}
