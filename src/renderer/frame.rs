//! Ray-cast projection of the game state into screen-space primitives
//!
//! `render_frame` never mutates the simulation. The resulting `Frame` can be
//! drawn by any backend; `Framebuffer` is the bundled CPU rasterizer.

use glam::Vec2;

use super::color::{Rgba, colors};
use crate::consts::{FOV, MINIMAP_SIZE};
use crate::normalize_angle;
use crate::sim::{AimMode, GameState, Viewport, WallFace, cast, cell_center};

/// Projected distances are floored here so the player never divides by zero
const MIN_PROJECTED_DISTANCE: f32 = 1e-3;
/// Markers closer than this are not drawn
const MARKER_MIN_DISTANCE: f32 = 0.5;

/// One screen column of wall
#[derive(Debug, Clone, PartialEq)]
pub struct WallStripe {
    pub column: u32,
    /// Top edge in pixels (may be negative when the wall overfills the view)
    pub top: f32,
    pub height: f32,
    /// Fisheye-corrected distance
    pub distance: f32,
    pub face: Option<WallFace>,
    pub color: Rgba,
}

/// A billboarded enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    /// Index into `GameState::enemies`
    pub enemy: usize,
    pub center: Vec2,
    /// Diameter in pixels, including the hit pulse
    pub size: f32,
    pub distance: f32,
    pub color: Rgba,
}

impl Sprite {
    /// Centres of the two eyes
    pub fn eyes(&self) -> [Vec2; 2] {
        let up = self.size / 8.0;
        let side = self.size / 6.0;
        [
            self.center + Vec2::new(-side, -up),
            self.center + Vec2::new(side, -up),
        ]
    }

    pub fn eye_radius(&self) -> f32 {
        self.size / 12.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    Exit,
}

impl MarkerKind {
    pub fn label(&self) -> &'static str {
        match self {
            MarkerKind::Start => "START",
            MarkerKind::Exit => "EXIT",
        }
    }
}

/// A labelled square floating at a level endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub center: Vec2,
    pub size: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reticle {
    pub pos: Vec2,
    pub color: Rgba,
}

/// Axis-aligned filled rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
    pub color: Rgba,
}

impl Rect {
    /// Square of side `size` centred on `center`
    pub fn centered(center: Vec2, size: f32, color: Rgba) -> Self {
        Self {
            min: center - Vec2::splat(size / 2.0),
            size: Vec2::splat(size),
            color,
        }
    }
}

/// Top-down overview, in its own pixel space of `size` x `size`
#[derive(Debug, Clone, PartialEq)]
pub struct Minimap {
    pub size: f32,
    /// Pixels per grid unit
    pub scale: f32,
    pub background: Rgba,
    pub walls: Vec<Rect>,
    pub start: Rect,
    pub exit: Rect,
    pub player: Rect,
    pub enemies: Vec<Rect>,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    /// Sky above, floor below this row
    pub horizon: f32,
    pub sky: Rgba,
    pub floor: Rgba,
    pub walls: Vec<WallStripe>,
    /// Far to near
    pub sprites: Vec<Sprite>,
    pub markers: Vec<Marker>,
    pub reticle: Reticle,
    pub minimap: Minimap,
}

/// Wall colour for a face at a corrected distance
pub fn wall_color(face: Option<WallFace>, distance: f32) -> Rgba {
    let factor = match face {
        Some(WallFace::Horizontal) => colors::HORIZONTAL_FACE,
        _ => 1.0,
    };
    colors::WALL.shaded(factor, (distance * colors::WALL_FOG).min(255.0))
}

/// Horizontal screen position of a bearing `diff` radians off the view direction
fn screen_x(diff: f32, width: f32) -> f32 {
    width / 2.0 + diff.tan() * width / FOV
}

/// Project `state` into a frame of `viewport` size
pub fn render_frame(state: &GameState, viewport: Viewport) -> Frame {
    let width = viewport.width.max(1.0) as u32;
    let height = viewport.height.max(1.0);
    let player = &state.player;

    let walls = (0..width)
        .map(|column| {
            let ray = player.angle + (column as f32 / width as f32 - 0.5) * FOV;
            let hit = cast(player.pos, ray, &state.maze.grid);
            let distance = (hit.distance * (ray - player.angle).cos()).max(MIN_PROJECTED_DISTANCE);
            let wall_height = height / distance;
            WallStripe {
                column,
                top: (height - wall_height) / 2.0,
                height: wall_height,
                distance,
                face: hit.side,
                color: wall_color(hit.side, distance),
            }
        })
        .collect();

    Frame {
        width,
        height: height as u32,
        horizon: height / 2.0,
        sky: colors::SKY,
        floor: colors::FLOOR,
        walls,
        sprites: project_sprites(state, viewport),
        markers: project_markers(state, viewport),
        reticle: reticle(state, viewport),
        minimap: minimap(state),
    }
}

/// Enemies with a clear line of sight, sorted far to near
fn project_sprites(state: &GameState, viewport: Viewport) -> Vec<Sprite> {
    let player = &state.player;
    let mut sprites: Vec<Sprite> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive || e.is_flashing())
        .filter_map(|(i, e)| {
            let offset = e.pos - player.pos;
            let distance = offset.length();
            if distance < MIN_PROJECTED_DISTANCE {
                return None;
            }
            let bearing = offset.y.atan2(offset.x);
            let diff = normalize_angle(bearing - player.angle);
            if diff.abs() >= std::f32::consts::FRAC_PI_2 {
                return None;
            }
            if cast(player.pos, bearing, &state.maze.grid).distance < distance {
                return None;
            }

            let size = viewport.height / distance;
            let bob = (e.time * 3.0).sin() * size * 0.07;
            let pulse = if e.is_flashing() {
                1.0 + (e.hit_time * 20.0).sin() * 0.3
            } else {
                1.0
            };
            Some(Sprite {
                enemy: i,
                center: Vec2::new(screen_x(diff, viewport.width), viewport.height / 2.0 + bob),
                size: size * pulse,
                distance,
                color: if e.is_flashing() {
                    colors::ENEMY_HIT
                } else {
                    colors::ENEMY
                },
            })
        })
        .collect();

    sprites.sort_by(|a, b| b.distance.total_cmp(&a.distance));
    sprites
}

fn project_markers(state: &GameState, viewport: Viewport) -> Vec<Marker> {
    let endpoints = [
        (MarkerKind::Start, state.maze.start, colors::START_MARKER),
        (MarkerKind::Exit, state.maze.exit, colors::EXIT_MARKER),
    ];

    endpoints
        .into_iter()
        .filter_map(|(kind, cell, color)| {
            let offset = cell_center(cell) - state.player.pos;
            let distance = offset.length();
            if distance <= MARKER_MIN_DISTANCE {
                return None;
            }
            let diff = normalize_angle(offset.y.atan2(offset.x) - state.player.angle);
            if diff.abs() >= FOV / 2.0 {
                return None;
            }
            Some(Marker {
                kind,
                center: Vec2::new(screen_x(diff, viewport.width), viewport.height / 2.0),
                size: viewport.height / distance / 4.0,
                color,
            })
        })
        .collect()
}

fn reticle(state: &GameState, viewport: Viewport) -> Reticle {
    // The aim is kept in the simulation's viewport; rescale it to the target size
    let scale = Vec2::new(
        viewport.width / state.viewport.width,
        viewport.height / state.viewport.height,
    );
    Reticle {
        pos: state.aim.reticle * scale,
        color: match state.aim.mode {
            AimMode::Locked => colors::RETICLE_LOCKED,
            AimMode::FreeAim => colors::RETICLE_FREE,
        },
    }
}

/// Build the fixed-size top-down overview
pub fn minimap(state: &GameState) -> Minimap {
    let grid = &state.maze.grid;
    let scale = MINIMAP_SIZE / grid.width().max(1) as f32;

    let walls = (0..grid.height())
        .flat_map(|y| (0..grid.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| !grid.is_open(x, y))
        .map(|(x, y)| Rect {
            min: Vec2::new(x as f32, y as f32) * scale,
            size: Vec2::splat(scale),
            color: colors::MINIMAP_WALL,
        })
        .collect();

    let enemies = state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .map(|e| Rect::centered(e.pos * scale, 6.0, colors::MINIMAP_ENEMY))
        .collect();

    Minimap {
        size: MINIMAP_SIZE,
        scale,
        background: colors::MINIMAP_BACKGROUND,
        walls,
        start: Rect::centered(state.start_point() * scale, 10.0, colors::MINIMAP_START),
        exit: Rect::centered(state.exit_point() * scale, 10.0, colors::MINIMAP_EXIT),
        player: Rect::centered(state.player.pos * scale, 8.0, colors::MINIMAP_PLAYER),
        enemies,
    }
}
