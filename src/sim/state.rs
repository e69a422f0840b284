//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`; the renderer and
//! the HUD only ever borrow it immutably.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::cell_center;
use super::maze::Maze;
use crate::config::GameConfig;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Title screen, waiting for start
    Menu,
    /// Active gameplay
    Playing,
    /// Gameplay suspended; the frame is still rendered
    Paused,
    /// A level was cleared; `level` already points at the next one
    LevelComplete,
    /// The final level was cleared; progress has been reset
    GameComplete { final_score: u32 },
    /// The level clock ran out; the next start retries the same level
    TimedOut,
}

impl SessionPhase {
    /// Phases in which a start action begins a level
    pub fn is_idle(&self) -> bool {
        matches!(
            self,
            SessionPhase::Menu
                | SessionPhase::LevelComplete
                | SessionPhase::GameComplete { .. }
                | SessionPhase::TimedOut
        )
    }
}

/// One-shot notifications for the presentation layer (drained each frame)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LevelStarted { level: u32 },
    Fired,
    EnemyKilled { enemy: usize },
    LevelComplete { level: u32 },
    GameComplete { final_score: u32 },
    TimedOut,
    Paused,
    Resumed,
    Exited,
    /// Request (true) or release (false) exclusive pointer capture
    PointerCapture(bool),
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Position in grid units
    pub pos: Vec2,
    /// Facing angle (radians)
    pub angle: f32,
    /// Movement speed (units/second)
    pub speed: f32,
    /// Direction of the most recent accepted move
    pub last_move_angle: f32,
}

impl Player {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self {
            pos,
            angle: 0.0,
            speed,
            last_move_angle: 0.0,
        }
    }

    /// Unit vector along the facing angle
    #[inline]
    pub fn facing(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }
}

/// A projectile travelling at a fixed angle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub angle: f32,
    pub speed: f32,
}

/// A stationary target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub alive: bool,
    /// Age in seconds (drives the idle bob)
    pub time: f32,
    /// Hit flash countdown (seconds)
    pub hit_time: f32,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            alive: true,
            time: 0.0,
            hit_time: 0.0,
        }
    }

    /// Whether the hit flash is still running
    #[inline]
    pub fn is_flashing(&self) -> bool {
        self.hit_time > 0.0
    }
}

/// How the aim reticle follows the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AimMode {
    /// Pointer captured: relative deltas turn the view and nudge the reticle
    Locked,
    /// Pointer free: the reticle sits wherever the pointer is
    #[default]
    FreeAim,
}

/// Aim reticle in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    pub mode: AimMode,
    pub reticle: Vec2,
}

/// Size of the first-person view in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Clamp a screen position into the viewport
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator for the next level; advances the stream
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream.wrapping_mul(2).wrapping_add(1));
        self.stream += 1;
        rng
    }
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// RNG state
    pub rng_state: RngState,
    /// Level table and tuning
    pub config: GameConfig,
    /// Current level (1-based)
    pub level: u32,
    /// Enemies killed this game
    pub score: u32,
    /// Whole seconds left on the level clock
    pub time_left: u32,
    /// Playing time accumulated toward the next clock tick
    pub clock_accumulator: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Current phase
    pub phase: SessionPhase,
    /// Current maze
    pub maze: Maze,
    pub player: Player,
    /// Live bullets in firing order
    pub bullets: Vec<Bullet>,
    /// Enemies in placement order
    pub enemies: Vec<Enemy>,
    pub aim: Aim,
    pub viewport: Viewport,
    /// Pending notifications
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session sitting on the menu
    pub fn new(seed: u64, config: GameConfig) -> Self {
        let mut rng_state = RngState::new(seed);
        let first = config.level(1);
        let maze = super::maze::generate(first.maze_width, first.maze_height, &mut rng_state.next_rng());
        let player = Player::new(cell_center(maze.start), config.tuning.player_speed);
        let viewport = Viewport::default();

        Self {
            seed,
            rng_state,
            time_left: first.time_limit_secs,
            config,
            level: 1,
            score: 0,
            clock_accumulator: 0.0,
            time_ticks: 0,
            phase: SessionPhase::Menu,
            maze,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            aim: Aim {
                mode: AimMode::FreeAim,
                reticle: viewport.center(),
            },
            viewport,
            events: Vec::new(),
        }
    }

    /// Number of configured levels
    pub fn level_count(&self) -> u32 {
        self.config.level_count()
    }

    pub fn enemies_remaining(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    pub fn start_point(&self) -> Vec2 {
        cell_center(self.maze.start)
    }

    pub fn exit_point(&self) -> Vec2 {
        cell_center(self.maze.exit)
    }

    /// Resize the first-person view, keeping the reticle inside it
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.aim.reticle = viewport.clamp(self.aim.reticle);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
