//! Level table and gameplay tuning
//!
//! Loaded from JSON by the host; every field falls back to the built-in
//! two-level campaign when omitted.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Parameters for a single level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSpec {
    /// Seconds on the level clock
    pub time_limit_secs: u32,
    pub maze_width: usize,
    pub maze_height: usize,
    /// Enemies placed at level start
    pub enemy_count: usize,
}

impl Default for LevelSpec {
    fn default() -> Self {
        Self {
            time_limit_secs: 120,
            maze_width: 16,
            maze_height: 16,
            enemy_count: 3,
        }
    }
}

/// Gameplay constants that hosts may override
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player_speed: f32,
    /// Half-width of the player's collision square
    pub clearance: f32,
    pub mouse_sensitivity: f32,
    pub bullet_speed: f32,
    /// Enemies are never placed closer than this to the start cell centre
    pub enemy_min_start_distance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            clearance: PLAYER_CLEARANCE,
            mouse_sensitivity: MOUSE_SENSITIVITY,
            bullet_speed: BULLET_SPEED,
            enemy_min_start_distance: ENEMY_MIN_START_DISTANCE,
        }
    }
}

/// Full game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Levels in play order; the level count is the length of this list
    pub levels: Vec<LevelSpec>,
    pub tuning: Tuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            levels: vec![LevelSpec::default(); 2],
            tuning: Tuning::default(),
        }
    }
}

/// Failure to load a configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "failed to read config: {e}"),
            ConfigError::Parse(e) => write!(f, "failed to parse config: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl GameConfig {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded {} level(s) from {}", config.levels.len(), path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject tables the simulation cannot play
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::Invalid("at least one level is required".into()));
        }
        for (i, level) in self.levels.iter().enumerate() {
            let n = i + 1;
            if level.time_limit_secs == 0 {
                return Err(ConfigError::Invalid(format!("level {n}: time limit must be positive")));
            }
            if level.maze_width < MIN_MAZE_SIZE || level.maze_height < MIN_MAZE_SIZE {
                return Err(ConfigError::Invalid(format!(
                    "level {n}: maze must be at least {MIN_MAZE_SIZE}x{MIN_MAZE_SIZE}"
                )));
            }
            if level.maze_width > MAX_MAZE_SIZE || level.maze_height > MAX_MAZE_SIZE {
                return Err(ConfigError::Invalid(format!(
                    "level {n}: maze must be at most {MAX_MAZE_SIZE}x{MAX_MAZE_SIZE}"
                )));
            }
            let interior = (level.maze_width - 2) * (level.maze_height - 2);
            if level.enemy_count > interior {
                return Err(ConfigError::Invalid(format!(
                    "level {n}: {} enemies do not fit in {interior} interior cells",
                    level.enemy_count
                )));
            }
        }
        let t = &self.tuning;
        if !(t.clearance > 0.0 && t.clearance < 0.5) {
            return Err(ConfigError::Invalid("clearance must be in (0, 0.5)".into()));
        }
        let speed_ok = |v: f32| v > 0.0 && v <= MAX_SPEED;
        if !speed_ok(t.player_speed) || !speed_ok(t.bullet_speed) {
            return Err(ConfigError::Invalid(format!("speeds must be in (0, {MAX_SPEED}]")));
        }
        if !(t.mouse_sensitivity.is_finite() && t.mouse_sensitivity > 0.0) {
            return Err(ConfigError::Invalid("mouse sensitivity must be positive".into()));
        }
        if !(t.enemy_min_start_distance.is_finite() && t.enemy_min_start_distance >= 0.0) {
            return Err(ConfigError::Invalid(
                "enemy start distance must be non-negative".into(),
            ));
        }
        Ok(())
    }

    /// Number of configured levels
    pub fn level_count(&self) -> u32 {
        self.levels.len().max(1) as u32
    }

    /// Parameters for a 1-based level ordinal (clamped into the table)
    pub fn level(&self, ordinal: u32) -> LevelSpec {
        let idx = (ordinal.max(1) as usize - 1).min(self.levels.len().saturating_sub(1));
        self.levels.get(idx).copied().unwrap_or_default()
    }
}
