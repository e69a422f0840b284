//! HUD values and overlay text
//!
//! Read-only views over `GameState` for the presentation layer.

use crate::sim::{GameState, SessionPhase};

/// Scalars shown in the heads-up display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub level: u32,
    pub level_count: u32,
    pub time_left: u32,
    pub enemies_remaining: usize,
    pub phase: SessionPhase,
}

/// Centred message shown on idle and paused screens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub title: String,
    pub lines: Vec<String>,
    pub prompt: &'static str,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            score: state.score,
            level: state.level,
            level_count: state.level_count(),
            time_left: state.time_left,
            enemies_remaining: state.enemies_remaining(),
            phase: state.phase,
        }
    }

    /// Remaining time as `m:ss`
    pub fn time_label(&self) -> String {
        format!("{}:{:02}", self.time_left / 60, self.time_left % 60)
    }

    /// One-line summary: score, level, clock and enemies
    pub fn status_line(&self) -> String {
        format!(
            "Score: {} | Level: {} | Time: {} | Enemies: {}",
            self.score,
            self.level,
            self.time_label(),
            self.enemies_remaining
        )
    }

    /// Overlay for the current phase; `None` during play
    pub fn overlay(&self) -> Option<Overlay> {
        let overlay = match self.phase {
            SessionPhase::Playing => return None,
            SessionPhase::Menu => Overlay {
                title: "MAZE GUNNER".into(),
                lines: vec![
                    "WASD/Arrows: Move | Mouse: Aim".into(),
                    "Click: Fire | ESC: Pause".into(),
                    format!("Kill all enemies & reach EXIT. Clear {} levels to win.", self.level_count),
                    format!("LEVEL: {} | SCORE: {}", self.level, self.score),
                ],
                prompt: "CLICK TO START",
            },
            SessionPhase::Paused => Overlay {
                title: "PAUSED".into(),
                lines: Vec::new(),
                prompt: "Press ESC to Resume",
            },
            // `level` already points at the next level here
            SessionPhase::LevelComplete => Overlay {
                title: format!("LEVEL {} COMPLETE!", self.level.saturating_sub(1)),
                lines: vec![
                    format!("Score: {}", self.score),
                    format!("Next: Level {}", self.level),
                ],
                prompt: "Click to Continue",
            },
            SessionPhase::GameComplete { final_score } => Overlay {
                title: "GAME COMPLETE!".into(),
                lines: vec![format!("Final Score: {final_score}")],
                prompt: "Click to Play Again",
            },
            SessionPhase::TimedOut => Overlay {
                title: "TIME'S UP!".into(),
                lines: vec![format!("Score: {}", self.score)],
                prompt: "Click to Retry",
            },
        };
        Some(overlay)
    }
}
