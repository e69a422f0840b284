//! Input accumulation between simulation steps
//!
//! Event handlers only record into `InputState`; the frame loop calls
//! `take_tick_input` once per step, which consumes pointer deltas and one-shot
//! actions. A step therefore sees the same input no matter how many events
//! arrived since the previous one.

use glam::Vec2;

use super::tick::{MoveKeys, TickInput};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Escape,
}

impl Key {
    /// Map a DOM-style key code (`KeyW`, `ArrowUp`, ...) to a game key
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KeyW" | "ArrowUp" => Some(Key::Forward),
            "KeyS" | "ArrowDown" => Some(Key::Back),
            "KeyA" | "ArrowLeft" => Some(Key::StrafeLeft),
            "KeyD" | "ArrowRight" => Some(Key::StrafeRight),
            "Escape" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Input collected from the host between steps
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: MoveKeys,
    pointer_delta: Vec2,
    pointer_position: Option<Vec2>,
    pointer_locked: bool,
    fire: bool,
    start: bool,
    exit: bool,
    escape: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        self.set_key(key, true);
    }

    pub fn key_up(&mut self, key: Key) {
        self.set_key(key, false);
    }

    /// Convenience for hosts that deliver raw key codes; unknown codes are ignored
    pub fn key_code(&mut self, code: &str, pressed: bool) {
        if let Some(key) = Key::from_code(code) {
            self.set_key(key, pressed);
        }
    }

    fn set_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::Forward => self.held.forward = pressed,
            Key::Back => self.held.back = pressed,
            Key::StrafeLeft => self.held.strafe_left = pressed,
            Key::StrafeRight => self.held.strafe_right = pressed,
            // Escape is edge-triggered
            Key::Escape => {
                if pressed {
                    self.escape = true;
                }
            }
        }
    }

    /// Pointer moved. Relative motion is accumulated while captured; otherwise
    /// the absolute position is kept for free aiming.
    pub fn pointer_moved(&mut self, delta: Vec2, position: Vec2) {
        if self.pointer_locked {
            self.pointer_delta += delta;
        } else {
            self.pointer_position = Some(position);
        }
    }

    /// Host reports a change of pointer capture
    pub fn set_pointer_locked(&mut self, locked: bool) {
        self.pointer_locked = locked;
        if !locked {
            self.pointer_delta = Vec2::ZERO;
        }
    }

    pub fn pointer_locked(&self) -> bool {
        self.pointer_locked
    }

    /// Primary button pressed: fires while playing, starts a level otherwise
    pub fn click(&mut self, position: Vec2) {
        if !self.pointer_locked {
            self.pointer_position = Some(position);
        }
        self.fire = true;
        self.start = true;
    }

    /// On-screen exit control pressed
    pub fn exit_pressed(&mut self) {
        self.exit = true;
    }

    /// Drain everything accumulated since the last step
    pub fn take_tick_input(&mut self) -> TickInput {
        let escape = std::mem::take(&mut self.escape);
        TickInput {
            movement: self.held,
            pointer_delta: std::mem::take(&mut self.pointer_delta),
            pointer_position: self.pointer_position.take(),
            pointer_locked: self.pointer_locked,
            fire: std::mem::take(&mut self.fire),
            start: std::mem::take(&mut self.start),
            exit: std::mem::take(&mut self.exit),
            // Escape toggles pause in play and resets progress on idle screens
            pause: escape,
            reset: escape,
        }
    }
}
