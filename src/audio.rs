//! Sound effect dispatch
//!
//! The game only decides *which* effect plays and how loud; producing sound is
//! left to an `AudioBackend` supplied by the host. Playback is fire-and-forget:
//! a failing backend is logged and otherwise ignored.

use std::fmt;

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bullet fired
    Shoot,
    /// Enemy killed
    Hit,
    /// Level cleared
    LevelComplete,
    /// Final level cleared
    GameComplete,
    /// Level clock ran out
    Timeout,
}

impl SoundEffect {
    /// Effect triggered by a simulation event, if any
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Fired => Some(SoundEffect::Shoot),
            GameEvent::EnemyKilled { .. } => Some(SoundEffect::Hit),
            GameEvent::LevelComplete { .. } => Some(SoundEffect::LevelComplete),
            GameEvent::GameComplete { .. } => Some(SoundEffect::GameComplete),
            GameEvent::TimedOut => Some(SoundEffect::Timeout),
            _ => None,
        }
    }
}

/// Playback failure reported by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioError(pub String);

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "audio playback failed: {}", self.0)
    }
}

impl std::error::Error for AudioError {}

/// Something that can play an effect at a volume in 0.0..=1.0
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Backend that plays nothing
#[derive(Debug, Default)]
pub struct Silent;

impl AudioBackend for Silent {
    fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend = Silent> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager<Silent> {
    fn default() -> Self {
        Self::new(Silent)
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Err(e) = self.backend.play(effect, vol) {
            log::warn!("Dropped {:?}: {}", effect, e);
        }
    }

    /// Play the effects for a batch of drained events, in order
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.play(effect);
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        played: Vec<(SoundEffect, f32)>,
    }

    impl AudioBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
            self.played.push((effect, volume));
            Ok(())
        }
    }

    struct Broken;

    impl AudioBackend for Broken {
        fn play(&mut self, _effect: SoundEffect, _volume: f32) -> Result<(), AudioError> {
            Err(AudioError("device unplugged".into()))
        }
    }

    #[test]
    fn test_events_map_to_effects() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.handle_events(&[
            GameEvent::LevelStarted { level: 1 },
            GameEvent::Fired,
            GameEvent::EnemyKilled { enemy: 0 },
            GameEvent::PointerCapture(false),
            GameEvent::TimedOut,
        ]);
        let effects: Vec<_> = audio.backend().played.iter().map(|(e, _)| *e).collect();
        assert_eq!(effects, vec![SoundEffect::Shoot, SoundEffect::Hit, SoundEffect::Timeout]);
    }

    #[test]
    fn test_volume_and_mute() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        audio.play(SoundEffect::Shoot);
        assert_eq!(audio.backend().played, vec![(SoundEffect::Shoot, 0.5)]);

        audio.set_muted(true);
        audio.play(SoundEffect::Hit);
        assert_eq!(audio.backend().played.len(), 1);
    }

    #[test]
    fn test_backend_failure_is_swallowed() {
        let mut audio = AudioManager::new(Broken);
        audio.handle_events(&[GameEvent::Fired, GameEvent::GameComplete { final_score: 3 }]);
        assert!(!audio.is_muted());
    }
}
