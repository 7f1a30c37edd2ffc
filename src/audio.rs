//! Sound cues
//!
//! The simulation never plays sounds. It raises [`GameEvent`]s; the
//! [`AudioManager`] maps them to [`SoundEffect`]s and hands those to a
//! backend. Playback failures are logged and ignored.

use core::fmt;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player jumped
    Hop,
    /// Player took damage
    Ouch,
    /// Star or power-up collected
    Collect,
    /// Enemy stomped or knocked out
    Stomp,
    /// Shell kicked
    Kick,
    /// Player grew or gained fire power
    PowerUp,
    /// Stage cleared
    Win,
    /// Game over
    GameOver,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(Self::Hop),
            GameEvent::PlayerHurt => Some(Self::Ouch),
            GameEvent::Collected { .. } => Some(Self::Collect),
            GameEvent::EnemyStomped { .. }
            | GameEvent::EnemyKilled { .. }
            | GameEvent::EnemyShelled { .. } => Some(Self::Stomp),
            GameEvent::ShellKicked { .. } => Some(Self::Kick),
            GameEvent::PoweredUp => Some(Self::PowerUp),
            GameEvent::StageWon { .. } => Some(Self::Win),
            GameEvent::GameOver => Some(Self::GameOver),
            _ => None,
        }
    }

    /// Asset name a backend can look up
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hop => "hop",
            Self::Ouch => "ouch",
            Self::Collect => "collect",
            Self::Stomp => "stomp",
            Self::Kick => "kick",
            Self::PowerUp => "power_up",
            Self::Win => "win",
            Self::GameOver => "game_over",
        }
    }
}

/// A backend could not play a sound
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioError {
    MissingAsset(&'static str),
    DeviceUnavailable,
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAsset(name) => write!(f, "missing sound asset: {name}"),
            Self::DeviceUnavailable => write!(f, "audio device unavailable"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can actually make noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;
}

/// Logs cues instead of playing them (headless runs)
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::trace!("play {} at {volume:.2}", effect.name());
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
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

    /// Take volumes and mute from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
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

    /// Get effective volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect; failures are logged and dropped
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Err(err) = self.backend.play(effect, vol) {
            log::warn!("Could not play {}: {err}", effect.name());
        }
    }

    /// Play the cues for a batch of simulation events
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
    use crate::sim::{CollectibleKind, EntityId};

    /// Records what was played; fails on demand
    #[derive(Default)]
    struct Recorder {
        played: Vec<(SoundEffect, f32)>,
        fail: bool,
    }

    impl AudioBackend for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::DeviceUnavailable);
            }
            self.played.push((effect, volume));
            Ok(())
        }
    }

    #[test]
    fn test_events_map_to_cues() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.handle_events(&[
            GameEvent::Jumped,
            GameEvent::Landed,
            GameEvent::PlayerHurt,
            GameEvent::Collected {
                kind: CollectibleKind::Star,
            },
            GameEvent::EnemyStomped { id: EntityId(4) },
        ]);
        let effects: Vec<_> = audio.backend().played.iter().map(|(e, _)| *e).collect();
        assert_eq!(
            effects,
            vec![
                SoundEffect::Hop,
                SoundEffect::Ouch,
                SoundEffect::Collect,
                SoundEffect::Stomp
            ]
        );
    }

    #[test]
    fn test_muted_skips_backend() {
        let mut audio = AudioManager::new(Recorder::default());
        audio.set_muted(true);
        audio.play(SoundEffect::Hop);
        assert!(audio.backend().played.is_empty());

        audio.set_muted(false);
        audio.set_master_volume(0.0);
        audio.play(SoundEffect::Hop);
        assert!(audio.backend().played.is_empty());
    }

    #[test]
    fn test_volume_from_settings() {
        let mut audio = AudioManager::new(Recorder::default());
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        audio.apply_settings(&settings);
        audio.play(SoundEffect::Win);
        assert_eq!(audio.backend().played, vec![(SoundEffect::Win, 0.25)]);
    }

    #[test]
    fn test_backend_failure_is_absorbed() {
        let mut audio = AudioManager::new(Recorder {
            fail: true,
            ..Recorder::default()
        });
        audio.play(SoundEffect::Ouch);
        assert!(audio.backend().played.is_empty());
    }
}
