//! Audio collaborator
//!
//! Sound effects and background music are cues driven by game events. Actual
//! playback lives behind [`AudioBackend`]; failures are logged and dropped.

use thiserror::Error;

use crate::session::Subscriber;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ship fired a bullet
    Shoot,
    /// Enemy destroyed
    Explosion,
    /// Ship took a hit
    Hit,
}

impl SoundEffect {
    /// Asset file for backends that play samples
    pub fn asset_path(&self) -> &'static str {
        match self {
            SoundEffect::Shoot => "sounds/shoot.wav",
            SoundEffect::Explosion => "sounds/explosion.wav",
            SoundEffect::Hit => "sounds/hit.wav",
        }
    }
}

pub const MUSIC_ASSET: &str = "sounds/background.mp3";

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio device unavailable: {0}")]
    Unavailable(String),
    #[error("failed to play {0}: {1}")]
    Playback(&'static str, String),
}

/// Playback device
pub trait AudioBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError>;

    fn start_music(&mut self, volume: f32) -> Result<(), AudioError>;

    fn pause_music(&mut self) -> Result<(), AudioError>;

    fn resume_music(&mut self) -> Result<(), AudioError>;

    fn stop_music(&mut self) -> Result<(), AudioError>;
}

/// Backend that only logs cues, for headless runs
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play_effect(&mut self, effect: SoundEffect, volume: f32) -> Result<(), AudioError> {
        log::debug!("sfx {:?} ({}) at {:.2}", effect, effect.asset_path(), volume);
        Ok(())
    }

    fn start_music(&mut self, volume: f32) -> Result<(), AudioError> {
        log::debug!("music start ({}) at {:.2}", MUSIC_ASSET, volume);
        Ok(())
    }

    fn pause_music(&mut self) -> Result<(), AudioError> {
        log::debug!("music pause");
        Ok(())
    }

    fn resume_music(&mut self) -> Result<(), AudioError> {
        log::debug!("music resume");
        Ok(())
    }

    fn stop_music(&mut self) -> Result<(), AudioError> {
        log::debug!("music stop");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Music {
    Stopped,
    Playing,
    Paused,
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
    enabled: bool,
    /// Game phase as seen through events: None outside a game, Some(paused)
    game: Option<bool>,
    music: Music,
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
            enabled: true,
            game: None,
            music: Music::Stopped,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_music_playing(&self) -> bool {
        self.music == Music::Playing
    }

    /// Get effective effect volume
    pub fn effective_volume(&self) -> f32 {
        if self.muted || !self.enabled {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn music_level(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Switch audio on or off. Turning it back on mid-game restarts the music.
    pub fn toggle_enabled(&mut self) -> bool {
        self.enabled = !self.enabled;
        if self.enabled {
            if self.game == Some(false) {
                self.start_music();
            }
        } else {
            self.stop_music();
        }
        log::info!("Audio {}", if self.enabled { "enabled" } else { "disabled" });
        self.enabled
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        if let Err(err) = self.backend.play_effect(effect, vol) {
            log::warn!("Sound effect dropped: {}", err);
        }
    }

    fn start_music(&mut self) {
        if !self.enabled {
            return;
        }
        let level = self.music_level();
        match self.backend.start_music(level) {
            Ok(()) => self.music = Music::Playing,
            Err(err) => log::warn!("Music failed to start: {}", err),
        }
    }

    fn pause_music(&mut self) {
        if self.music != Music::Playing {
            return;
        }
        match self.backend.pause_music() {
            Ok(()) => self.music = Music::Paused,
            Err(err) => log::warn!("Music failed to pause: {}", err),
        }
    }

    fn resume_music(&mut self) {
        match self.music {
            Music::Paused => match self.backend.resume_music() {
                Ok(()) => self.music = Music::Playing,
                Err(err) => log::warn!("Music failed to resume: {}", err),
            },
            Music::Stopped => self.start_music(),
            Music::Playing => {}
        }
    }

    fn stop_music(&mut self) {
        if self.music == Music::Stopped {
            return;
        }
        if let Err(err) = self.backend.stop_music() {
            log::warn!("Music failed to stop: {}", err);
        }
        self.music = Music::Stopped;
    }
}

impl<B: AudioBackend> Subscriber for AudioManager<B> {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::ShipFired => self.play(SoundEffect::Shoot),
            GameEvent::EnemyDestroyed { .. } => self.play(SoundEffect::Explosion),
            GameEvent::ShipHit { .. } => self.play(SoundEffect::Hit),
            GameEvent::Started { .. } => {
                self.game = Some(false);
                self.stop_music();
                self.start_music();
            }
            GameEvent::Paused => {
                self.game = Some(true);
                self.pause_music();
            }
            GameEvent::Resumed => {
                self.game = Some(false);
                self.resume_music();
            }
            GameEvent::Ended(_) | GameEvent::Quit => {
                self.game = None;
                self.stop_music();
            }
            GameEvent::SpeedEscalated { .. } | GameEvent::Feint { .. } => {}
        }
    }
}
