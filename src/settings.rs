//! Per-game configuration
//!
//! Chosen on the configuration screen before a game and fixed for its
//! duration. Persisted as JSON so the last choice is remembered.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::DEFAULT_GAME_SECS;

/// Configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unsupported shoot key `{0}` (expected Space or KeyA..KeyZ)")]
    ShootKey(String),
    #[error("unknown background `{0}`")]
    Background(String),
    #[error("game duration must be a whole number of minutes (at least one), got {0}s")]
    Duration(u32),
    #[error("config i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key that triggers shooting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ShootKey {
    #[default]
    Space,
    /// A letter key, stored uppercase
    Letter(char),
}

impl ShootKey {
    /// Every selectable key: Space then A..Z
    pub fn options() -> impl Iterator<Item = ShootKey> {
        std::iter::once(ShootKey::Space).chain(('A'..='Z').map(ShootKey::Letter))
    }

    /// Parse a DOM-style key code (`Space`, `KeyA`..`KeyZ`)
    pub fn from_code(code: &str) -> Result<Self, ConfigError> {
        if code == "Space" {
            return Ok(ShootKey::Space);
        }
        let mut rest = code.strip_prefix("Key").unwrap_or_default().chars();
        match (rest.next(), rest.next()) {
            (Some(c), None) if c.is_ascii_uppercase() => Ok(ShootKey::Letter(c)),
            _ => Err(ConfigError::ShootKey(code.to_string())),
        }
    }

    /// Key code as reported by key events
    pub fn code(&self) -> String {
        match self {
            ShootKey::Space => "Space".to_string(),
            ShootKey::Letter(c) => format!("Key{c}"),
        }
    }

    pub fn matches(&self, code: &str) -> bool {
        match self {
            ShootKey::Space => code == "Space",
            ShootKey::Letter(c) => code.strip_prefix("Key").is_some_and(|rest| {
                let mut chars = rest.chars();
                chars.next() == Some(*c) && chars.next().is_none()
            }),
        }
    }
}

impl fmt::Display for ShootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShootKey::Space => write!(f, "Space"),
            ShootKey::Letter(c) => write!(f, "{c}"),
        }
    }
}

impl TryFrom<String> for ShootKey {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        ShootKey::from_code(&value)
    }
}

impl From<ShootKey> for String {
    fn from(key: ShootKey) -> Self {
        key.code()
    }
}

/// Backdrop behind the play field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Background {
    #[default]
    Earth,
    Mars,
    Moon,
    Space,
    Galaxy,
}

impl Background {
    pub const ALL: [Background; 5] = [
        Background::Earth,
        Background::Mars,
        Background::Moon,
        Background::Space,
        Background::Galaxy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Background::Earth => "earth",
            Background::Mars => "mars",
            Background::Moon => "moon",
            Background::Space => "space",
            Background::Galaxy => "galaxy",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|bg| bg.as_str().eq_ignore_ascii_case(s))
    }

    /// Image the renderer should load
    pub fn asset_path(&self) -> String {
        format!("assets/images/backgrounds/{}.jpg", self.as_str())
    }
}

/// Configuration for one game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub shoot_key: ShootKey,
    /// Countdown length in seconds (whole minutes)
    pub game_duration_secs: u32,
    pub background: Background,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            shoot_key: ShootKey::Space,
            game_duration_secs: DEFAULT_GAME_SECS,
            background: Background::Earth,
        }
    }
}

impl GameConfig {
    /// Build a validated config from configuration-screen values
    pub fn new(
        shoot_code: &str,
        game_duration_secs: u32,
        background: &str,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            shoot_key: ShootKey::from_code(shoot_code)?,
            game_duration_secs,
            background: Background::from_str(background)
                .ok_or_else(|| ConfigError::Background(background.to_string()))?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_duration_secs < 60 || self.game_duration_secs % 60 != 0 {
            return Err(ConfigError::Duration(self.game_duration_secs));
        }
        Ok(())
    }

    /// Duration in minutes, as stored with score records
    pub fn game_time_minutes(&self) -> u32 {
        self.game_duration_secs / 60
    }

    /// Read a config file, falling back to defaults if missing or invalid
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(config) => {
                log::info!("Loaded game config from {}", path.display());
                config
            }
            Err(err) => {
                log::info!("Using default game config ({err})");
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Game config saved");
        Ok(())
    }
}
