//! Galactic Defenders - a time-limited arcade shooter
//!
//! Core modules:
//! - `sim`: Simulation (entities, movement, combat, collisions, game state)
//! - `scheduler`: Logical clock with cancellable repeating timers
//! - `session`: Game state machine that owns the simulation and its drivers
//! - `outcome`: End-of-game classification
//! - `input`: Key events to per-tick intents
//! - `settings`: Per-game configuration
//! - `highscores`: Score history and its persistence collaborator
//! - `audio`: Audio collaborator

pub mod audio;
pub mod highscores;
pub mod input;
pub mod outcome;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{ScoreHistory, ScoreRecord, ScoreStore};
pub use outcome::{EndReason, GameResult, OutcomeClass};
pub use session::{GameSession, Subscriber};
pub use settings::{Background, GameConfig, ShootKey};

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Simulation tick period (about 60 Hz)
    pub const SIM_TICK_MS: u64 = 16;
    /// Countdown clock period
    pub const COUNTDOWN_MS: u64 = 1000;

    /// Default play-field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;
    /// The ship may not rise above this fraction of the field height
    pub const MOVEMENT_BOUNDARY_TOP: f32 = 0.6;

    /// Ship defaults
    pub const SHIP_WIDTH: f32 = 40.0;
    pub const SHIP_HEIGHT: f32 = 40.0;
    pub const SHIP_SPEED: f32 = 5.0;
    /// Spawn y is this far above the bottom edge
    pub const SHIP_SPAWN_OFFSET: f32 = 50.0;
    pub const START_LIVES: u8 = 3;
    /// Minimum gap between two player shots (strictly greater than)
    pub const SHOT_COOLDOWN_MS: u64 = 300;

    /// Enemy formation
    pub const ENEMY_ROWS: usize = 4;
    pub const ENEMY_COLS: usize = 5;
    pub const ENEMY_WIDTH: f32 = 40.0;
    pub const ENEMY_HEIGHT: f32 = 40.0;
    pub const ENEMY_PADDING: f32 = 20.0;
    pub const ENEMY_START_Y: f32 = 80.0;
    /// Initial sweep speed (pixels per tick, moving right)
    pub const ENEMY_BASE_SPEED: f32 = 2.0;
    /// Points per row, top row first
    pub const ROW_POINTS: [u32; ENEMY_ROWS] = [20, 15, 10, 5];

    /// Bullets
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const PLAYER_BULLET_SPEED: f32 = 7.0;
    pub const ENEMY_BULLET_BASE_SPEED: f32 = 5.0;
    pub const ENEMY_BULLET_TINT: u32 = 0xff9800;
    /// A new enemy bullet may spawn once the newest one is past this fraction of the field
    pub const ENEMY_FIRE_CLEARANCE: f32 = 0.75;

    /// Difficulty escalation
    pub const ESCALATION_INTERVAL_MS: u64 = 5000;
    pub const MAX_ESCALATIONS: u8 = 4;

    /// Randomized feints
    pub const FEINT_MIN_GAP_MS: u64 = 2000;
    pub const FEINT_MAX_GAP_MS: u64 = 8000;
    pub const FEINT_CHANCE: f64 = 0.3;
    pub const FEINT_MIN_MS: u64 = 500;
    pub const FEINT_MAX_MS: u64 = 1500;

    /// Timeout score at or above which the player is a winner
    pub const WINNER_THRESHOLD: u32 = 100;
    /// Default game duration
    pub const DEFAULT_GAME_SECS: u32 = 120;
}

/// Random integer in `[min, max]` (both inclusive)
#[inline]
pub fn random_between(rng: &mut impl Rng, min: u64, max: u64) -> u64 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// Format whole seconds as `M:SS` (negative values show as `0:00`)
pub fn format_time(seconds: i32) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
