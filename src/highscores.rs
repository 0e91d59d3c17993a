//! Per-user score history
//!
//! Every finished game appends one record; the history is kept sorted by
//! score (descending) and the top 10 are shown on the game-over screen.
//! Storage sits behind [`ScoreStore`] and is best-effort: a failed write is
//! logged and the game carries on.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::Subscriber;
use crate::sim::GameEvent;

/// Number of entries shown on the scoreboard
pub const MAX_DISPLAYED: usize = 10;

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Storage failures
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid user id `{0}`")]
    InvalidUser(String),
    #[error("score store i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("score store json: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single finished game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub score: u32,
    /// Unix timestamp (ms) when the game ended
    pub date: u64,
    /// Configured game length in minutes
    pub game_time: u32,
}

/// A user's score history, highest score first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreHistory {
    entries: Vec<ScoreRecord>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap stored entries, restoring the sort order
    pub fn from_entries(entries: Vec<ScoreRecord>) -> Self {
        let mut history = Self { entries };
        history.sort();
        history
    }

    fn sort(&mut self) {
        // Stable: equal scores keep insertion order
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
    }

    /// Append a record and re-sort. Returns its 1-indexed rank.
    pub fn append(&mut self, record: ScoreRecord) -> usize {
        self.entries.push(record.clone());
        self.sort();
        self.entries
            .iter()
            .rposition(|e| *e == record)
            .map_or(self.entries.len(), |i| i + 1)
    }

    pub fn entries(&self) -> &[ScoreRecord] {
        &self.entries
    }

    /// Scoreboard rows
    pub fn top(&self) -> &[ScoreRecord] {
        &self.entries[..self.entries.len().min(MAX_DISPLAYED)]
    }

    /// Row to highlight for a game just finished: same score and game time,
    /// played on the same (UTC) day as `now_ms`
    pub fn highlight_index(&self, score: u32, game_time: u32, now_ms: u64) -> Option<usize> {
        self.entries.iter().position(|e| {
            e.score == score && e.game_time == game_time && e.date / DAY_MS == now_ms / DAY_MS
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }
}

/// Persistence collaborator for score histories
pub trait ScoreStore {
    fn append_score(&mut self, user: &str, record: ScoreRecord) -> Result<(), StoreError>;

    fn load_history(&self, user: &str) -> Result<ScoreHistory, StoreError>;
}

/// Shared handle, so a host can keep reading a store a subscriber writes to
impl<S: ScoreStore> ScoreStore for Rc<RefCell<S>> {
    fn append_score(&mut self, user: &str, record: ScoreRecord) -> Result<(), StoreError> {
        self.borrow_mut().append_score(user, record)
    }

    fn load_history(&self, user: &str) -> Result<ScoreHistory, StoreError> {
        self.borrow().load_history(user)
    }
}

fn check_user(user: &str) -> Result<(), StoreError> {
    let valid = !user.is_empty()
        && user
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-' || c == '.')
        && user != "."
        && user != "..";
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidUser(user.to_string()))
    }
}

/// Histories kept in memory for the lifetime of the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    histories: HashMap<String, ScoreHistory>,
}

impl ScoreStore for MemoryStore {
    fn append_score(&mut self, user: &str, record: ScoreRecord) -> Result<(), StoreError> {
        check_user(user)?;
        self.histories
            .entry(user.to_string())
            .or_default()
            .append(record);
        Ok(())
    }

    fn load_history(&self, user: &str) -> Result<ScoreHistory, StoreError> {
        check_user(user)?;
        Ok(self.histories.get(user).cloned().unwrap_or_default())
    }
}

/// One JSON file per user (`scoreHistory_<user>.json`) in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, user: &str) -> Result<PathBuf, StoreError> {
        check_user(user)?;
        Ok(self.dir.join(format!("scoreHistory_{user}.json")))
    }
}

impl ScoreStore for JsonFileStore {
    fn append_score(&mut self, user: &str, record: ScoreRecord) -> Result<(), StoreError> {
        let mut history = self.load_history(user)?;
        history.append(record);

        let path = self.path_for(user)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&path, serde_json::to_string(&history)?)?;
        log::info!("Score history saved ({} entries)", history.len());
        Ok(())
    }

    fn load_history(&self, user: &str) -> Result<ScoreHistory, StoreError> {
        let path = self.path_for(user)?;
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ScoreHistory::new());
            }
            Err(err) => return Err(err.into()),
        };
        let entries: Vec<ScoreRecord> = serde_json::from_str(&json)?;
        Ok(ScoreHistory::from_entries(entries))
    }
}

/// Current wall-clock time as Unix milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Records each finished game's score for one user
pub struct ScoreRecorder<S: ScoreStore> {
    store: S,
    user: String,
    game_time: u32,
    clock: fn() -> u64,
}

impl<S: ScoreStore> ScoreRecorder<S> {
    pub fn new(store: S, user: impl Into<String>) -> Self {
        Self::with_clock(store, user, unix_millis)
    }

    pub fn with_clock(store: S, user: impl Into<String>, clock: fn() -> u64) -> Self {
        Self {
            store,
            user: user.into(),
            game_time: 0,
            clock,
        }
    }
}

impl<S: ScoreStore> Subscriber for ScoreRecorder<S> {
    fn on_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Started { config } => self.game_time = config.game_time_minutes(),
            GameEvent::Ended(result) => {
                let record = ScoreRecord {
                    score: result.final_score,
                    date: (self.clock)(),
                    game_time: self.game_time,
                };
                if let Err(err) = self.store.append_score(&self.user, record) {
                    log::warn!("Could not save score for {}: {}", self.user, err);
                }
            }
            _ => {}
        }
    }
}
