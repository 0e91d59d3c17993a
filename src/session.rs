//! Game session: the state machine around the simulation
//!
//! Owns the [`GameState`], the two periodic drivers (simulation tick and
//! countdown) and the subscribers that receive outbound events. The host
//! feeds key events and advances the logical clock; everything else
//! happens inside the drivers.
//!
//! ```text
//! NotStarted --start--> Running <--pause/resume--> Paused
//!                          |                          |
//!                         end                        quit
//!                          v                          v
//!                        Ended --start--> Running   NotStarted
//! ```

use glam::Vec2;

use crate::consts::*;
use crate::input::InputState;
use crate::outcome::{EndReason, GameResult};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::settings::GameConfig;
use crate::sim::{self, GameEvent, GamePhase, GameState};

/// Receives outbound events and per-tick frames.
///
/// Subscribers are collaborators (audio, rendering, persistence): they must
/// not fail the session, so neither hook returns an error.
pub trait Subscriber {
    fn on_event(&mut self, _event: &GameEvent) {}

    /// Called once per simulation tick with the post-tick state
    fn on_frame(&mut self, _state: &GameState) {}
}

/// The periodic drivers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Simulation,
    Countdown,
}

/// One player's game session
pub struct GameSession {
    seed: u64,
    games_started: u64,
    field: Vec2,
    config: GameConfig,
    state: GameState,
    input: InputState,
    scheduler: Scheduler<Driver>,
    tick_timer: Option<TimerHandle>,
    countdown_timer: Option<TimerHandle>,
    result: Option<GameResult>,
    subscribers: Vec<Box<dyn Subscriber>>,
}

impl GameSession {
    /// Session on the default 800x600 field
    pub fn new(seed: u64) -> Self {
        Self::with_field(seed, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT))
    }

    pub fn with_field(seed: u64, field: Vec2) -> Self {
        let config = GameConfig::default();
        Self {
            seed,
            games_started: 0,
            field,
            state: GameState::new(seed, field, config.game_duration_secs, 0),
            input: InputState::new(config.shoot_key),
            config,
            scheduler: Scheduler::new(),
            tick_timer: None,
            countdown_timer: None,
            result: None,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, subscriber: Box<dyn Subscriber>) {
        self.subscribers.push(subscriber);
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Read-only view of the current game
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Result of the last finished game
    pub fn result(&self) -> Option<&GameResult> {
        self.result.as_ref()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// True while both drivers are scheduled
    pub fn drivers_active(&self) -> bool {
        self.tick_timer.is_some() && self.countdown_timer.is_some()
    }

    fn game_active(&self) -> bool {
        matches!(self.state.phase, GamePhase::Running | GamePhase::Paused)
    }

    /// Key press from the host. Ignored unless a game is active.
    pub fn key_down(&mut self, code: &str) -> bool {
        self.game_active() && self.input.key_down(code)
    }

    /// Key release from the host. Ignored unless a game is active.
    pub fn key_up(&mut self, code: &str) -> bool {
        self.game_active() && self.input.key_up(code)
    }

    /// Start a new game. Valid from NotStarted or Ended; ignored otherwise.
    pub fn start(&mut self, config: GameConfig) -> bool {
        if !matches!(self.state.phase, GamePhase::NotStarted | GamePhase::Ended) {
            log::debug!("start() ignored in {:?}", self.state.phase);
            return false;
        }

        let seed = self.seed.wrapping_add(self.games_started);
        self.games_started += 1;

        let now = self.scheduler.now_ms();
        self.state = GameState::new(seed, self.field, config.game_duration_secs, now);
        self.state.phase = GamePhase::Running;
        self.input = InputState::new(config.shoot_key);
        self.result = None;
        self.config = config.clone();
        self.start_drivers();

        log::info!(
            "Game started: {}s, shoot key {}, background {}",
            config.game_duration_secs,
            config.shoot_key,
            config.background.as_str()
        );
        self.emit(GameEvent::Started { config });
        true
    }

    /// Halt both drivers. Valid only while running.
    pub fn pause(&mut self) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.stop_drivers();
        self.state.phase = GamePhase::Paused;
        log::info!("Game paused at {}ms", self.now_ms());
        self.emit(GameEvent::Paused);
        true
    }

    /// Restart both drivers from the current state. Valid only while paused.
    pub fn resume(&mut self) -> bool {
        if self.state.phase != GamePhase::Paused {
            return false;
        }
        self.state.phase = GamePhase::Running;
        self.start_drivers();
        log::info!("Game resumed at {}ms", self.now_ms());
        self.emit(GameEvent::Resumed);
        true
    }

    /// Finish the running game with `reason`. Valid only while running.
    pub fn end(&mut self, reason: EndReason) -> bool {
        if self.state.phase != GamePhase::Running {
            return false;
        }
        self.stop_drivers();
        self.state.phase = GamePhase::Ended;
        self.input.clear();

        let result = GameResult::new(reason, self.state.score);
        log::info!(
            "Game ended ({}): {} - {}",
            reason.as_str(),
            result.message,
            result.summary()
        );
        self.result = Some(result.clone());
        self.emit(GameEvent::Ended(result));
        true
    }

    /// Abandon the active game without recording a score
    pub fn quit(&mut self) -> bool {
        if !self.game_active() {
            return false;
        }
        self.stop_drivers();
        self.state.phase = GamePhase::NotStarted;
        self.input.clear();
        log::info!("Game abandoned");
        self.emit(GameEvent::Quit);
        true
    }

    /// Advance the logical clock by `ms`, running every driver firing due
    /// in that span
    pub fn advance(&mut self, ms: u64) {
        let until = self.scheduler.now_ms() + ms;
        while let Some(driver) = self.scheduler.pop_due(until) {
            match driver {
                Driver::Simulation => self.run_tick(),
                Driver::Countdown => self.run_countdown(),
            }
        }
        self.scheduler.advance_to(until);
    }

    fn run_tick(&mut self) {
        let now = self.scheduler.now_ms();
        let input = self.input.intents();
        let outcome = sim::tick(&mut self.state, &input, now);

        self.flush_events();
        for subscriber in self.subscribers.iter_mut() {
            subscriber.on_frame(&self.state);
        }

        if let Some(reason) = outcome {
            self.end(reason);
        }
    }

    fn run_countdown(&mut self) {
        if let Some(reason) = sim::countdown(&mut self.state) {
            self.end(reason);
        }
    }

    fn start_drivers(&mut self) {
        self.stop_drivers();
        self.tick_timer = Some(self.scheduler.schedule_repeating(Driver::Simulation, SIM_TICK_MS));
        self.countdown_timer =
            Some(self.scheduler.schedule_repeating(Driver::Countdown, COUNTDOWN_MS));
    }

    fn stop_drivers(&mut self) {
        for handle in [self.tick_timer.take(), self.countdown_timer.take()]
            .into_iter()
            .flatten()
        {
            self.scheduler.cancel(handle);
        }
    }

    fn flush_events(&mut self) {
        let events = std::mem::take(&mut self.state.events);
        for event in &events {
            for subscriber in self.subscribers.iter_mut() {
                subscriber.on_event(event);
            }
        }
    }

    fn emit(&mut self, event: GameEvent) {
        for subscriber in self.subscribers.iter_mut() {
            subscriber.on_event(&event);
        }
    }
}
