//! Fixed-interval simulation step
//!
//! One tick runs movement, spawning, difficulty, hit resolution and the
//! end-condition check in that order. The countdown clock has its own step.

use super::combat::{enemy_fire, player_fire, resolve_hits};
use super::movement::{escalate_difficulty, move_bullets, move_enemies, move_ship};
use super::state::{GamePhase, GameState};
use crate::outcome::EndReason;

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub move_up: bool,
    pub move_down: bool,
    pub shooting: bool,
}

impl TickInput {
    /// Copy the intents onto the ship
    fn apply(&self, state: &mut GameState) {
        let ship = &mut state.ship;
        ship.moving_left = self.move_left;
        ship.moving_right = self.move_right;
        ship.moving_up = self.move_up;
        ship.moving_down = self.move_down;
        ship.shooting = self.shooting;
    }
}

/// Advance a running game by one tick at logical time `now_ms`.
///
/// Returns the end reason if the game is over after this tick. Ticks on a
/// game that is not running do nothing.
pub fn tick(state: &mut GameState, input: &TickInput, now_ms: u64) -> Option<EndReason> {
    if state.phase != GamePhase::Running {
        return None;
    }

    input.apply(state);

    // Movement
    move_ship(&mut state.ship, state.field);
    move_enemies(state, now_ms);
    move_bullets(&mut state.player_bullets, state.field);
    move_bullets(&mut state.enemy_bullets, state.field);

    // Spawning
    enemy_fire(state);
    player_fire(state, now_ms);

    escalate_difficulty(state, now_ms);

    resolve_hits(state);

    check_end_conditions(state)
}

/// Lives exhausted beats a cleared formation when both happen in one tick
pub fn check_end_conditions(state: &GameState) -> Option<EndReason> {
    if state.lives == 0 {
        Some(EndReason::Lost)
    } else if state.all_enemies_defeated() {
        Some(EndReason::Champion)
    } else {
        None
    }
}

/// One countdown second. Returns `Timeout` once time has run out.
pub fn countdown(state: &mut GameState) -> Option<EndReason> {
    if state.phase != GamePhase::Running {
        return None;
    }
    state.time_left -= 1;
    (state.time_left <= 0).then_some(EndReason::Timeout)
}
