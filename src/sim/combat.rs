//! Shooting and hit resolution
//!
//! Spawning is rate limited: the player by a cooldown, the enemies by keeping
//! at most one bullet in the upper part of the field. Hits turn into score,
//! lost lives and events.

use rand::Rng;

use super::collision::is_colliding;
use super::state::{Bullet, GameEvent, GameState};
use crate::consts::*;

/// Fire a player bullet if the ship wants to shoot and the cooldown has passed
pub fn player_fire(state: &mut GameState, now_ms: u64) -> bool {
    let ship = &mut state.ship;
    if !ship.shooting {
        return false;
    }
    let ready = ship
        .last_shot_ms
        .is_none_or(|last| now_ms.saturating_sub(last) > SHOT_COOLDOWN_MS);
    if !ready {
        return false;
    }

    state.player_bullets.push(Bullet::from_ship(ship));
    ship.last_shot_ms = Some(now_ms);
    state.events.push(GameEvent::ShipFired);
    true
}

/// Whether the enemies may fire: no bullet in flight, or the newest one has
/// cleared the upper three quarters of the field
pub fn enemy_may_fire(state: &GameState) -> bool {
    state
        .enemy_bullets
        .last()
        .is_none_or(|b| b.pos.y > state.field.y * ENEMY_FIRE_CLEARANCE)
}

/// Let a random alive enemy fire. No alive enemies means no shot.
pub fn enemy_fire(state: &mut GameState) -> bool {
    if !enemy_may_fire(state) {
        return false;
    }

    let alive = state.enemies.iter().filter(|e| e.alive).count();
    if alive == 0 {
        return false;
    }
    let pick = state.rng.random_range(0..alive);

    let Some(shooter) = state.enemies.iter().filter(|e| e.alive).nth(pick) else {
        return false;
    };
    let bullet = Bullet::from_enemy(shooter, state.difficulty.escalations);
    state.enemy_bullets.push(bullet);
    true
}

/// Resolve player bullets against enemies, then enemy bullets against the ship.
///
/// A bullet destroys at most one enemy; at most one ship hit is taken per call.
pub fn resolve_hits(state: &mut GameState) {
    // Newest first so removal does not disturb the remaining indices
    for i in (0..state.player_bullets.len()).rev() {
        let bullet = &state.player_bullets[i];
        let Some(enemy) = state
            .enemies
            .iter_mut()
            .find(|e| e.alive && is_colliding(bullet, &**e))
        else {
            continue;
        };

        enemy.alive = false;
        let points = enemy.points();
        let row = enemy.row;
        state.player_bullets.remove(i);
        state.score += points;
        state.events.push(GameEvent::EnemyDestroyed { row, points });
        log::debug!("Enemy in row {} destroyed (+{}), score {}", row, points, state.score);
    }

    for i in (0..state.enemy_bullets.len()).rev() {
        if !is_colliding(&state.enemy_bullets[i], &state.ship) {
            continue;
        }

        state.enemy_bullets.remove(i);
        state.lives = state.lives.saturating_sub(1);
        state.ship.reset_position(state.field);
        state.events.push(GameEvent::ShipHit {
            lives_left: state.lives,
        });
        log::debug!("Ship hit, {} lives left", state.lives);
        break;
    }
}
