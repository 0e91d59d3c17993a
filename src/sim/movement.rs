//! Per-tick movement and difficulty escalation
//!
//! Ship motion follows input intents inside its band at the bottom of the
//! field. The enemy formation sweeps as one body sharing `sweep_speed`;
//! bullets travel vertically and are dropped once off the field.

use glam::Vec2;
use rand::Rng;

use super::state::{Bullet, Enemy, GameEvent, GameState, Ship};
use crate::consts::*;
use crate::random_between;

/// Move the ship one step in each direction whose intent is set.
///
/// A step is only taken if the ship stays inside `[0, W - w]` horizontally
/// and `[0.6 H, H - h]` vertically; otherwise the ship holds that axis.
pub fn move_ship(ship: &mut Ship, field: Vec2) {
    let min_y = field.y * MOVEMENT_BOUNDARY_TOP;
    let max_x = field.x - ship.size.x;
    let max_y = field.y - ship.size.y;

    if ship.moving_left && ship.pos.x - ship.speed >= 0.0 {
        ship.pos.x -= ship.speed;
    }
    if ship.moving_right && ship.pos.x + ship.speed <= max_x {
        ship.pos.x += ship.speed;
    }
    if ship.moving_up && ship.pos.y - ship.speed >= min_y {
        ship.pos.y -= ship.speed;
    }
    if ship.moving_down && ship.pos.y + ship.speed <= max_y {
        ship.pos.y += ship.speed;
    }
}

/// True if an alive enemy is touching the edge it is heading toward
fn edge_contact(enemies: &[Enemy], sweep_speed: f32, field_width: f32) -> bool {
    enemies.iter().filter(|e| e.alive).any(|e| {
        (e.pos.x <= 0.0 && sweep_speed < 0.0)
            || (e.pos.x + e.size.x >= field_width && sweep_speed > 0.0)
    })
}

/// Roll for a feint if one is due. Returns true when the sweep was reversed.
fn try_feint(state: &mut GameState, now_ms: u64) -> bool {
    if state.feint.active_until_ms.is_some() || now_ms < state.feint.next_opportunity_ms {
        return false;
    }

    state.feint.next_opportunity_ms =
        now_ms + random_between(&mut state.rng, FEINT_MIN_GAP_MS, FEINT_MAX_GAP_MS);

    if !state.rng.random_bool(FEINT_CHANCE) {
        return false;
    }

    let until_ms = now_ms + random_between(&mut state.rng, FEINT_MIN_MS, FEINT_MAX_MS);
    state.sweep_speed = -state.sweep_speed;
    state.feint.active_until_ms = Some(until_ms);
    state.events.push(GameEvent::Feint { until_ms });
    log::debug!("Feint: sweep reversed to {} until {}ms", state.sweep_speed, until_ms);
    true
}

/// Sweep the enemy formation one step.
///
/// The sweep direction flips at most once per tick: an edge contact takes
/// priority and defers any due feint to a later tick.
pub fn move_enemies(state: &mut GameState, now_ms: u64) {
    if let Some(until) = state.feint.active_until_ms {
        if now_ms > until {
            // Sweep keeps its reversed heading; only re-arms feinting
            state.feint.active_until_ms = None;
        }
    }

    if edge_contact(&state.enemies, state.sweep_speed, state.field.x) {
        state.sweep_speed = -state.sweep_speed;
    } else {
        try_feint(state, now_ms);
    }

    let dx = state.sweep_speed;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.pos.x += dx;
    }
}

/// Advance bullets by their own speed and drop the ones that left the field
pub fn move_bullets(bullets: &mut Vec<Bullet>, field: Vec2) {
    for bullet in bullets.iter_mut() {
        bullet.pos.y += bullet.speed;
    }
    bullets.retain(|b| !b.is_off_field(field));
}

/// Speed the sweep up by one every escalation interval, up to the cap.
/// Returns true when an escalation was applied.
pub fn escalate_difficulty(state: &mut GameState, now_ms: u64) -> bool {
    let difficulty = &mut state.difficulty;
    if difficulty.escalations >= MAX_ESCALATIONS
        || now_ms.saturating_sub(difficulty.last_escalation_ms) < ESCALATION_INTERVAL_MS
    {
        return false;
    }

    state.sweep_speed += state.sweep_speed.signum();
    difficulty.escalations += 1;
    difficulty.last_escalation_ms = now_ms;

    log::info!(
        "Difficulty escalated to level {} (sweep speed {})",
        difficulty.escalations,
        state.sweep_speed.abs()
    );
    state.events.push(GameEvent::SpeedEscalated {
        level: difficulty.escalations,
        speed: state.sweep_speed.abs(),
    });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn field() -> Vec2 {
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)
    }

    fn state_without_feints() -> GameState {
        let mut state = GameState::new(3, field(), 120, 0);
        state.feint.next_opportunity_ms = u64::MAX;
        state
    }

    #[test]
    fn test_ship_moves_diagonally() {
        let mut ship = Ship::spawn(field());
        ship.moving_left = true;
        ship.moving_up = true;
        move_ship(&mut ship, field());
        assert_eq!(ship.pos, Vec2::new(375.0, 545.0));
    }

    #[test]
    fn test_ship_cannot_leave_band() {
        let mut ship = Ship::spawn(field());
        ship.pos = Vec2::new(2.0, 361.0);
        ship.moving_left = true;
        ship.moving_up = true;
        move_ship(&mut ship, field());
        // Both steps would leave the band, so the ship holds
        assert_eq!(ship.pos, Vec2::new(2.0, 361.0));

        ship.moving_left = false;
        ship.moving_up = false;
        ship.moving_right = true;
        ship.moving_down = true;
        ship.pos = Vec2::new(758.0, 558.0);
        move_ship(&mut ship, field());
        assert_eq!(ship.pos, Vec2::new(758.0, 558.0));

        // Landing exactly on the edge is allowed
        ship.pos = Vec2::new(755.0, 555.0);
        move_ship(&mut ship, field());
        assert_eq!(ship.pos, Vec2::new(760.0, 560.0));
    }

    #[test]
    fn test_formation_sweeps_together() {
        let mut state = state_without_feints();
        let before: Vec<f32> = state.enemies.iter().map(|e| e.pos.x).collect();
        state.enemies[3].alive = false;

        move_enemies(&mut state, 16);

        for (i, enemy) in state.enemies.iter().enumerate() {
            let expected = if i == 3 { before[i] } else { before[i] + 2.0 };
            assert_eq!(enemy.pos.x, expected);
        }
    }

    #[test]
    fn test_sweep_flips_once_per_edge_contact() {
        let mut state = state_without_feints();
        let shift = FIELD_WIDTH - (state.enemies[4].pos.x + ENEMY_WIDTH);
        for enemy in &mut state.enemies {
            enemy.pos.x += shift;
        }
        let right_edge = state.enemies[4].pos.x;

        move_enemies(&mut state, 16);
        assert_eq!(state.sweep_speed, -2.0);
        // Flip applied before displacement
        assert_eq!(state.enemies[4].pos.x, right_edge - 2.0);

        move_enemies(&mut state, 32);
        assert_eq!(state.sweep_speed, -2.0);
    }

    #[test]
    fn test_edge_contact_defers_due_feint() {
        let mut state = GameState::new(3, field(), 120, 0);
        let shift = FIELD_WIDTH - (state.enemies[4].pos.x + ENEMY_WIDTH);
        for enemy in &mut state.enemies {
            enemy.pos.x += shift;
        }
        state.feint.next_opportunity_ms = 0;
        let before = state.sweep_speed;

        move_enemies(&mut state, 16);

        // One flip from the edge; the feint roll waits for a later tick
        assert_eq!(state.sweep_speed, -before);
        assert!(state.feint.active_until_ms.is_none());
        assert_eq!(state.feint.next_opportunity_ms, 0);
    }

    #[test]
    fn test_dead_enemies_ignore_edges() {
        let mut state = state_without_feints();
        // Only a dead unit sits on the right edge
        for enemy in &mut state.enemies {
            enemy.alive = false;
        }
        state.enemies[0].alive = true;
        state.enemies[4].pos.x = FIELD_WIDTH;

        move_enemies(&mut state, 16);
        assert_eq!(state.sweep_speed, 2.0);
    }

    #[test]
    fn test_feint_reverses_and_rearms() {
        let mut state = GameState::new(11, field(), 120, 0);
        state.feint.next_opportunity_ms = 0;

        // Roll until a feint fires; each roll schedules the next opportunity
        let mut now = 0;
        let mut fired = false;
        for _ in 0..64 {
            let speed = state.sweep_speed;
            state.feint.next_opportunity_ms = now;
            move_enemies(&mut state, now);
            if state.feint.active_until_ms.is_some() {
                assert_eq!(state.sweep_speed, -speed);
                fired = true;
                break;
            }
            assert!(state.feint.next_opportunity_ms >= now + FEINT_MIN_GAP_MS);
            now += 16;
        }
        assert!(fired, "30% feints should fire within 64 rolls");

        let until = state.feint.active_until_ms.unwrap();
        assert!((now + FEINT_MIN_MS..=now + FEINT_MAX_MS).contains(&until));
        let reversed = state.sweep_speed;

        // Window elapses: heading stays reversed, feint is re-armed
        state.feint.next_opportunity_ms = u64::MAX;
        move_enemies(&mut state, until + 1);
        assert!(state.feint.active_until_ms.is_none());
        assert_eq!(state.sweep_speed, reversed);
    }

    #[test]
    fn test_bullets_move_and_leave_field() {
        let ship = Ship::spawn(field());
        let mut up = Bullet::from_ship(&ship);
        up.pos.y = -4.0;
        let mut down = up.clone();
        down.speed = 5.0;
        down.pos.y = 598.0;
        let mut stay = down.clone();
        stay.pos.y = 300.0;

        let mut bullets = vec![up, down, stay];
        move_bullets(&mut bullets, field());
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos.y, 305.0);
    }

    #[test]
    fn test_escalation_every_five_seconds_capped() {
        let mut state = state_without_feints();
        state.sweep_speed = -2.0;

        assert!(!escalate_difficulty(&mut state, 4_999));
        assert!(escalate_difficulty(&mut state, 5_000));
        assert_eq!(state.sweep_speed, -3.0);
        assert!(!escalate_difficulty(&mut state, 9_000));

        let mut now = 5_000;
        for _ in 0..3 {
            now += 5_000;
            assert!(escalate_difficulty(&mut state, now));
        }
        assert_eq!(state.difficulty.escalations, 4);
        assert_eq!(state.sweep_speed, -6.0);

        assert!(!escalate_difficulty(&mut state, now + 60_000));
        assert_eq!(state.sweep_speed, -6.0);
    }

    proptest! {
        #[test]
        fn prop_ship_stays_in_band(
            x in 0.0f32..=760.0,
            y in 360.0f32..=560.0,
            left: bool, right: bool, up: bool, down: bool,
        ) {
            let mut ship = Ship::spawn(field());
            ship.pos = Vec2::new(x, y);
            ship.moving_left = left;
            ship.moving_right = right;
            ship.moving_up = up;
            ship.moving_down = down;

            move_ship(&mut ship, field());

            prop_assert!(ship.pos.x >= 0.0 && ship.pos.x <= FIELD_WIDTH - ship.size.x);
            prop_assert!(
                ship.pos.y >= 0.6 * FIELD_HEIGHT && ship.pos.y <= FIELD_HEIGHT - ship.size.y
            );
        }
    }
}
