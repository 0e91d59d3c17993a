//! Game state and core simulation types
//!
//! Everything a running game mutates lives in [`GameState`]; the session owns
//! exactly one and hands it to the simulation each tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Bounds, Rect};
use crate::consts::*;
use crate::format_time;
use crate::outcome::GameResult;
use crate::settings::GameConfig;

/// Current phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No game has been started yet
    #[default]
    NotStarted,
    /// Drivers are ticking
    Running,
    /// Drivers halted, state frozen
    Paused,
    /// Game over; terminal until the next start
    Ended,
}

/// Outbound notifications produced while the game runs
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Started { config: GameConfig },
    Paused,
    Resumed,
    /// Game abandoned without a result
    Quit,
    ShipFired,
    EnemyDestroyed { row: u8, points: u32 },
    ShipHit { lives_left: u8 },
    SpeedEscalated { level: u8, speed: f32 },
    Feint { until_ms: u64 },
    Ended(GameResult),
}

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    pub moving_left: bool,
    pub moving_right: bool,
    pub moving_up: bool,
    pub moving_down: bool,
    pub shooting: bool,
    /// Logical time of the last shot (None until the first one)
    pub last_shot_ms: Option<u64>,
}

impl Ship {
    /// Create a ship at its spawn point, centered at the bottom of the field
    pub fn spawn(field: Vec2) -> Self {
        Self {
            pos: Self::spawn_position(field),
            size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            speed: SHIP_SPEED,
            moving_left: false,
            moving_right: false,
            moving_up: false,
            moving_down: false,
            shooting: false,
            last_shot_ms: None,
        }
    }

    pub fn spawn_position(field: Vec2) -> Vec2 {
        Vec2::new(field.x / 2.0 - SHIP_WIDTH / 2.0, field.y - SHIP_SPAWN_OFFSET)
    }

    /// Put the ship back at its spawn point (after being hit)
    pub fn reset_position(&mut self, field: Vec2) {
        self.pos = Self::spawn_position(field);
    }

    /// Horizontal midpoint
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }
}

/// One unit of the enemy formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    /// Formation row, 0 is the top row
    pub row: u8,
    pub alive: bool,
}

impl Enemy {
    /// Points awarded for destroying this enemy
    pub fn points(&self) -> u32 {
        ROW_POINTS.get(self.row as usize).copied().unwrap_or(0)
    }
}

/// Build the enemy formation: a centered grid of rows x cols units
pub fn enemy_grid(field: Vec2) -> Vec<Enemy> {
    let cell_w = ENEMY_WIDTH + ENEMY_PADDING;
    let cell_h = ENEMY_HEIGHT + ENEMY_PADDING;
    let start_x = (field.x - ENEMY_COLS as f32 * cell_w) / 2.0;

    let mut enemies = Vec::with_capacity(ENEMY_ROWS * ENEMY_COLS);
    for row in 0..ENEMY_ROWS {
        for col in 0..ENEMY_COLS {
            enemies.push(Enemy {
                pos: Vec2::new(
                    start_x + col as f32 * cell_w,
                    ENEMY_START_Y + row as f32 * cell_h,
                ),
                size: Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT),
                row: row as u8,
                alive: true,
            });
        }
    }
    enemies
}

/// A projectile. Speed is signed: negative travels up, positive travels down.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
    /// Optional RGB tint for the renderer
    #[serde(default)]
    pub tint: Option<u32>,
}

impl Bullet {
    /// Player bullet centered on the ship, leaving from its top edge
    pub fn from_ship(ship: &Ship) -> Self {
        Self {
            pos: Vec2::new(ship.center_x() - BULLET_WIDTH / 2.0, ship.pos.y),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed: -PLAYER_BULLET_SPEED,
            tint: None,
        }
    }

    /// Enemy bullet leaving from the enemy's lower edge; faster as difficulty rises
    pub fn from_enemy(enemy: &Enemy, escalations: u8) -> Self {
        Self {
            pos: Vec2::new(
                enemy.pos.x + enemy.size.x / 2.0 - BULLET_WIDTH / 2.0,
                enemy.pos.y + enemy.size.y,
            ),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            speed: ENEMY_BULLET_BASE_SPEED + escalations as f32,
            tint: Some(ENEMY_BULLET_TINT),
        }
    }

    /// True once the bullet is entirely above the top or below the bottom
    pub fn is_off_field(&self, field: Vec2) -> bool {
        self.pos.y + self.size.y < 0.0 || self.pos.y > field.y
    }
}

impl Bounds for Ship {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

impl Bounds for Enemy {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

impl Bounds for Bullet {
    fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Randomized sweep reversal bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeintState {
    /// End of the active feint window, if one is running
    pub active_until_ms: Option<u64>,
    /// Earliest time the next feint may be rolled
    pub next_opportunity_ms: u64,
}

/// Time-based difficulty bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Escalations applied so far (capped at `MAX_ESCALATIONS`)
    pub escalations: u8,
    pub last_escalation_ms: u64,
}

/// Read-only HUD values for the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u32,
    pub lives: u8,
    pub time_left: String,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete state of one game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Play-field dimensions
    pub field: Vec2,
    pub phase: GamePhase,
    pub score: u32,
    pub lives: u8,
    /// Seconds left on the countdown
    pub time_left: i32,
    /// Horizontal velocity shared by every alive enemy
    pub sweep_speed: f32,
    pub difficulty: Difficulty,
    pub feint: FeintState,
    pub ship: Ship,
    /// Fixed formation; dead units stay in place
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    /// Oldest first; the last entry is the most recently fired
    pub enemy_bullets: Vec<Bullet>,
    /// Events produced by the current tick, drained by the session
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh game state. `now_ms` anchors the difficulty and feint timers.
    pub fn new(seed: u64, field: Vec2, duration_secs: u32, now_ms: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let first_feint =
            now_ms + crate::random_between(&mut rng, FEINT_MIN_GAP_MS, FEINT_MAX_GAP_MS);

        Self {
            seed,
            rng,
            field,
            phase: GamePhase::NotStarted,
            score: 0,
            lives: START_LIVES,
            time_left: duration_secs as i32,
            sweep_speed: ENEMY_BASE_SPEED,
            difficulty: Difficulty {
                escalations: 0,
                last_escalation_ms: now_ms,
            },
            feint: FeintState {
                active_until_ms: None,
                next_opportunity_ms: first_feint,
            },
            ship: Ship::spawn(field),
            enemies: enemy_grid(field),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn alive_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.alive)
    }

    pub fn all_enemies_defeated(&self) -> bool {
        self.enemies.iter().all(|e| !e.alive)
    }

    /// Lowest y the ship may reach (top of its movement band)
    pub fn ship_ceiling(&self) -> f32 {
        self.field.y * MOVEMENT_BOUNDARY_TOP
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.score,
            lives: self.lives,
            time_left: format_time(self.time_left),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> Vec2 {
        Vec2::new(FIELD_WIDTH, FIELD_HEIGHT)
    }

    #[test]
    fn test_ship_spawns_centered_at_bottom() {
        let ship = Ship::spawn(field());
        assert_eq!(ship.pos, Vec2::new(380.0, 550.0));
        assert_eq!(ship.size, Vec2::new(40.0, 40.0));
        assert!(ship.last_shot_ms.is_none());
    }

    #[test]
    fn test_enemy_grid_layout() {
        let enemies = enemy_grid(field());
        assert_eq!(enemies.len(), 20);
        assert!(enemies.iter().all(|e| e.alive));

        // (800 - 5 * 60) / 2 = 250
        assert_eq!(enemies[0].pos, Vec2::new(250.0, 80.0));
        assert_eq!(enemies[4].pos, Vec2::new(490.0, 80.0));
        assert_eq!(enemies[19].pos, Vec2::new(490.0, 260.0));
        assert_eq!(enemies[5].row, 1);
        assert_eq!(enemies[19].row, 3);
    }

    #[test]
    fn test_row_points() {
        let enemies = enemy_grid(field());
        assert_eq!(enemies[0].points(), 20);
        assert_eq!(enemies[5].points(), 15);
        assert_eq!(enemies[10].points(), 10);
        assert_eq!(enemies[15].points(), 5);
    }

    #[test]
    fn test_bullet_spawn_points() {
        let ship = Ship::spawn(field());
        let b = Bullet::from_ship(&ship);
        assert_eq!(b.pos, Vec2::new(397.5, 550.0));
        assert!(b.speed < 0.0);

        let enemy = &enemy_grid(field())[0];
        let b = Bullet::from_enemy(enemy, 2);
        assert_eq!(b.pos, Vec2::new(267.5, 120.0));
        assert_eq!(b.speed, 7.0);
        assert_eq!(b.tint, Some(ENEMY_BULLET_TINT));
    }

    #[test]
    fn test_bullet_off_field() {
        let mut b = Bullet::from_ship(&Ship::spawn(field()));
        b.pos.y = -9.0;
        assert!(!b.is_off_field(field()));
        b.pos.y = -10.5;
        assert!(b.is_off_field(field()));
        b.pos.y = 600.5;
        assert!(b.is_off_field(field()));
    }

    #[test]
    fn test_new_state_defaults() {
        let state = GameState::new(1, field(), 120, 1_000);
        assert_eq!(state.phase, GamePhase::NotStarted);
        assert_eq!(state.lives, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.sweep_speed, 2.0);
        assert_eq!(state.difficulty.last_escalation_ms, 1_000);
        assert!((3_000..=9_000).contains(&state.feint.next_opportunity_ms));
        assert_eq!(state.hud().time_left, "2:00");
    }
}
