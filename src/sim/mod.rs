//! Simulation module
//!
//! All gameplay logic lives here:
//! - Fixed tick only, driven from outside
//! - Seeded RNG only
//! - No rendering, audio or storage dependencies

pub mod collision;
pub mod combat;
pub mod movement;
pub mod state;
pub mod tick;

pub use collision::{Bounds, Rect, is_colliding};
pub use combat::{enemy_fire, enemy_may_fire, player_fire, resolve_hits};
pub use movement::{escalate_difficulty, move_bullets, move_enemies, move_ship};
pub use state::{
    Bullet, Difficulty, Enemy, FeintState, GameEvent, GamePhase, GameState, Hud, Ship, enemy_grid,
};
pub use tick::{TickInput, check_end_conditions, countdown, tick};
