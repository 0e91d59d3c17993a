//! Galactic Defenders headless runner
//!
//! Plays one game with a simple autopilot on the logical clock and prints the
//! result and the pilot's score history. Pass a config JSON path to override
//! the defaults.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use galactic_defenders::audio::{AudioManager, LogBackend};
use galactic_defenders::consts::SIM_TICK_MS;
use galactic_defenders::highscores::{JsonFileStore, ScoreRecorder, ScoreStore, unix_millis};
use galactic_defenders::sim::{GamePhase, GameState};
use galactic_defenders::{GameConfig, GameSession, format_time};

const PILOT: &str = "pilot";

/// Steer under the closest surviving enemy
fn steer(state: &GameState) -> Option<&'static str> {
    let ship_x = state.ship.center_x();
    let target = state
        .alive_enemies()
        .map(|e| e.pos.x + e.size.x / 2.0)
        .min_by(|a, b| (a - ship_x).abs().total_cmp(&(b - ship_x).abs()))?;

    if target < ship_x - state.ship.speed {
        Some("ArrowLeft")
    } else if target > ship_x + state.ship.speed {
        Some("ArrowRight")
    } else {
        None
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Galactic Defenders (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load(Path::new(&path)),
        None => GameConfig::default(),
    };

    let store = Rc::new(RefCell::new(JsonFileStore::new(
        std::env::temp_dir().join("galactic-defenders"),
    )));

    let mut session = GameSession::new(unix_millis());
    session.subscribe(Box::new(AudioManager::new(LogBackend)));
    session.subscribe(Box::new(ScoreRecorder::new(store.clone(), PILOT)));

    let shoot = config.shoot_key.code();
    let game_time = config.game_time_minutes();
    if !session.start(config) {
        log::error!("Game failed to start");
        return;
    }
    session.key_down(&shoot);

    let mut held: Option<&'static str> = None;
    while session.phase() == GamePhase::Running {
        let wanted = steer(session.state());
        if wanted != held {
            if let Some(key) = held {
                session.key_up(key);
            }
            if let Some(key) = wanted {
                session.key_down(key);
            }
            held = wanted;
        }
        session.advance(SIM_TICK_MS);
    }

    let Some(result) = session.result() else {
        log::error!("Game stopped without a result");
        return;
    };
    println!("{}", result.message);
    println!("{}", result.summary());
    println!(
        "Played {} of game time",
        format_time((session.now_ms() / 1000) as i32)
    );

    match store.load_history(PILOT) {
        Ok(history) => {
            let highlight = history.highlight_index(result.final_score, game_time, unix_millis());
            println!("\nTop scores for {PILOT}:");
            for (i, entry) in history.top().iter().enumerate() {
                let marker = if Some(i) == highlight { ">" } else { " " };
                println!(
                    "{marker} {:>2}. {:>5}  ({} min)",
                    i + 1,
                    entry.score,
                    entry.game_time
                );
            }
        }
        Err(err) => log::warn!("Could not read score history: {}", err),
    }
}
