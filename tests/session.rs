//! Full games driven through the public session API on the logical clock

use std::cell::RefCell;
use std::rc::Rc;

use galactic_defenders::highscores::{MemoryStore, ScoreRecorder, StoreError};
use galactic_defenders::sim::{GameEvent, GamePhase, GameState};
use galactic_defenders::{
    EndReason, GameConfig, GameSession, ScoreHistory, ScoreRecord, ScoreStore, Subscriber,
};

#[derive(Default)]
struct Log {
    events: Vec<GameEvent>,
    frames: usize,
}

struct Recorder(Rc<RefCell<Log>>);

impl Subscriber for Recorder {
    fn on_event(&mut self, event: &GameEvent) {
        self.0.borrow_mut().events.push(event.clone());
    }

    fn on_frame(&mut self, _state: &GameState) {
        self.0.borrow_mut().frames += 1;
    }
}

fn play_out(session: &mut GameSession) {
    // Hard cap well past the longest configured game
    for _ in 0..20_000 {
        if session.phase() != GamePhase::Running {
            return;
        }
        session.advance(16);
    }
}

#[test]
fn finished_game_is_persisted() {
    let store = Rc::new(RefCell::new(MemoryStore::default()));
    let mut session = GameSession::new(11);
    session.subscribe(Box::new(ScoreRecorder::with_clock(store.clone(), "alice", || 1_000)));

    assert!(session.start(GameConfig::default()));
    session.key_down("Space");
    play_out(&mut session);

    assert_eq!(session.phase(), GamePhase::Ended);
    let result = session.result().unwrap().clone();
    assert!(matches!(result.reason, EndReason::Lost | EndReason::Timeout | EndReason::Champion));

    let history = store.load_history("alice").unwrap();
    assert_eq!(
        history.entries(),
        &[ScoreRecord {
            score: result.final_score,
            date: 1_000,
            game_time: 2,
        }]
    );
}

#[test]
fn quit_does_not_persist() {
    let store = Rc::new(RefCell::new(MemoryStore::default()));
    let mut session = GameSession::new(3);
    session.subscribe(Box::new(ScoreRecorder::new(store.clone(), "bob")));

    session.start(GameConfig::default());
    session.advance(500);
    session.pause();
    assert!(session.quit());

    assert_eq!(session.phase(), GamePhase::NotStarted);
    assert!(session.result().is_none());
    assert!(store.load_history("bob").unwrap().is_empty());
}

#[test]
fn lifecycle_events_reach_subscribers() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut session = GameSession::new(5);
    session.subscribe(Box::new(Recorder(log.clone())));

    session.start(GameConfig::default());
    session.advance(160);
    session.pause();
    session.advance(5_000);
    session.resume();
    session.quit();

    let log = log.borrow();
    assert_eq!(log.frames, 10);

    let lifecycle: Vec<&GameEvent> = log
        .events
        .iter()
        .filter(|e| {
            matches!(
                e,
                GameEvent::Started { .. } | GameEvent::Paused | GameEvent::Resumed | GameEvent::Quit
            )
        })
        .collect();
    assert_eq!(lifecycle.len(), 4);
    assert!(matches!(lifecycle[0], GameEvent::Started { .. }));
    assert_eq!(lifecycle[1], &GameEvent::Paused);
    assert_eq!(lifecycle[2], &GameEvent::Resumed);
    assert_eq!(lifecycle[3], &GameEvent::Quit);
}

#[test]
fn held_shoot_key_respects_cooldown() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut session = GameSession::new(9);
    session.subscribe(Box::new(Recorder(log.clone())));

    let config = GameConfig::new("KeyJ", 60, "mars").unwrap();
    session.start(config);
    assert!(!session.key_down("Space"));
    assert!(session.key_down("KeyJ"));
    session.advance(1_000);

    let shots = log
        .borrow()
        .events
        .iter()
        .filter(|e| **e == GameEvent::ShipFired)
        .count();
    // Ticks at 16, 320, 624 and 928 clear the 300ms cooldown
    assert_eq!(shots, 4);
}

struct BrokenStore;

impl ScoreStore for BrokenStore {
    fn append_score(&mut self, _user: &str, _record: ScoreRecord) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::other("read-only")))
    }

    fn load_history(&self, _user: &str) -> Result<ScoreHistory, StoreError> {
        Ok(ScoreHistory::new())
    }
}

#[test]
fn storage_failure_does_not_block_end() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut session = GameSession::new(21);
    session.subscribe(Box::new(ScoreRecorder::new(BrokenStore, "carol")));
    session.subscribe(Box::new(Recorder(log.clone())));

    session.start(GameConfig::default());
    session.advance(100);
    assert!(session.end(EndReason::Lost));

    assert_eq!(session.phase(), GamePhase::Ended);
    assert!(!session.drivers_active());
    assert!(matches!(
        log.borrow().events.last(),
        Some(GameEvent::Ended(result)) if result.message == "You Lost!"
    ));

    // A new game can follow straight away
    assert!(session.start(GameConfig::default()));
    assert_eq!(session.state().score, 0);
}
