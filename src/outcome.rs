//! End-of-game classification
//!
//! A game ends because the player ran out of lives, cleared the formation,
//! or ran out of time. Timeouts are split by score into two classes.

use serde::{Deserialize, Serialize};

use crate::consts::WINNER_THRESHOLD;

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    Lost,
    Timeout,
    Champion,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Lost => "lost",
            EndReason::Timeout => "timeout",
            EndReason::Champion => "champion",
        }
    }
}

/// How the result is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeClass {
    Lost,
    Champion,
    /// Timed out below the winner threshold
    Better,
    /// Timed out at or above the winner threshold
    Winner,
}

impl OutcomeClass {
    pub fn classify(reason: EndReason, score: u32) -> Self {
        match reason {
            EndReason::Lost => OutcomeClass::Lost,
            EndReason::Champion => OutcomeClass::Champion,
            EndReason::Timeout if score < WINNER_THRESHOLD => OutcomeClass::Better,
            EndReason::Timeout => OutcomeClass::Winner,
        }
    }

    /// Headline shown on the game-over screen
    pub fn title(&self) -> &'static str {
        match self {
            OutcomeClass::Lost => "You Lost!",
            OutcomeClass::Champion => "Champion!",
            OutcomeClass::Better => "You can do better",
            OutcomeClass::Winner => "Winner!",
        }
    }

    /// Style identifier for the renderer
    pub fn style(&self) -> &'static str {
        match self {
            OutcomeClass::Lost => "message-lost",
            OutcomeClass::Champion => "message-champion",
            OutcomeClass::Better => "message-better",
            OutcomeClass::Winner => "message-winner",
        }
    }
}

/// Final result of a game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub reason: EndReason,
    pub final_score: u32,
    pub class: OutcomeClass,
    pub message: String,
}

impl GameResult {
    pub fn new(reason: EndReason, final_score: u32) -> Self {
        let class = OutcomeClass::classify(reason, final_score);
        Self {
            reason,
            final_score,
            class,
            message: class.title().to_string(),
        }
    }

    /// One-line score summary
    pub fn summary(&self) -> String {
        format!("You scored {} points!", self.final_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_boundary_at_100() {
        assert_eq!(GameResult::new(EndReason::Timeout, 99).class, OutcomeClass::Better);
        assert_eq!(GameResult::new(EndReason::Timeout, 100).class, OutcomeClass::Winner);
        assert_eq!(GameResult::new(EndReason::Timeout, 0).message, "You can do better");
        assert_eq!(GameResult::new(EndReason::Timeout, 250).message, "Winner!");
    }

    #[test]
    fn test_lost_and_champion_ignore_score() {
        for score in [0, 99, 100, 250] {
            assert_eq!(OutcomeClass::classify(EndReason::Lost, score), OutcomeClass::Lost);
            assert_eq!(
                OutcomeClass::classify(EndReason::Champion, score),
                OutcomeClass::Champion
            );
        }
        assert_eq!(GameResult::new(EndReason::Lost, 40).message, "You Lost!");
        assert_eq!(GameResult::new(EndReason::Champion, 250).message, "Champion!");
    }

    #[test]
    fn test_summary_and_wire_format() {
        let result = GameResult::new(EndReason::Champion, 250);
        assert_eq!(result.summary(), "You scored 250 points!");

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["reason"], "champion");
        assert_eq!(json["final_score"], 250);
        assert_eq!(json["class"], "champion");
    }
}
