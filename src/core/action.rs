//! Intents and the move log.
//!
//! An `Intent` is everything that can ask the state machine to change:
//! a click on a card, the deferred flip-back after a mismatch, a timer
//! tick, or a turn reported by the opponent. A `Move` is the record of a
//! completed pair attempt, appended to the history in play order.

use serde::{Deserialize, Serialize};

use super::card::CardId;
use crate::net::MoveEvent;

/// A completed pair attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// First card flipped.
    pub card1_id: CardId,
    /// Second card flipped.
    pub card2_id: CardId,
}

impl Move {
    #[must_use]
    pub fn new(card1_id: CardId, card2_id: CardId) -> Self {
        Self { card1_id, card2_id }
    }

    /// Whether this move touched `card`.
    #[must_use]
    pub fn involves(&self, card: CardId) -> bool {
        self.card1_id == card || self.card2_id == card
    }
}

/// A request to change the game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    /// Turn a face-down card face up.
    FlipCard(CardId),
    /// Turn a mismatched pair back face down.
    ResolveMismatch,
    /// Advance the timer.
    Tick { delta_seconds: u64 },
    PauseTimer,
    ResumeTimer,
    /// Apply a turn played by the opponent.
    OpponentMove(MoveEvent),
}
