//! Rules engine trait and transition results.
//!
//! A rules engine is a pure function from `(GameState, Intent)` to either
//! a new state or an error. It never mutates its input, so a rejected
//! intent leaves the caller's state exactly as it was.

use crate::core::{CardId, GameState, Intent, Move, Result};

/// Result of a completed game, from the local player's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Single player: every pair found.
    Solved,
    /// Multiplayer: local score higher.
    Won,
    /// Multiplayer: opponent score higher.
    Lost,
    /// Multiplayer: equal scores.
    Draw,
}

impl GameResult {
    /// Whether the local player finished on top.
    #[must_use]
    pub fn is_win(self) -> bool {
        matches!(self, Self::Solved | Self::Won)
    }
}

/// Who flipped the cards being resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Actor {
    Local,
    Opponent,
}

/// What a transition did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// First card of an attempt turned face up.
    Revealed(CardId),
    /// Second card completed a pair.
    Matched { mv: Move, points: u32, actor: Actor },
    /// Second card did not match; both wait for `ResolveMismatch`.
    Mismatched { mv: Move, actor: Actor },
    /// A mismatched pair was turned face down.
    FlippedBack(Move),
    /// Timer advanced to the given total.
    TimerAdvanced(u64),
    /// Timer paused or resumed.
    TimerToggled { running: bool },
    /// Accepted but nothing changed.
    NoChange,
}

/// A new state plus a description of how it was reached.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub outcome: Outcome,
    /// This transition found the last pair.
    pub completed: bool,
}

impl Transition {
    #[must_use]
    pub fn new(state: GameState, outcome: Outcome) -> Self {
        Self {
            state,
            outcome,
            completed: false,
        }
    }

    /// The attempt this transition completed, if any.
    #[must_use]
    pub fn completed_move(&self) -> Option<Move> {
        match self.outcome {
            Outcome::Matched { mv, .. } | Outcome::Mismatched { mv, .. } => Some(mv),
            _ => None,
        }
    }
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `apply`: must be deterministic and must not touch `state` on error
/// - `legal_flips`: empty when the local player cannot act
/// - `is_terminal`: `None` while the game continues
pub trait RulesEngine {
    /// Apply an intent, producing the next state.
    fn apply(&self, state: &GameState, intent: &Intent) -> Result<Transition>;

    /// Cards a `FlipCard` intent would accept right now.
    fn legal_flips(&self, state: &GameState) -> Vec<CardId>;

    /// Check if the game is over.
    fn is_terminal(&self, state: &GameState) -> Option<GameResult>;

    // === Convenience Methods ===

    /// Whether `intent` would be accepted.
    fn is_legal(&self, state: &GameState, intent: &Intent) -> bool {
        self.apply(state, intent).is_ok()
    }

    /// Apply a sequence of intents, stopping at the first error.
    fn apply_all<'a, I>(&self, state: &GameState, intents: I) -> Result<GameState>
    where
        I: IntoIterator<Item = &'a Intent>,
    {
        let mut current = state.clone();
        for intent in intents {
            current = self.apply(&current, intent)?.state;
        }
        Ok(current)
    }
}
