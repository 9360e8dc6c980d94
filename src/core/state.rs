//! Game state: the authoritative aggregate.
//!
//! `GameState` is a plain value. Transitions never mutate a state in place;
//! they clone it (O(1) thanks to `im` persistent vectors), apply the change
//! to the clone and hand it back. The presentation layer can hold on to
//! any state it has been given without it changing underneath.
//!
//! Field names serialize in camelCase (`isFaceUp`, `matchedPairs`,
//! `elapsedTimeInSeconds`, ...) and form the snapshot format shared by
//! every save format.

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::action::Move;
use super::card::{Card, CardId};
use super::config::GameMode;
use super::difficulty::Difficulty;
use super::error::{GameError, Result};

/// Board positions of the face-up, unmatched cards.
pub type Pending = SmallVec<[usize; 2]>;

/// Complete state of one game, sufficient to resume play identically.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub difficulty: Difficulty,

    /// Cards in board order (index = position on the grid).
    pub cards: Vector<Card>,

    /// Completed pair attempts, by both players.
    pub moves: u32,

    pub matched_pairs: u32,

    /// Local player's score.
    pub score: u32,

    /// Consecutive matches by whoever is currently acting.
    pub match_streak: u32,

    pub move_history: Vector<Move>,

    pub game_completed: bool,

    pub elapsed_time_in_seconds: u64,

    pub is_timer_running: bool,

    // === Multiplayer ===
    pub is_multiplayer: bool,

    pub is_host: bool,

    /// Always true in single player.
    pub is_my_turn: bool,

    pub opponent_score: u32,

    pub my_pairs: u32,

    pub opponent_pairs: u32,
}

impl GameState {
    /// Create the state of a freshly dealt game with the timer running.
    ///
    /// In multiplayer the host takes the first turn.
    #[must_use]
    pub fn new(difficulty: Difficulty, cards: Vector<Card>, mode: GameMode) -> Self {
        let (is_multiplayer, is_host) = match mode {
            GameMode::SinglePlayer => (false, false),
            GameMode::Multiplayer { is_host } => (true, is_host),
        };

        Self {
            difficulty,
            cards,
            moves: 0,
            matched_pairs: 0,
            score: 0,
            match_streak: 0,
            move_history: Vector::new(),
            game_completed: false,
            elapsed_time_in_seconds: 0,
            is_timer_running: true,
            is_multiplayer,
            is_host,
            is_my_turn: !is_multiplayer || is_host,
            opponent_score: 0,
            my_pairs: 0,
            opponent_pairs: 0,
        }
    }

    // === Queries ===

    /// Board position of a card.
    #[must_use]
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// Get a card by ID.
    #[must_use]
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.position(id).and_then(|pos| self.cards.get(pos))
    }

    /// Grid `(row, column)` of a card.
    #[must_use]
    pub fn grid_position(&self, id: CardId) -> Option<(usize, usize)> {
        let columns = self.difficulty.columns();
        self.position(id).map(|pos| (pos / columns, pos % columns))
    }

    /// Positions of face-up, unmatched cards in board order.
    #[must_use]
    pub fn pending(&self) -> Pending {
        self.cards
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_pending())
            .map(|(pos, _)| pos)
            .collect()
    }

    /// IDs of face-up, unmatched cards in board order.
    #[must_use]
    pub fn pending_ids(&self) -> SmallVec<[CardId; 2]> {
        self.cards
            .iter()
            .filter(|c| c.is_pending())
            .map(|c| c.id)
            .collect()
    }

    /// Whether two mismatched cards are waiting to be flipped back.
    #[must_use]
    pub fn has_unresolved_mismatch(&self) -> bool {
        let pending = self.pending();
        pending.len() == 2 && !self.cards[pending[0]].pairs_with(&self.cards[pending[1]])
    }

    /// Pairs still face down.
    #[must_use]
    pub fn remaining_pairs(&self) -> u32 {
        (self.difficulty.pairs() as u32).saturating_sub(self.matched_pairs)
    }

    /// Whether every pair has been found.
    #[must_use]
    pub fn all_pairs_found(&self) -> bool {
        self.matched_pairs as usize == self.difficulty.pairs()
    }

    /// Whether the local player may flip a card right now.
    #[must_use]
    pub fn can_act(&self) -> bool {
        !self.game_completed && (!self.is_multiplayer || self.is_my_turn)
    }

    // === Perspective ===

    /// The same game seen from the other device.
    ///
    /// Used by the host to hand the guest its starting state and for
    /// full-state resync. A lone card the sender has selected is never
    /// sent as a move, so it is shown face down. Otherwise mirroring twice
    /// gives back the original.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let mut mirrored = self.clone();
        if self.is_multiplayer {
            if let [open] = self.pending().as_slice() {
                mirrored.cards[*open].is_face_up = false;
            }
            mirrored.is_host = !self.is_host;
            mirrored.is_my_turn = !self.is_my_turn;
            mirrored.score = self.opponent_score;
            mirrored.opponent_score = self.score;
            mirrored.my_pairs = self.opponent_pairs;
            mirrored.opponent_pairs = self.my_pairs;
        }
        mirrored
    }

    // === Validation ===

    /// Check every structural invariant.
    ///
    /// Returns `CorruptSnapshot` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let pairs = self.difficulty.pairs();

        if self.cards.len() != self.difficulty.card_count() {
            return Err(GameError::corrupt(format!(
                "{} difficulty needs {} cards, found {}",
                self.difficulty,
                self.difficulty.card_count(),
                self.cards.len()
            )));
        }

        let mut ids = FxHashSet::default();
        // verb -> (english card, spanish card)
        let mut faces: FxHashMap<u32, (Option<&Card>, Option<&Card>)> = FxHashMap::default();

        for card in &self.cards {
            if !ids.insert(card.id) {
                return Err(GameError::corrupt(format!("duplicate card id {}", card.id.0)));
            }
            if card.value == 0 {
                return Err(GameError::corrupt(format!("card {} has value 0", card.id.0)));
            }
            if card.is_matched && !card.is_face_up {
                return Err(GameError::corrupt(format!(
                    "card {} is matched but face down",
                    card.id.0
                )));
            }

            let slot = faces.entry(card.value.unsigned_abs()).or_default();
            let face = if card.value > 0 { &mut slot.0 } else { &mut slot.1 };
            if face.replace(card).is_some() {
                return Err(GameError::corrupt(format!(
                    "value {} appears more than once",
                    card.value
                )));
            }
        }

        if faces.len() != pairs {
            return Err(GameError::corrupt(format!(
                "expected {} distinct verbs, found {}",
                pairs,
                faces.len()
            )));
        }

        for (verb, (english, spanish)) in &faces {
            let (Some(english), Some(spanish)) = (english, spanish) else {
                return Err(GameError::corrupt(format!("verb {} is missing its partner", verb)));
            };
            if english.is_matched != spanish.is_matched {
                return Err(GameError::corrupt(format!(
                    "verb {} is only half matched",
                    verb
                )));
            }
        }

        let pending = self.pending();
        if pending.len() > 2 {
            return Err(GameError::corrupt(format!(
                "{} cards are face up and unmatched",
                pending.len()
            )));
        }
        if pending.len() == 2 && !self.has_unresolved_mismatch() {
            return Err(GameError::corrupt("a matching pair was left unresolved"));
        }

        let matched_cards = self.cards.iter().filter(|c| c.is_matched).count();
        if matched_cards / 2 != self.matched_pairs as usize {
            return Err(GameError::corrupt(format!(
                "matchedPairs is {} but {} cards are matched",
                self.matched_pairs, matched_cards
            )));
        }

        if self.move_history.len() != self.moves as usize {
            return Err(GameError::corrupt(format!(
                "moves is {} but the history holds {} entries",
                self.moves,
                self.move_history.len()
            )));
        }
        if self.match_streak > self.matched_pairs {
            return Err(GameError::corrupt("matchStreak exceeds matchedPairs"));
        }
        for mv in &self.move_history {
            if mv.card1_id == mv.card2_id || !ids.contains(&mv.card1_id) || !ids.contains(&mv.card2_id) {
                return Err(GameError::corrupt(format!(
                    "history move ({}, {}) does not fit the board",
                    mv.card1_id.0, mv.card2_id.0
                )));
            }
        }

        if self.game_completed != self.all_pairs_found() {
            return Err(GameError::corrupt(format!(
                "gameCompleted is {} with {} of {} pairs found",
                self.game_completed, self.matched_pairs, pairs
            )));
        }
        if self.game_completed && self.is_timer_running {
            return Err(GameError::corrupt("timer running on a completed game"));
        }

        if self.is_multiplayer {
            if self.my_pairs + self.opponent_pairs != self.matched_pairs {
                return Err(GameError::corrupt(format!(
                    "myPairs {} + opponentPairs {} != matchedPairs {}",
                    self.my_pairs, self.opponent_pairs, self.matched_pairs
                )));
            }
            // Off turn only a mismatch left on the table may be showing
            if !self.is_my_turn && pending.len() == 1 {
                return Err(GameError::corrupt("a card is selected during the opponent's turn"));
            }
        } else if self.my_pairs != self.matched_pairs
            || self.opponent_pairs != 0
            || self.opponent_score != 0
            || !self.is_my_turn
            || self.is_host
        {
            return Err(GameError::corrupt("multiplayer fields set on a single-player game"));
        }

        Ok(())
    }
}
