//! Match rules: flipping, pair resolution, turns, timer and restore.

use crate::core::{
    CardId, GameError, GameState, Intent, Move, Result, ScoringPolicy, TimerRestore,
};
use crate::net::MoveEvent;

use super::engine::{Actor, GameResult, Outcome, RulesEngine, Transition};

/// The memory game rules.
///
/// ## Turn resolution
///
/// - First flip of an attempt just turns the card face up.
/// - Second flip resolves the attempt immediately: a match marks both
///   cards, scores and keeps the turn; a mismatch resets the streak and,
///   in multiplayer, hands the turn over. Mismatched cards stay face up
///   until `ResolveMismatch`, so the caller decides how long they show.
/// - Finding the last pair completes the game and stops the timer.
#[derive(Clone, Debug, Default)]
pub struct MatchRules {
    scoring: ScoringPolicy,
}

impl MatchRules {
    #[must_use]
    pub fn new(scoring: ScoringPolicy) -> Self {
        Self { scoring }
    }

    #[must_use]
    pub fn scoring(&self) -> &ScoringPolicy {
        &self.scoring
    }

    /// Turn a face-down card face up, resolving the attempt if it is the
    /// second card.
    pub fn flip_card(&self, state: &GameState, id: CardId) -> Result<Transition> {
        if state.game_completed {
            return Err(GameError::invalid("game is already completed"));
        }
        if state.is_multiplayer && !state.is_my_turn {
            return Err(GameError::invalid("it is the opponent's turn"));
        }

        let pos = state
            .position(id)
            .ok_or_else(|| GameError::invalid(format!("no card with id {}", id.0)))?;
        let card = &state.cards[pos];
        if card.is_matched {
            return Err(GameError::invalid(format!("card {} is already matched", id.0)));
        }
        if card.is_face_up {
            return Err(GameError::invalid(format!("card {} is already face up", id.0)));
        }

        let pending = state.pending();
        match pending.len() {
            0 => {
                let mut next = state.clone();
                next.cards[pos].is_face_up = true;
                Ok(Transition::new(next, Outcome::Revealed(id)))
            }
            1 => {
                let mut next = state.clone();
                next.cards[pos].is_face_up = true;
                Ok(self.resolve_attempt(next, pending[0], pos, Actor::Local))
            }
            n => Err(GameError::invalid(format!(
                "{} cards are already face up; resolve the mismatch first",
                n
            ))),
        }
    }

    /// Turn an unresolved mismatched pair face down.
    pub fn resolve_mismatch(&self, state: &GameState) -> Result<Transition> {
        if !state.has_unresolved_mismatch() {
            return Err(GameError::invalid("no mismatched pair is waiting to flip back"));
        }

        let pending = state.pending();
        let mut next = state.clone();
        for &pos in &pending {
            next.cards[pos].is_face_up = false;
        }

        let mv = Move::new(state.cards[pending[0]].id, state.cards[pending[1]].id);
        Ok(Transition::new(next, Outcome::FlippedBack(mv)))
    }

    /// Advance the timer while it runs on an unfinished game.
    #[must_use]
    pub fn tick(&self, state: &GameState, delta_seconds: u64) -> Transition {
        if !state.is_timer_running || state.game_completed || delta_seconds == 0 {
            return Transition::new(state.clone(), Outcome::NoChange);
        }

        let mut next = state.clone();
        next.elapsed_time_in_seconds = next.elapsed_time_in_seconds.saturating_add(delta_seconds);
        let elapsed = next.elapsed_time_in_seconds;
        Transition::new(next, Outcome::TimerAdvanced(elapsed))
    }

    /// Pause or resume the timer.
    pub fn set_timer_running(&self, state: &GameState, running: bool) -> Result<Transition> {
        if running && state.game_completed {
            return Err(GameError::invalid("cannot resume the timer of a completed game"));
        }
        if state.is_timer_running == running {
            return Ok(Transition::new(state.clone(), Outcome::NoChange));
        }

        let mut next = state.clone();
        next.is_timer_running = running;
        Ok(Transition::new(next, Outcome::TimerToggled { running }))
    }

    /// Apply a turn reported by the opponent.
    ///
    /// Anything that does not fit the local copy of the game is a
    /// `Desync`; the transport is expected to resend the full state.
    pub fn opponent_move(&self, state: &GameState, event: &MoveEvent) -> Result<Transition> {
        if !state.is_multiplayer {
            return Err(GameError::invalid("opponent moves need a multiplayer game"));
        }
        if state.game_completed {
            return Err(GameError::desync(format!(
                "move {} arrived after the game completed",
                event.move_id
            )));
        }
        if state.is_my_turn {
            return Err(GameError::desync(format!(
                "move {} arrived during the local turn",
                event.move_id
            )));
        }
        if event.move_id < state.moves {
            return Err(GameError::desync(format!("duplicate move {}", event.move_id)));
        }
        if event.move_id > state.moves {
            return Err(GameError::desync(format!(
                "out-of-order move {} (expected {})",
                event.move_id, state.moves
            )));
        }
        if event.card1_id == event.card2_id {
            return Err(GameError::desync(format!(
                "move {} flips card {} twice",
                event.move_id, event.card1_id.0
            )));
        }

        let locate = |id: CardId| -> Result<usize> {
            let pos = state
                .position(id)
                .ok_or_else(|| GameError::desync(format!("unknown card {}", id.0)))?;
            if state.cards[pos].is_matched {
                return Err(GameError::desync(format!("card {} is already matched", id.0)));
            }
            Ok(pos)
        };
        let first = locate(event.card1_id)?;
        let second = locate(event.card2_id)?;

        let mut next = state.clone();
        let pending = next.pending();
        if next.has_unresolved_mismatch() {
            // Our last attempt is still showing; its flip-back is cosmetic.
            for &pos in &pending {
                next.cards[pos].is_face_up = false;
            }
        } else if !pending.is_empty() {
            return Err(GameError::desync(
                "a local selection is open during the opponent's turn",
            ));
        }

        next.cards[first].is_face_up = true;
        next.cards[second].is_face_up = true;
        Ok(self.resolve_attempt(next, first, second, Actor::Opponent))
    }

    /// Validate a snapshot and prepare it for installation.
    pub fn restore(&self, snapshot: &GameState, timer: TimerRestore) -> Result<GameState> {
        snapshot.validate()?;

        let mut restored = snapshot.clone();
        if timer == TimerRestore::Paused {
            restored.is_timer_running = false;
        }
        Ok(restored)
    }

    /// Score and record the attempt formed by the cards at `first` and
    /// `second`, both already face up in `next`.
    fn resolve_attempt(
        &self,
        mut next: GameState,
        first: usize,
        second: usize,
        actor: Actor,
    ) -> Transition {
        let mv = Move::new(next.cards[first].id, next.cards[second].id);
        next.move_history.push_back(mv);
        next.moves += 1;

        if !next.cards[first].pairs_with(&next.cards[second]) {
            next.match_streak = 0;
            if next.is_multiplayer {
                next.is_my_turn = actor == Actor::Opponent;
            }
            return Transition::new(next, Outcome::Mismatched { mv, actor });
        }

        next.cards[first].is_matched = true;
        next.cards[second].is_matched = true;
        next.matched_pairs += 1;
        next.match_streak += 1;

        let points = self.scoring.points(next.match_streak);
        match actor {
            Actor::Local => {
                next.score = next.score.saturating_add(points);
                next.my_pairs += 1;
            }
            Actor::Opponent => {
                next.opponent_score = next.opponent_score.saturating_add(points);
                next.opponent_pairs += 1;
            }
        }

        let completed = next.all_pairs_found();
        if completed {
            next.game_completed = true;
            next.is_timer_running = false;
        }

        Transition {
            state: next,
            outcome: Outcome::Matched { mv, points, actor },
            completed,
        }
    }
}

impl RulesEngine for MatchRules {
    fn apply(&self, state: &GameState, intent: &Intent) -> Result<Transition> {
        match intent {
            Intent::FlipCard(id) => self.flip_card(state, *id),
            Intent::ResolveMismatch => self.resolve_mismatch(state),
            Intent::Tick { delta_seconds } => Ok(self.tick(state, *delta_seconds)),
            Intent::PauseTimer => self.set_timer_running(state, false),
            Intent::ResumeTimer => self.set_timer_running(state, true),
            Intent::OpponentMove(event) => self.opponent_move(state, event),
        }
    }

    fn legal_flips(&self, state: &GameState) -> Vec<CardId> {
        if !state.can_act() || state.pending().len() >= 2 {
            return vec![];
        }

        state
            .cards
            .iter()
            .filter(|c| !c.is_face_up && !c.is_matched)
            .map(|c| c.id)
            .collect()
    }

    fn is_terminal(&self, state: &GameState) -> Option<GameResult> {
        if !state.game_completed {
            return None;
        }
        if !state.is_multiplayer {
            return Some(GameResult::Solved);
        }

        Some(match state.score.cmp(&state.opponent_score) {
            std::cmp::Ordering::Greater => GameResult::Won,
            std::cmp::Ordering::Less => GameResult::Lost,
            std::cmp::Ordering::Equal => GameResult::Draw,
        })
    }
}
