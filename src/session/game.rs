use std::collections::VecDeque;

use crate::cards::{DeckBuilder, VerbCatalog};
use crate::core::{
    CardId, Difficulty, GameConfig, GameError, GameRng, GameState, Intent, Move, Result,
};
use crate::net::MoveEvent;
use crate::rules::{Actor, GameResult, MatchRules, Outcome, RulesEngine, Transition};

/// Permission to flip a mismatched pair back, valid for one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MismatchTicket {
    generation: u64,
    mv: Move,
}

impl MismatchTicket {
    /// Generation the ticket was issued in.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The mismatched attempt.
    #[must_use]
    pub fn attempt(&self) -> Move {
        self.mv
    }
}

/// What an accepted intent did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub outcome: Outcome,
    /// The last pair was found by this step.
    pub completed: bool,
    /// Present when the step left a mismatched pair face up.
    pub flip_back: Option<MismatchTicket>,
}

/// Owner of the current game.
pub struct GameSession {
    config: GameConfig,
    rules: MatchRules,
    catalog: VerbCatalog,
    rng: GameRng,
    state: GameState,
    generation: u64,
    outbox: VecDeque<MoveEvent>,
}

impl GameSession {
    /// Create a session with the standard catalog and deal a first game.
    pub fn new(config: GameConfig, difficulty: Difficulty) -> Result<Self> {
        Self::with_catalog(config, VerbCatalog::standard(), difficulty)
    }

    /// Create a session with a custom catalog and deal a first game.
    pub fn with_catalog(
        config: GameConfig,
        catalog: VerbCatalog,
        difficulty: Difficulty,
    ) -> Result<Self> {
        let mut rng = GameRng::new(config.seed);
        let cards = DeckBuilder::new(&catalog).build(difficulty, &mut rng)?;
        let state = GameState::new(difficulty, cards, config.mode);
        log::info!("new {} game ({:?})", difficulty, config.mode);

        Ok(Self {
            rules: MatchRules::new(config.scoring),
            config,
            catalog,
            rng,
            state,
            generation: 0,
            outbox: VecDeque::new(),
        })
    }

    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    #[must_use]
    pub fn catalog(&self) -> &VerbCatalog {
        &self.catalog
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Bumped whenever the current game is replaced.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Text shown on a card, if it is face up.
    #[must_use]
    pub fn face_text(&self, id: CardId) -> Option<&str> {
        let card = self.state.card(id)?;
        if !card.is_face_up {
            return None;
        }
        self.catalog.text(card.value)
    }

    #[must_use]
    pub fn legal_flips(&self) -> Vec<CardId> {
        self.rules.legal_flips(&self.state)
    }

    #[must_use]
    pub fn result(&self) -> Option<GameResult> {
        self.rules.is_terminal(&self.state)
    }

    // === Lifecycle ===

    /// Discard the current game and deal a new one.
    ///
    /// On error the current game is kept.
    pub fn start_new_game(&mut self, difficulty: Difficulty) -> Result<()> {
        let cards = match DeckBuilder::new(&self.catalog).build(difficulty, &mut self.rng) {
            Ok(cards) => cards,
            Err(err) => {
                log::error!("cannot start a {} game: {}", difficulty, err);
                return Err(err);
            }
        };

        self.replace_state(GameState::new(difficulty, cards, self.config.mode));
        log::info!(
            "new {} game ({:?}), generation {}",
            difficulty,
            self.config.mode,
            self.generation
        );
        Ok(())
    }

    /// Deep copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameState {
        self.state.clone()
    }

    /// Replace the current game with a validated snapshot.
    ///
    /// On error the current game is untouched.
    pub fn install_snapshot(&mut self, snapshot: GameState) -> Result<()> {
        if let Some(card) = snapshot
            .cards
            .iter()
            .find(|c| !self.catalog.contains_value(c.value))
        {
            let err = GameError::corrupt(format!(
                "card {} has value {} outside the catalog",
                card.id.0, card.value
            ));
            log::warn!("rejected snapshot: {}", err);
            return Err(err);
        }

        let restored = match self.rules.restore(&snapshot, self.config.timer_restore) {
            Ok(restored) => restored,
            Err(err) => {
                log::warn!("rejected snapshot: {}", err);
                return Err(err);
            }
        };

        self.replace_state(restored);
        log::info!(
            "installed {} snapshot with {} moves, generation {}",
            self.state.difficulty,
            self.state.moves,
            self.generation
        );
        Ok(())
    }

    /// Install the state the other device sent, seen from this side.
    ///
    /// The guest calls this with the host's state to join a game; either
    /// side calls it to resynchronize after a desync.
    pub fn install_opponent_snapshot(&mut self, opponent_view: &GameState) -> Result<()> {
        self.install_snapshot(opponent_view.mirrored())
    }

    // === Transitions ===

    /// Flip a card for the local player.
    pub fn flip_card(&mut self, id: CardId) -> Result<Step> {
        self.commit(&Intent::FlipCard(id))
    }

    /// Flip the mismatched pair back right away.
    pub fn resolve_mismatch(&mut self) -> Result<Step> {
        self.commit(&Intent::ResolveMismatch)
    }

    /// Redeem a deferred flip-back.
    ///
    /// Returns `Ok(false)` without touching anything when the ticket is
    /// stale: the game was replaced, or that pair is no longer showing.
    pub fn resolve_pending(&mut self, ticket: MismatchTicket) -> Result<bool> {
        if ticket.generation != self.generation {
            log::debug!(
                "dropping flip-back from generation {} (now {})",
                ticket.generation,
                self.generation
            );
            return Ok(false);
        }

        let pending = self.state.pending_ids();
        let showing = pending.len() == 2
            && ticket.mv.involves(pending[0])
            && ticket.mv.involves(pending[1]);
        if !showing {
            log::debug!("flip-back for {:?} already handled", ticket.mv);
            return Ok(false);
        }

        self.commit(&Intent::ResolveMismatch)?;
        Ok(true)
    }

    /// Advance the timer.
    pub fn tick(&mut self, delta_seconds: u64) -> Outcome {
        let transition = self.rules.tick(&self.state, delta_seconds);
        self.state = transition.state;
        transition.outcome
    }

    pub fn pause_timer(&mut self) -> Result<Step> {
        self.commit(&Intent::PauseTimer)
    }

    pub fn resume_timer(&mut self) -> Result<Step> {
        self.commit(&Intent::ResumeTimer)
    }

    /// Apply a turn received from the transport.
    ///
    /// A `Desync` error means the transport should request a full-state
    /// resend and pass it to [`GameSession::install_opponent_snapshot`].
    pub fn apply_opponent_move(&mut self, event: MoveEvent) -> Result<Step> {
        self.commit(&Intent::OpponentMove(event))
    }

    /// Apply any intent.
    pub fn apply(&mut self, intent: &Intent) -> Result<Step> {
        self.commit(intent)
    }

    /// Take the local moves waiting to be sent to the opponent.
    pub fn drain_outgoing(&mut self) -> Vec<MoveEvent> {
        self.outbox.drain(..).collect()
    }

    // === Internals ===

    fn replace_state(&mut self, state: GameState) {
        self.state = state;
        self.generation += 1;
        self.outbox.clear();
    }

    fn commit(&mut self, intent: &Intent) -> Result<Step> {
        let Transition {
            state,
            outcome,
            completed,
        } = match self.rules.apply(&self.state, intent) {
            Ok(transition) => transition,
            Err(err) => {
                if err.needs_resync() {
                    log::warn!("desync on {:?}: {}", intent, err);
                } else {
                    log::warn!("ignoring {:?}: {}", intent, err);
                }
                return Err(err);
            }
        };

        let flip_back = match outcome {
            Outcome::Mismatched { mv, .. } => Some(MismatchTicket {
                generation: self.generation,
                mv,
            }),
            _ => None,
        };

        if state.is_multiplayer {
            if let Outcome::Matched { mv, actor: Actor::Local, .. }
            | Outcome::Mismatched { mv, actor: Actor::Local } = outcome
            {
                self.outbox
                    .push_back(MoveEvent::new(self.state.moves, mv.card1_id, mv.card2_id));
            }
        }

        log::debug!("{:?} -> {:?}", intent, outcome);
        if completed {
            log::info!(
                "game completed in {} moves, score {} vs {}",
                state.moves,
                state.score,
                state.opponent_score
            );
        }

        self.state = state;
        Ok(Step {
            outcome,
            completed,
            flip_back,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameMode, TimerRestore};

    /// Position of the partner of the card at `pos`.
    fn partner(state: &GameState, pos: usize) -> usize {
        let value = state.cards[pos].value;
        state.cards.iter().position(|c| c.value == -value).unwrap()
    }

    /// Positions of two cards that do not match.
    fn mismatch(state: &GameState) -> (usize, usize) {
        let first = state.cards.iter().position(|c| !c.is_face_up).unwrap();
        let second = state
            .cards
            .iter()
            .position(|c| !c.is_face_up && c.value != -state.cards[first].value && c.id != state.cards[first].id)
            .unwrap();
        (first, second)
    }

    fn id_at(session: &GameSession, pos: usize) -> CardId {
        session.state().cards[pos].id
    }

    #[test]
    fn test_new_session() {
        let session = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
        assert_eq!(session.state().cards.len(), 12);
        assert!(session.state().is_timer_running);
        assert_eq!(session.generation(), 0);
        assert_eq!(session.legal_flips().len(), 12);
    }

    #[test]
    fn test_face_text_only_when_face_up() {
        let mut session = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
        let id = id_at(&session, 0);
        assert_eq!(session.face_text(id), None);

        session.flip_card(id).unwrap();
        let value = session.state().cards[0].value;
        assert_eq!(session.face_text(id), session.catalog().text(value));
        assert!(session.face_text(id).is_some());
    }

    #[test]
    fn test_match_through_session() {
        let mut session = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
        let other = partner(session.state(), 0);
        let (a, b) = (id_at(&session, 0), id_at(&session, other));

        session.flip_card(a).unwrap();
        let step = session.flip_card(b).unwrap();

        assert!(matches!(step.outcome, Outcome::Matched { .. }));
        assert!(step.flip_back.is_none());
        assert_eq!(session.state().matched_pairs, 1);
        // Single player never queues transport messages
        assert!(session.drain_outgoing().is_empty());
    }

    #[test]
    fn test_rejected_flip_leaves_state() {
        let mut session = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
        let id = id_at(&session, 0);
        session.flip_card(id).unwrap();
        let before = session.snapshot();

        let err = session.flip_card(id).unwrap_err();
        assert!(matches!(err, GameError::InvalidState(_)));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_deferred_flip_back() {
        let mut session = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
        let (p, q) = mismatch(session.state());
        let (a, b) = (id_at(&session, p), id_at(&session, q));

        session.flip_card(a).unwrap();
        let ticket = session.flip_card(b).unwrap().flip_back.unwrap();
        assert_eq!(ticket.attempt(), Move::new(a, b));
        assert_eq!(session.state().pending().len(), 2);

        assert!(session.resolve_pending(ticket).unwrap());
        assert!(session.state().pending().is_empty());

        // Redeeming twice does nothing
        assert!(!session.resolve_pending(ticket).unwrap());
    }

    #[test]
    fn test_stale_ticket_after_new_game() {
        let mut session = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
        let (p, q) = mismatch(session.state());
        let (a, b) = (id_at(&session, p), id_at(&session, q));

        session.flip_card(a).unwrap();
        let ticket = session.flip_card(b).unwrap().flip_back.unwrap();

        session.start_new_game(Difficulty::Medium).unwrap();
        assert_eq!(session.generation(), 1);
        assert_eq!(ticket.generation(), 0);

        let before = session.snapshot();
        assert!(!session.resolve_pending(ticket).unwrap());
        assert_eq!(session.state(), &before);
        assert_eq!(session.state().cards.len(), 24);
    }

    #[test]
    fn test_insufficient_verbs_keeps_game() {
        use crate::cards::Verb;
        use crate::core::VerbId;

        let mut catalog = VerbCatalog::new();
        for id in 1..=8 {
            catalog.register(Verb::new(VerbId::new(id), "x", "y"));
        }
        let mut session =
            GameSession::with_catalog(GameConfig::default(), catalog, Difficulty::Easy).unwrap();
        let before = session.snapshot();

        let err = session.start_new_game(Difficulty::Medium).unwrap_err();
        assert_eq!(err, GameError::InsufficientVerbs { requested: 12, available: 8 });
        assert_eq!(session.state(), &before);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_snapshot_install_roundtrip() {
        let mut session = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
        let id = id_at(&session, 3);
        session.flip_card(id).unwrap();
        session.tick(12);

        let snapshot = session.snapshot();
        session.start_new_game(Difficulty::Hard).unwrap();
        session.install_snapshot(snapshot.clone()).unwrap();

        assert_eq!(session.state(), &snapshot);
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn test_install_paused_policy() {
        let config = GameConfig::default().with_timer_restore(TimerRestore::Paused);
        let mut session = GameSession::new(config, Difficulty::Easy).unwrap();
        let snapshot = session.snapshot();
        assert!(snapshot.is_timer_running);

        session.install_snapshot(snapshot).unwrap();
        assert!(!session.state().is_timer_running);
        assert_eq!(session.tick(5), Outcome::NoChange);

        session.resume_timer().unwrap();
        assert_eq!(session.tick(5), Outcome::TimerAdvanced(5));
    }

    #[test]
    fn test_install_rejects_unknown_values() {
        let mut session = GameSession::new(GameConfig::default(), Difficulty::Easy).unwrap();
        let mut snapshot = session.snapshot();
        let before = session.snapshot();

        // Rename a whole pair to a verb the catalog does not have
        let value = snapshot.cards[0].value;
        for card in snapshot.cards.iter_mut() {
            if card.value.abs() == value.abs() {
                card.value = card.value.signum() * 99;
            }
        }

        let err = session.install_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, GameError::CorruptSnapshot(_)));
        assert_eq!(session.state(), &before);
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn test_multiplayer_outbox_and_join() {
        let host_config = GameConfig::default().with_mode(GameMode::Multiplayer { is_host: true });
        let guest_config = GameConfig::default()
            .with_mode(GameMode::Multiplayer { is_host: false })
            .with_seed(99);

        let mut host = GameSession::new(host_config, Difficulty::Easy).unwrap();
        let mut guest = GameSession::new(guest_config, Difficulty::Easy).unwrap();
        guest.install_opponent_snapshot(&host.snapshot()).unwrap();

        assert_eq!(guest.state().cards, host.state().cards);
        assert!(host.state().is_my_turn);
        assert!(!guest.state().is_my_turn);

        // Host misses
        let (p, q) = mismatch(host.state());
        let (a, b) = (id_at(&host, p), id_at(&host, q));
        host.flip_card(a).unwrap();
        host.flip_card(b).unwrap();
        assert!(!host.state().is_my_turn);

        let sent = host.drain_outgoing();
        assert_eq!(sent, vec![MoveEvent::new(0, a, b)]);
        assert!(host.drain_outgoing().is_empty());

        // Guest replays it and gets the turn
        let step = guest.apply_opponent_move(sent[0]).unwrap();
        assert!(matches!(step.outcome, Outcome::Mismatched { actor: Actor::Opponent, .. }));
        assert!(guest.state().is_my_turn);
        assert!(step.flip_back.is_some());

        // Duplicate delivery is a desync, state untouched
        let before = guest.snapshot();
        let err = guest.apply_opponent_move(sent[0]).unwrap_err();
        assert!(err.needs_resync());
        assert_eq!(guest.state(), &before);
    }
}
