//! # rust-memory
//!
//! A memory (card-matching) game engine. Each pair is a verb shown once in
//! English and once in Spanish; the player turns two cards at a time and
//! keeps them when they translate each other.
//!
//! ## Design Principles
//!
//! 1. **Pure transitions**: the rules are a function from
//!    `(GameState, Intent)` to a new state. A rejected intent leaves the
//!    input state untouched.
//!
//! 2. **Single owner**: `GameSession` holds the one authoritative state and
//!    serializes every change through `&mut self`.
//!
//! 3. **Deterministic**: dealing uses a seeded ChaCha8 RNG, so a seed and a
//!    sequence of intents reproduce a game exactly.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so every
//!   transition can hand out a fresh state cheaply.
//!
//! - **Generation stamps**: a mismatch is committed at once but flipped
//!   back later through a `MismatchTicket`; tickets from an older game are
//!   ignored.
//!
//! ## Modules
//!
//! - `core`: cards, difficulty, configuration, state, intents, RNG, errors
//! - `cards`: verb catalog and deck dealing
//! - `rules`: `RulesEngine` trait and the matching rules
//! - `session`: the game controller
//! - `history`: JSON/XML/TXT saves and save stores
//! - `net`: the move message exchanged in two-player games

pub mod core;
pub mod cards;
pub mod rules;
pub mod session;
pub mod history;
pub mod net;

// Re-export commonly used types
pub use crate::core::{
    Card, CardId, Language, VerbId,
    Difficulty,
    GameConfig, GameMode, ScoringPolicy, TimerRestore,
    GameError, Result,
    GameRng,
    Intent, Move,
    GameState, Pending,
};

pub use crate::cards::{DeckBuilder, Verb, VerbCatalog};

pub use crate::rules::{Actor, GameResult, MatchRules, Outcome, RulesEngine, Transition};

pub use crate::session::{GameSession, MismatchTicket, Step};

pub use crate::history::{
    DirectoryStore, GameHistoryItem, HistoryError, HistoryStore, MemoryStore, SaveFormat,
};

pub use crate::net::{decode_frame, encode_frame, FrameError, MoveEvent};
