//! Core engine types: cards, difficulty, state, intents, RNG, configuration.
//!
//! Everything here is plain data plus invariant checks. The rules that
//! move a game from one state to the next live in `rules`.

pub mod action;
pub mod card;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod rng;
pub mod state;

pub use action::{Intent, Move};
pub use card::{Card, CardId, Language, VerbId};
pub use config::{GameConfig, GameMode, ScoringPolicy, TimerRestore};
pub use difficulty::Difficulty;
pub use error::{GameError, Result};
pub use rng::GameRng;
pub use state::{GameState, Pending};
