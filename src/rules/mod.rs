//! The game state machine.
//!
//! `RulesEngine` is the seam: a pure `(GameState, Intent) -> Transition`
//! function plus terminal detection. `MatchRules` is the memory game's
//! implementation of it.
//!
//! Nothing in this module owns state, logs or waits. Timing (how long a
//! mismatch stays visible) and ownership (which state is current) belong
//! to `session`.

pub mod engine;
pub mod matching;

pub use engine::{Actor, GameResult, Outcome, RulesEngine, Transition};
pub use matching::MatchRules;
