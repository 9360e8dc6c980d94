//! Verb catalog and board dealing.
//!
//! ## VerbCatalog
//!
//! Static verb id -> (English, Spanish) lookup. The sign of a card value
//! picks which of the two faces is shown.
//!
//! ## DeckBuilder
//!
//! Picks distinct verbs for a difficulty, emits one English and one
//! Spanish card per verb and shuffles the result into board order.

pub mod catalog;
pub mod deck;

pub use catalog::{Verb, VerbCatalog};
pub use deck::DeckBuilder;
