//! Saved games.
//!
//! A [`GameState`](crate::core::GameState) can be written in three
//! formats ([`SaveFormat`]) to a named slot in a [`HistoryStore`]. Every
//! decoded state is validated before it is handed back, so whatever a
//! store returns can be installed with
//! [`GameSession::install_snapshot`](crate::session::GameSession::install_snapshot).

pub mod error;
pub mod format;
pub mod store;
mod text;
mod xml;

pub use error::{HistoryError, Result};
pub use format::SaveFormat;
pub use store::{now_millis, validate_name, DirectoryStore, GameHistoryItem, HistoryStore, MemoryStore};
