//! Error taxonomy shared by every transition.
//!
//! Transitions are atomic: when one of these is returned the state the
//! caller holds is exactly the state it passed in.

use thiserror::Error;

/// Errors produced by the deck builder and the game state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A transition precondition was violated (UI or programmer error).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The difficulty asks for more pairs than the catalog holds.
    #[error("difficulty needs {requested} verbs but the catalog only has {available}")]
    InsufficientVerbs { requested: usize, available: usize },

    /// A snapshot is malformed or breaks a state invariant.
    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// An opponent move does not fit the local state.
    #[error("multiplayer desync: {0}")]
    Desync(String),
}

impl GameError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidState(reason.into())
    }

    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::CorruptSnapshot(reason.into())
    }

    pub(crate) fn desync(reason: impl Into<String>) -> Self {
        Self::Desync(reason.into())
    }

    /// Whether the transport layer should request a full-state resend.
    #[must_use]
    pub fn needs_resync(&self) -> bool {
        matches!(self, Self::Desync(_))
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
