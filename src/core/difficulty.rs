//! Board sizes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::GameError;

/// Difficulty level. Fixes the number of pairs and the grid width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Number of verb pairs on the board.
    #[must_use]
    pub const fn pairs(self) -> usize {
        match self {
            Self::Easy => 6,
            Self::Medium => 12,
            Self::Hard => 20,
        }
    }

    /// Grid columns.
    #[must_use]
    pub const fn columns(self) -> usize {
        match self {
            Self::Easy => 3,
            Self::Medium => 4,
            Self::Hard => 5,
        }
    }

    /// Total cards on the board.
    #[must_use]
    pub const fn card_count(self) -> usize {
        self.pairs() * 2
    }

    /// Grid rows.
    #[must_use]
    pub const fn rows(self) -> usize {
        self.card_count() / self.columns()
    }

    /// Symbolic name used in every save format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Medium => "MEDIUM",
            Self::Hard => "HARD",
        }
    }

    /// Parse a symbolic name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.name() == name)
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| GameError::corrupt(format!("unknown difficulty {:?}", s)))
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
