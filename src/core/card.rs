//! Cards and board identifiers.
//!
//! A card value carries two things at once: its magnitude is the verb id
//! in the catalog, its sign is the language shown on the face
//! (`+` English, `-` Spanish). Two cards pair up when their values are
//! additive inverses.

use serde::{Deserialize, Serialize};

/// Card identifier, unique within one game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Verb identifier in the catalog (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerbId(pub u32);

impl VerbId {
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Value of the English face of this verb.
    #[must_use]
    pub const fn english_value(self) -> i32 {
        self.0 as i32
    }

    /// Value of the Spanish face of this verb.
    #[must_use]
    pub const fn spanish_value(self) -> i32 {
        -(self.0 as i32)
    }
}

/// Language shown on a card face.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Language {
    English,
    Spanish,
}

impl Language {
    /// Language of a signed card value.
    #[must_use]
    pub const fn of_value(value: i32) -> Self {
        if value > 0 {
            Self::English
        } else {
            Self::Spanish
        }
    }

    /// Two-letter code shown in the card corner.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "EN",
            Self::Spanish => "ES",
        }
    }
}

/// A single card on the board.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,

    /// Signed value: magnitude selects the verb, sign selects the language.
    pub value: i32,

    pub is_face_up: bool,

    /// Matched cards stay face up for the rest of the game.
    pub is_matched: bool,
}

impl Card {
    /// Create a face-down, unmatched card.
    #[must_use]
    pub fn new(id: CardId, value: i32) -> Self {
        Self {
            id,
            value,
            is_face_up: false,
            is_matched: false,
        }
    }

    /// Verb shown on this card.
    #[must_use]
    pub fn verb(&self) -> VerbId {
        VerbId(self.value.unsigned_abs())
    }

    /// Language shown on this card.
    #[must_use]
    pub fn language(&self) -> Language {
        Language::of_value(self.value)
    }

    /// Face up but not yet part of a resolved pair.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.is_face_up && !self.is_matched
    }

    /// Whether `other` completes a pair with this card.
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.value != 0 && self.value == -other.value
    }
}
