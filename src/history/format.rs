//! Save formats.

use serde::{Deserialize, Serialize};

use super::error::Result;
use super::{text, xml};
use crate::core::GameState;

/// On-disk representation of a saved game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SaveFormat {
    /// Structured text.
    Json,
    /// Markup.
    Xml,
    /// Plain `key=value` lines.
    Txt,
}

impl SaveFormat {
    pub const ALL: [SaveFormat; 3] = [SaveFormat::Json, SaveFormat::Xml, SaveFormat::Txt];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Json => "JSON",
            Self::Xml => "XML",
            Self::Txt => "TXT",
        }
    }

    /// File extension, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
            Self::Txt => "txt",
        }
    }

    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.extension() == extension)
    }

    /// Serialize a state.
    pub fn encode(self, state: &GameState) -> Result<String> {
        Ok(match self {
            Self::Json => serde_json::to_string_pretty(state)?,
            Self::Xml => xml::to_xml(state),
            Self::Txt => text::to_text(state),
        })
    }

    /// Parse and validate a state.
    pub fn decode(self, input: &str) -> Result<GameState> {
        let state = match self {
            Self::Json => serde_json::from_str(input)?,
            Self::Xml => xml::from_xml(input)?,
            Self::Txt => text::from_text(input)?,
        };
        state.validate()?;
        Ok(state)
    }
}

impl std::fmt::Display for SaveFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
