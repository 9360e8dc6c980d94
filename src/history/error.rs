use thiserror::Error;

use super::format::SaveFormat;
use crate::core::GameError;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON save: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML save: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("invalid XML save: {0}")]
    XmlSchema(String),

    #[error("invalid text save at line {line}: {message}")]
    Text { line: usize, message: String },

    #[error("invalid save name {0:?}")]
    InvalidName(String),

    #[error("no {format} save named {name:?}")]
    NotFound { name: String, format: SaveFormat },

    /// The save parsed but does not describe a valid game.
    #[error(transparent)]
    Game(#[from] GameError),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
