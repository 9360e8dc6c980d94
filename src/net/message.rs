use bincode::Options;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{CardId, Move};

/// One completed pair attempt, sent to the other device.
///
/// `move_id` is the zero-based index of the attempt in the shared move
/// history, so the receiver can detect duplicates and gaps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveEvent {
    pub move_id: u32,
    pub card1_id: CardId,
    pub card2_id: CardId,
}

impl MoveEvent {
    #[must_use]
    pub fn new(move_id: u32, card1_id: CardId, card2_id: CardId) -> Self {
        Self {
            move_id,
            card1_id,
            card2_id,
        }
    }

    /// The history entry this event describes.
    #[must_use]
    pub fn as_move(&self) -> Move {
        Move::new(self.card1_id, self.card2_id)
    }
}

#[derive(Error, Debug)]
pub enum FrameError {
    #[error("malformed move frame: {0}")]
    Malformed(#[from] bincode::Error),
}

/// Fixed-width little-endian integers; a frame is exactly 12 bytes.
fn frame_options() -> impl Options {
    bincode::options()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode an event as a binary frame.
pub fn encode_frame(event: &MoveEvent) -> Result<Vec<u8>, FrameError> {
    Ok(frame_options().serialize(event)?)
}

/// Decode a binary frame produced by [`encode_frame`].
///
/// Short frames and frames with bytes left over are both malformed.
pub fn decode_frame(bytes: &[u8]) -> Result<MoveEvent, FrameError> {
    Ok(frame_options().deserialize(bytes)?)
}
