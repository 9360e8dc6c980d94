//! Transport contract for two-player games.
//!
//! The engine does not open sockets or pair devices. It only defines the
//! message both sides exchange after every completed turn attempt and a
//! compact binary framing for it. Whatever carries the bytes (Bluetooth,
//! TCP, a test harness) lives outside this crate.

mod message;

pub use message::{decode_frame, encode_frame, FrameError, MoveEvent};
