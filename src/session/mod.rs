//! Game session: the single owner of the current game.
//!
//! A `GameSession` holds the authoritative `GameState` and is the only
//! thing that replaces it. Every mutation goes through `&mut self`, so
//! timer ticks, clicks and opponent moves are serialized by construction;
//! wrap the session in a mutex if several threads feed it.
//!
//! ## Deferred flip-back
//!
//! A mismatch is committed immediately (score, history, turn) but the two
//! cards stay face up so the player can see them. The session hands out a
//! `MismatchTicket` stamped with the current generation; the caller redeems
//! it after its display delay. Starting a new game or installing a
//! snapshot bumps the generation, which turns any outstanding ticket into
//! a no-op.

mod game;

pub use game::{GameSession, MismatchTicket, Step};
