//! Wire protocol for Parchis.
//!
//! This crate defines what the server and the player agents say to each
//! other:
//!
//! - **Types** ([`ServerMessage`], [`ClientMessage`], [`Position`],
//!   [`Cell`], [`PlayerId`]): the values that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`TextCodec`], [`JsonCodec`]): how a
//!   message becomes one line of text and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (lines) and the game. It
//! doesn't know about connections or turns, only about messages.
//!
//! ```text
//! Transport (lines) → Protocol (messages) → Server / Agent
//! ```

mod codec;
mod error;
mod types;

pub use codec::{Codec, TextCodec, WireMessage};
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Cell, ClientMessage, PlayerId, Position, ServerMessage};
