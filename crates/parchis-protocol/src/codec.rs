//! Codec trait and implementations for turning messages into lines.
//!
//! The transport moves lines; the game moves messages. A [`Codec`] is the
//! strategy that converts between the two. [`TextCodec`] speaks the plain
//! text protocol (`Your turn`, `Move 2 5`, ...) and is what the server and
//! agents use by default. [`JsonCodec`] writes one JSON object per line,
//! which is handier for tooling written against serde.

use std::fmt::Display;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// A message that can travel on the wire in either encoding.
///
/// Implemented for [`ServerMessage`](crate::ServerMessage) and
/// [`ClientMessage`](crate::ClientMessage).
pub trait WireMessage:
    Serialize + DeserializeOwned + Display + FromStr<Err = ProtocolError>
{
}

impl<T> WireMessage for T where
    T: Serialize + DeserializeOwned + Display + FromStr<Err = ProtocolError>
{
}

/// Encodes messages to single lines and decodes them back.
///
/// `Send + Sync + 'static` because one codec is shared by every session
/// task for the lifetime of the server.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a message into one line, without the terminator.
    fn encode<M: WireMessage>(&self, msg: &M) -> Result<String, ProtocolError>;

    /// Parses one line (terminator already stripped) into a message.
    fn decode<M: WireMessage>(&self, line: &str) -> Result<M, ProtocolError>;
}

// ---------------------------------------------------------------------------
// TextCodec
// ---------------------------------------------------------------------------

/// The plain-text line protocol.
///
/// ```rust
/// use parchis_protocol::{ClientMessage, Codec, TextCodec};
///
/// let codec = TextCodec;
/// let line = codec.encode(&ClientMessage::Move { selected_pawn: 0, delta: 9 }).unwrap();
/// assert_eq!(line, "Move 0 9");
///
/// let decoded: ClientMessage = codec.decode(&line).unwrap();
/// assert_eq!(decoded, ClientMessage::Move { selected_pawn: 0, delta: 9 });
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCodec;

impl Codec for TextCodec {
    fn encode<M: WireMessage>(&self, msg: &M) -> Result<String, ProtocolError> {
        Ok(msg.to_string())
    }

    fn decode<M: WireMessage>(&self, line: &str) -> Result<M, ProtocolError> {
        line.parse()
    }
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// One JSON object per line (via `serde_json`).
///
/// `serde_json::to_string` never emits raw newlines, so the output is
/// always a single line.
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<M: WireMessage>(&self, msg: &M) -> Result<String, ProtocolError> {
        serde_json::to_string(msg).map_err(ProtocolError::Encode)
    }

    fn decode<M: WireMessage>(&self, line: &str) -> Result<M, ProtocolError> {
        serde_json::from_str(line).map_err(ProtocolError::Decode)
    }
}
