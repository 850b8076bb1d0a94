//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding a line.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// JSON serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// JSON deserialization failed: malformed JSON, missing fields or an
    /// unknown message type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The line is not a message this protocol knows.
    #[error("unknown message: {0:?}")]
    UnknownMessage(String),

    /// The message keyword was recognised but its arguments are wrong.
    ///
    /// Covers missing or extra fields, numbers that don't parse, and
    /// characters outside the board alphabet.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
