//! Error types for the server.

use std::time::Duration;

use parchis_protocol::{PlayerId, ProtocolError};
use parchis_rules::RulesError;
use parchis_transport::TransportError;

/// Why a session could not produce a move.
///
/// Every variant except a [`SessionError::Timeout`] under the `Skip` policy
/// costs the player their place in the game.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The peer closed the connection.
    #[error("disconnected")]
    Disconnected,

    /// No answer within the turn timeout.
    #[error("no move within {0:?}")]
    Timeout(Duration),

    /// The answer was not a valid client message.
    #[error("malformed message: {0}")]
    Malformed(#[source] ProtocolError),

    /// An outgoing message could not be encoded.
    #[error("encoding failed: {0}")]
    Encode(#[source] ProtocolError),

    /// Reading from or writing to the connection failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The session task is gone.
    #[error("session for {0} is unavailable")]
    Unavailable(PlayerId),
}

/// Top-level error that wraps every layer's error.
///
/// The `#[from]` attributes let `?` convert sub-crate errors.
#[derive(Debug, thiserror::Error)]
pub enum ParchisError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Session(#[from] SessionError),

    /// Reading the config file failed.
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`ServerConfig`](crate::ServerConfig).
    #[error("parsing config: {0}")]
    Config(#[from] toml::de::Error),
}
