//! Error types for the agent client.

use parchis_protocol::ProtocolError;
use parchis_transport::TransportError;

/// Errors that stop an [`AgentClient`](crate::AgentClient).
///
/// Undecodable server lines are not errors: the client logs and skips
/// them.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Connecting, reading or writing failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// An outgoing message could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server closed the connection before announcing the end of the
    /// game.
    #[error("server closed the connection before game over")]
    Disconnected,

    /// The server removed this client from the game.
    #[error("forfeited: {0}")]
    Forfeited(String),

    /// Reading the config file failed.
    #[error("reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`ClientConfig`](crate::ClientConfig).
    #[error("parsing config: {0}")]
    Config(#[from] toml::de::Error),
}
