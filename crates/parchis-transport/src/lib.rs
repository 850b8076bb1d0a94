//! Transport abstraction layer for Parchis.
//!
//! Provides the [`Transport`] and [`Connection`] traits that abstract over
//! the byte stream each player talks through. The game only ever needs two
//! primitives from a connection: read one line, write one line.
//!
//! # Feature Flags
//!
//! - `tcp` (default): newline-delimited TCP transport via `tokio-util`'s
//!   `LinesCodec`

mod error;
#[cfg(feature = "tcp")]
mod tcp;

pub use error::TransportError;
#[cfg(feature = "tcp")]
pub use tcp::{TcpConnection, TcpTransport, DEFAULT_MAX_LINE_LENGTH};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Accepts new incoming connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type produced by this transport.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for and accepts the next incoming connection.
    fn accept(
        &mut self,
    ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;
}

/// A single ordered, bidirectional line stream to one peer.
///
/// The futures are required to be `Send` so a connection can be driven
/// from a spawned Tokio task, even through a generic parameter.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Writes one line to the peer. The terminator is added by the
    /// transport; `line` must not contain one.
    fn send_line(
        &self,
        line: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Receives the next line from the peer, without its terminator.
    ///
    /// Returns `Ok(None)` when the connection is cleanly closed.
    fn recv_line(
        &self,
    ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send;

    /// Flushes pending output and closes the write side.
    fn close(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Returns the unique identifier for this connection.
    fn id(&self) -> ConnectionId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_display() {
        let id = ConnectionId::new(7);
        assert_eq!(id.to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "first");
        map.insert(ConnectionId::new(2), "second");
        assert_eq!(map[&ConnectionId::new(1)], "first");
    }
}
