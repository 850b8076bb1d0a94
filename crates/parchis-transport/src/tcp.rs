//! Line-delimited TCP transport built on `tokio-util`'s `LinesCodec`.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use futures_util::{SinkExt, StreamExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio_util::codec::{FramedRead, FramedWrite, LinesCodec, LinesCodecError};

use crate::{Connection, ConnectionId, Transport, TransportError};

/// Longest line accepted from a peer unless configured otherwise.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// A TCP [`Transport`] that listens for incoming players.
pub struct TcpTransport {
    listener: TcpListener,
    max_line_length: usize,
}

impl TcpTransport {
    /// Binds a new TCP transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(TransportError::AcceptFailed)?;
        tracing::info!(addr, "TCP transport listening");
        Ok(Self {
            listener,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        })
    }

    /// Sets the longest line accepted from connections produced by this
    /// transport.
    pub fn with_max_line_length(mut self, max: usize) -> Self {
        self.max_line_length = max;
        self
    }

    /// Returns the address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }
}

impl Transport for TcpTransport {
    type Connection = TcpConnection;
    type Error = TransportError;

    async fn accept(&mut self) -> Result<Self::Connection, Self::Error> {
        let (stream, addr) = self
            .listener
            .accept()
            .await
            .map_err(TransportError::AcceptFailed)?;

        let conn = TcpConnection::from_stream(stream, self.max_line_length);
        tracing::debug!(id = %conn.id, %addr, "accepted TCP connection");
        Ok(conn)
    }
}

/// A single line-oriented TCP connection.
///
/// Reading and writing are guarded separately, so a task blocked waiting
/// for the next line never prevents another task from writing.
pub struct TcpConnection {
    id: ConnectionId,
    peer: Option<SocketAddr>,
    reader: Mutex<FramedRead<OwnedReadHalf, LinesCodec>>,
    writer: Mutex<FramedWrite<OwnedWriteHalf, LinesCodec>>,
    max_line_length: usize,
}

impl TcpConnection {
    /// Dials `addr` and wraps the stream.
    pub async fn connect(
        addr: &str,
        max_line_length: usize,
    ) -> Result<Self, TransportError> {
        let stream = TcpStream::connect(addr).await.map_err(|source| {
            TransportError::ConnectFailed {
                addr: addr.to_string(),
                source,
            }
        })?;
        let conn = Self::from_stream(stream, max_line_length);
        tracing::debug!(id = %conn.id, addr, "connected");
        Ok(conn)
    }

    /// Wraps an already established stream.
    ///
    /// Nagle's algorithm is disabled: the protocol writes several short
    /// lines back to back and waits for a reply.
    pub fn from_stream(stream: TcpStream, max_line_length: usize) -> Self {
        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!(error = %e, "failed to set TCP_NODELAY");
        }
        let peer = stream.peer_addr().ok();
        let (read, write) = stream.into_split();
        Self {
            id: ConnectionId::new(
                NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            ),
            peer,
            reader: Mutex::new(FramedRead::new(
                read,
                LinesCodec::new_with_max_length(max_line_length),
            )),
            writer: Mutex::new(FramedWrite::new(write, LinesCodec::new())),
            max_line_length,
        }
    }

    /// Returns the remote address, if the OS reported one.
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer
    }

    fn map_codec_error(&self, e: LinesCodecError, sending: bool) -> TransportError {
        match e {
            LinesCodecError::MaxLineLengthExceeded => {
                TransportError::LineTooLong(self.max_line_length)
            }
            LinesCodecError::Io(io) if sending => TransportError::SendFailed(io),
            LinesCodecError::Io(io) => TransportError::ReceiveFailed(io),
        }
    }
}

impl Connection for TcpConnection {
    type Error = TransportError;

    async fn send_line(&self, line: &str) -> Result<(), Self::Error> {
        self.writer
            .lock()
            .await
            .send(line)
            .await
            .map_err(|e| self.map_codec_error(e, true))
    }

    async fn recv_line(&self) -> Result<Option<String>, Self::Error> {
        match self.reader.lock().await.next().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(e)) => Err(self.map_codec_error(e, false)),
            None => Ok(None),
        }
    }

    async fn close(&self) -> Result<(), Self::Error> {
        SinkExt::<&str>::close(&mut *self.writer.lock().await)
            .await
            .map_err(|e| self.map_codec_error(e, true))
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
