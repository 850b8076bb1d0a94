//! Session actor: one Tokio task per connected player.
//!
//! The task owns the player's connection. The game coordinator talks to it
//! only through a [`SessionHandle`], so the coordinator never blocks on a
//! socket it doesn't own and never shares one across tasks.

use std::sync::Arc;
use std::time::Duration;

use parchis_protocol::{ClientMessage, Codec, PlayerId, ServerMessage};
use parchis_transport::{Connection, TransportError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};

use crate::SessionError;

const COMMAND_BUFFER: usize = 32;

/// Commands sent to a session actor through its channel.
enum SessionCommand {
    /// Write one message to the player.
    Notify(ServerMessage),

    /// Write `sync` and `Your turn`, then wait for the player's answer.
    /// The turn timeout covers both.
    RequestMove {
        sync: ServerMessage,
        reply: oneshot::Sender<Result<ClientMessage, SessionError>>,
    },

    /// Close the connection and stop the task.
    Close,
}

/// Handle to a running session actor.
pub struct SessionHandle {
    player: PlayerId,
    sender: mpsc::Sender<SessionCommand>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Queues a message for the player (fire-and-forget).
    pub async fn notify(&self, msg: ServerMessage) -> Result<(), SessionError> {
        self.sender
            .send(SessionCommand::Notify(msg))
            .await
            .map_err(|_| SessionError::Unavailable(self.player))
    }

    /// Prompts the player and waits for their move.
    pub async fn request_move(
        &self,
        sync: ServerMessage,
    ) -> Result<ClientMessage, SessionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(SessionCommand::RequestMove {
                sync,
                reply: reply_tx,
            })
            .await
            .map_err(|_| SessionError::Unavailable(self.player))?;
        reply_rx
            .await
            .map_err(|_| SessionError::Unavailable(self.player))?
    }

    /// Flushes queued messages, closes the connection and waits for the
    /// task to end.
    pub async fn shutdown(self) {
        let _ = self.sender.send(SessionCommand::Close).await;
        if let Err(e) = self.task.await {
            tracing::error!(player = %self.player, error = %e, "session task panicked");
        }
    }
}

/// The internal session state. Runs inside a Tokio task.
struct SessionActor<C, K> {
    player: PlayerId,
    conn: C,
    codec: Arc<K>,
    turn_timeout: Option<Duration>,
    /// Set once the peer is known to be gone.
    closed: bool,
    receiver: mpsc::Receiver<SessionCommand>,
}

impl<C, K> SessionActor<C, K>
where
    C: Connection<Error = TransportError>,
    K: Codec,
{
    async fn run(mut self) {
        tracing::debug!(player = %self.player, conn_id = %self.conn.id(), "session started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => match cmd {
                    Some(SessionCommand::Notify(msg)) => {
                        if let Err(e) = self.write(&msg).await {
                            tracing::debug!(player = %self.player, error = %e, "notify failed");
                        }
                    }
                    Some(SessionCommand::RequestMove { sync, reply }) => {
                        let result = self.request_move(sync).await;
                        let _ = reply.send(result);
                    }
                    Some(SessionCommand::Close) | None => break,
                },
                line = self.conn.recv_line(), if !self.closed => {
                    self.discard(line);
                }
            }
        }

        // Flushing to a peer that is gone or not reading could block.
        if !self.closed {
            if let Err(e) = self.conn.close().await {
                tracing::debug!(player = %self.player, error = %e, "close failed");
            }
        }
        tracing::debug!(player = %self.player, "session stopped");
    }

    async fn request_move(
        &mut self,
        sync: ServerMessage,
    ) -> Result<ClientMessage, SessionError> {
        if self.closed {
            return Err(SessionError::Disconnected);
        }
        // One deadline covers the prompt and the answer.
        let deadline = self
            .turn_timeout
            .and_then(|limit| Some((limit, Instant::now().checked_add(limit)?)));
        let Some((limit, deadline)) = deadline else {
            self.prompt(&sync).await?;
            return self.read_move().await;
        };

        match timeout_at(deadline, self.prompt(&sync)).await {
            Ok(written) => written?,
            Err(_) => {
                // A line may be half written; nothing more can be sent.
                tracing::warn!(player = %self.player, "peer is not reading, dropping connection");
                self.closed = true;
                return Err(SessionError::Timeout(limit));
            }
        }
        timeout_at(deadline, self.read_move())
            .await
            .map_err(|_| SessionError::Timeout(limit))?
    }

    async fn prompt(&mut self, sync: &ServerMessage) -> Result<(), SessionError> {
        self.write(sync).await?;
        self.write(&ServerMessage::YourTurn).await
    }

    async fn read_move(&mut self) -> Result<ClientMessage, SessionError> {
        let Some(line) = self.conn.recv_line().await? else {
            self.closed = true;
            return Err(SessionError::Disconnected);
        };

        tracing::debug!(player = %self.player, %line, "received");
        self.codec.decode(&line).map_err(SessionError::Malformed)
    }

    async fn write(&mut self, msg: &ServerMessage) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Disconnected);
        }
        let line = self.codec.encode(msg).map_err(SessionError::Encode)?;
        self.conn.send_line(&line).await?;
        Ok(())
    }

    /// Handles a line that arrived while no move was requested.
    fn discard(&mut self, line: Result<Option<String>, TransportError>) {
        match line {
            Ok(Some(line)) => {
                tracing::warn!(player = %self.player, %line, "discarding unsolicited line");
            }
            Ok(None) => {
                tracing::info!(player = %self.player, "peer closed the connection");
                self.closed = true;
            }
            Err(e) => {
                tracing::info!(player = %self.player, error = %e, "connection failed");
                self.closed = true;
            }
        }
    }
}

/// Spawns a session actor for `conn` and returns its handle.
///
/// `turn_timeout` bounds each [`SessionHandle::request_move`], writes
/// included; `None` waits forever.
pub fn spawn_session<C, K>(
    player: PlayerId,
    conn: C,
    codec: Arc<K>,
    turn_timeout: Option<Duration>,
) -> SessionHandle
where
    C: Connection<Error = TransportError>,
    K: Codec,
{
    let (sender, receiver) = mpsc::channel(COMMAND_BUFFER);
    let actor = SessionActor {
        player,
        conn,
        codec,
        turn_timeout,
        closed: false,
        receiver,
    };
    let task = tokio::spawn(actor.run());
    SessionHandle {
        player,
        sender,
        task,
    }
}
