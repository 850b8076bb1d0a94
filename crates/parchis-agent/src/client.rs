//! The agent's connection loop.

use parchis_protocol::{Codec, PlayerId, Position, ServerMessage, TextCodec};
use parchis_rules::Board;
use parchis_transport::{Connection, TcpConnection, TransportError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{ClientConfig, ClientError, Decision, MoveAgent};

/// How the game ended from this client's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientOutcome {
    /// The id the server assigned, if a `Welcome` arrived.
    pub me: Option<PlayerId>,
    pub winner: Option<PlayerId>,
}

impl ClientOutcome {
    pub fn won(&self) -> bool {
        self.me.is_some() && self.me == self.winner
    }
}

/// Plays one game over a connection: reads server lines and answers
/// every `Your turn` with a move or a pass.
pub struct AgentClient<C, K, R: Rng> {
    conn: C,
    codec: K,
    agent: MoveAgent<R>,
    me: Option<PlayerId>,
    board: Option<Board>,
    pawns: Vec<Position>,
}

impl AgentClient<TcpConnection, TextCodec, StdRng> {
    /// Dials the server from `config` and speaks the text protocol.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let conn = TcpConnection::connect(&config.server_addr, config.max_line_length).await?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        tracing::info!(addr = %config.server_addr, "connected to server");
        Ok(Self::new(conn, TextCodec, MoveAgent::new(rng, config.dice_faces)))
    }
}

impl<C, K, R> AgentClient<C, K, R>
where
    C: Connection<Error = TransportError>,
    K: Codec,
    R: Rng,
{
    pub fn new(conn: C, codec: K, agent: MoveAgent<R>) -> Self {
        Self {
            conn,
            codec,
            agent,
            me: None,
            board: None,
            pawns: Vec::new(),
        }
    }

    /// Runs until the server announces the end of the game or removes
    /// this client from it.
    pub async fn run(mut self) -> Result<ClientOutcome, ClientError> {
        loop {
            let Some(line) = self.conn.recv_line().await? else {
                tracing::warn!(me = ?self.me, "server hung up");
                return Err(ClientError::Disconnected);
            };

            let msg: ServerMessage = match self.codec.decode(&line) {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!(%line, error = %e, "ignoring undecodable line");
                    continue;
                }
            };

            match self.handle(msg).await {
                Ok(None) => {}
                Ok(Some(outcome)) => {
                    let _ = self.conn.close().await;
                    return Ok(outcome);
                }
                Err(e) => {
                    let _ = self.conn.close().await;
                    return Err(e);
                }
            }
        }
    }

    async fn handle(&mut self, msg: ServerMessage) -> Result<Option<ClientOutcome>, ClientError> {
        match msg {
            ServerMessage::Welcome { player } => {
                tracing::info!(%player, "joined game");
                self.me = Some(player);
            }
            ServerMessage::State { board, pawns } => {
                self.board = Some(Board::from_cells(board));
                self.pawns = pawns;
            }
            ServerMessage::YourTurn => self.play_turn().await?,
            ServerMessage::Moved {
                player,
                pawn,
                delta,
                position,
            } => {
                tracing::debug!(%player, pawn, delta, %position, "move applied");
            }
            ServerMessage::Rejected { reason } => {
                tracing::warn!(%reason, "move rejected");
            }
            ServerMessage::Skipped { player } => {
                tracing::debug!(%player, "player passed");
            }
            ServerMessage::Forfeit { player, reason } if self.me == Some(player) => {
                tracing::warn!(%player, %reason, "removed from the game");
                return Err(ClientError::Forfeited(reason));
            }
            ServerMessage::Forfeit { player, reason } => {
                tracing::info!(%player, %reason, "player forfeited");
            }
            ServerMessage::GameOver { winner } => {
                let outcome = ClientOutcome {
                    me: self.me,
                    winner,
                };
                tracing::info!(winner = ?winner, won = outcome.won(), "game over");
                return Ok(Some(outcome));
            }
        }
        Ok(None)
    }

    async fn play_turn(&mut self) -> Result<(), ClientError> {
        let reply = match &self.board {
            Some(board) => {
                let decision = self.agent.take_turn(&self.pawns, board);
                log_decision(&decision);
                decision.into_message()
            }
            None => {
                tracing::warn!("turn granted before any state, passing");
                parchis_protocol::ClientMessage::Pass
            }
        };
        let line = self.codec.encode(&reply)?;
        self.conn.send_line(&line).await?;
        Ok(())
    }
}

fn log_decision(decision: &Decision) {
    match decision {
        Decision::Move {
            pawn,
            delta,
            dice,
            operation,
        } => tracing::debug!(
            pawn,
            delta,
            dice = ?(dice.first, dice.second),
            %operation,
            "moving"
        ),
        Decision::NoLegalMove {
            delta,
            dice,
            operation,
        } => tracing::debug!(
            delta,
            dice = ?(dice.first, dice.second),
            %operation,
            "no legal move"
        ),
    }
}
