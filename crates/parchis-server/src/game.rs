//! The game coordinator.
//!
//! One task owns the [`GameState`], the [`TurnCoordinator`] and every
//! player's [`SessionHandle`]. Each turn it prompts the current player,
//! applies the answer and tells everyone what happened. Nothing else ever
//! mutates the game, so no lock is needed.

use parchis_protocol::{ClientMessage, PlayerId, ServerMessage};
use parchis_rules::{Board, GameConfig, GameOutcome, GameState, RulesError, TurnCoordinator, TurnState};

use crate::session::SessionHandle;
use crate::{SessionError, TimeoutPolicy};

/// How a finished game went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    pub outcome: GameOutcome,
    /// Turns that ended without a win or a forfeit.
    pub turns: u64,
    /// Players removed from the game, in the order they left.
    pub forfeited: Vec<PlayerId>,
}

impl GameSummary {
    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.winner()
    }
}

/// Runs one game to completion.
pub struct GameCoordinator {
    state: GameState,
    turns: TurnCoordinator,
    /// Sessions of players still in the game, in seating order.
    sessions: Vec<SessionHandle>,
    timeout_policy: TimeoutPolicy,
    forfeited: Vec<PlayerId>,
}

impl GameCoordinator {
    /// Seats one player per session, in the order given.
    pub fn new(
        config: GameConfig,
        board: Board,
        sessions: Vec<SessionHandle>,
        timeout_policy: TimeoutPolicy,
    ) -> Result<Self, RulesError> {
        let players: Vec<PlayerId> = sessions.iter().map(SessionHandle::player).collect();
        let state = GameState::new(config, board, &players)?;
        let turns = TurnCoordinator::new(&players)?;
        Ok(Self {
            state,
            turns,
            sessions,
            timeout_policy,
            forfeited: Vec::new(),
        })
    }

    /// Plays turns until someone wins or nobody is left, then announces
    /// the result and closes every session.
    pub async fn run(mut self) -> GameSummary {
        tracing::info!(
            players = self.sessions.len(),
            obstacles = self.state.board().obstacle_count(),
            "game started"
        );

        loop {
            let player = match self.turns.state() {
                TurnState::TurnGranted(p) => p,
                TurnState::AwaitingTurn { .. } => match self.turns.grant() {
                    Ok(p) => p,
                    Err(e) => {
                        tracing::error!(error = %e, "cannot grant turn");
                        break;
                    }
                },
                TurnState::GameOver { .. } => break,
            };

            tracing::info!(%player, turn = self.turns.turns_completed() + 1, "turn granted");
            if let Err(e) = self.play_turn(player).await {
                tracing::error!(%player, error = %e, "turn failed");
                break;
            }
        }

        self.finish().await
    }

    async fn play_turn(&mut self, player: PlayerId) -> Result<(), RulesError> {
        let answer = match self.session(player) {
            Some(session) => session.request_move(self.state_sync(player)?).await,
            None => Err(SessionError::Unavailable(player)),
        };

        match answer {
            Ok(ClientMessage::Move {
                selected_pawn,
                delta,
            }) => self.apply_move(player, selected_pawn, delta).await,
            Ok(ClientMessage::Pass) => {
                tracing::info!(%player, "no legal move");
                self.broadcast(ServerMessage::Skipped { player }).await;
                self.turns.release(player)?;
                Ok(())
            }
            Err(SessionError::Timeout(limit)) if self.timeout_policy == TimeoutPolicy::Skip => {
                tracing::warn!(%player, ?limit, "turn timed out, skipping");
                self.send_to(
                    player,
                    ServerMessage::Rejected {
                        reason: format!("no move within {limit:?}"),
                    },
                )
                .await;
                self.turns.release(player)?;
                Ok(())
            }
            Err(e) => self.forfeit(player, e.to_string()).await,
        }
    }

    async fn apply_move(
        &mut self,
        player: PlayerId,
        pawn: usize,
        delta: i32,
    ) -> Result<(), RulesError> {
        match self.state.apply_move(player, pawn, delta) {
            Ok(outcome) => {
                tracing::info!(%player, pawn, delta, to = %outcome.to, "move applied");
                self.broadcast(ServerMessage::Moved {
                    player,
                    pawn,
                    delta,
                    position: outcome.to,
                })
                .await;
                if outcome.won {
                    self.turns.finish(player)?;
                } else {
                    self.turns.release(player)?;
                }
                Ok(())
            }
            Err(RulesError::Illegal(reason)) => {
                tracing::warn!(%player, pawn, delta, %reason, "move rejected");
                self.send_to(
                    player,
                    ServerMessage::Rejected {
                        reason: reason.to_string(),
                    },
                )
                .await;
                self.turns.release(player)?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Removes a player: their session is closed and everyone is told.
    async fn forfeit(&mut self, player: PlayerId, reason: String) -> Result<(), RulesError> {
        tracing::info!(%player, %reason, "player forfeited");
        self.forfeited.push(player);
        self.state.forfeit(player)?;
        let turn_state = self.turns.forfeit(player)?;

        self.broadcast(ServerMessage::Forfeit { player, reason }).await;
        if let Some(index) = self.sessions.iter().position(|s| s.player() == player) {
            self.sessions.remove(index).shutdown().await;
        }

        if turn_state.is_over() {
            self.state.abandon()?;
        }
        Ok(())
    }

    async fn finish(mut self) -> GameSummary {
        if !self.state.is_ended() {
            // Only reachable after an internal error.
            let _ = self.state.abandon();
        }
        let outcome = self.state.outcome().unwrap_or(GameOutcome::Abandoned);
        let winner = outcome.winner();
        tracing::info!(winner = ?winner, turns = self.turns.turns_completed(), "game over");

        self.broadcast(ServerMessage::GameOver { winner }).await;
        for session in self.sessions.drain(..) {
            session.shutdown().await;
        }

        GameSummary {
            outcome,
            turns: self.turns.turns_completed(),
            forfeited: self.forfeited,
        }
    }

    /// The board and the player's own pawns.
    fn state_sync(&self, player: PlayerId) -> Result<ServerMessage, RulesError> {
        Ok(ServerMessage::State {
            board: self.state.board().cells().to_vec(),
            pawns: self.state.pawns(player)?.positions().to_vec(),
        })
    }

    fn session(&self, player: PlayerId) -> Option<&SessionHandle> {
        self.sessions.iter().find(|s| s.player() == player)
    }

    async fn send_to(&self, player: PlayerId, msg: ServerMessage) {
        if let Some(session) = self.session(player) {
            if let Err(e) = session.notify(msg).await {
                tracing::debug!(%player, error = %e, "notify failed");
            }
        }
    }

    /// Sends `msg` to every player still in the game.
    async fn broadcast(&self, msg: ServerMessage) {
        for session in &self.sessions {
            if let Err(e) = session.notify(msg.clone()).await {
                tracing::debug!(player = %session.player(), error = %e, "notify failed");
            }
        }
    }
}
