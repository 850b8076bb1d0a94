//! `ParchisServer` builder and accept loop.
//!
//! This is the entry point for running a game. It ties the layers
//! together: transport → session → game coordinator.

use std::net::SocketAddr;
use std::sync::Arc;

use parchis_protocol::{Codec, PlayerId, ServerMessage, TextCodec};
use parchis_rules::Board;
use parchis_transport::{Connection, TcpTransport, Transport};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::game::{GameCoordinator, GameSummary};
use crate::session::spawn_session;
use crate::{ParchisError, ServerConfig};

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,no_run
/// use parchis_server::prelude::*;
///
/// # async fn start() -> Result<(), ParchisError> {
/// let server = ParchisServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// let summary = server.run().await?;
/// println!("winner: {:?}", summary.winner());
/// # Ok(())
/// # }
/// ```
pub struct ParchisServerBuilder {
    config: ServerConfig,
}

impl ParchisServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    /// Replaces the whole configuration, including the bind address.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the listener with the plain-text protocol.
    pub async fn build(self) -> Result<ParchisServer<TextCodec>, ParchisError> {
        self.build_with_codec(TextCodec).await
    }

    /// Binds the listener with a custom codec.
    pub async fn build_with_codec<K: Codec>(
        self,
        codec: K,
    ) -> Result<ParchisServer<K>, ParchisError> {
        self.config.game.validate()?;
        let transport = TcpTransport::bind(&self.config.bind_addr)
            .await?
            .with_max_line_length(self.config.max_line_length);
        if let Ok(addr) = transport.local_addr() {
            tracing::info!(%addr, "listening");
        }

        Ok(ParchisServer {
            transport,
            config: self.config,
            codec: Arc::new(codec),
        })
    }
}

impl Default for ParchisServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound server that plays exactly one game.
///
/// Call [`run()`](Self::run) to wait for players and play.
pub struct ParchisServer<K: Codec> {
    transport: TcpTransport,
    config: ServerConfig,
    codec: Arc<K>,
}

impl ParchisServer<TextCodec> {
    /// Creates a new builder.
    pub fn builder() -> ParchisServerBuilder {
        ParchisServerBuilder::new()
    }
}

impl<K: Codec> ParchisServer<K> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Waits for `game.players` connections, then plays the game.
    ///
    /// Players get ids `0..players` in connection order. A failed accept
    /// is logged and does not take a seat.
    pub async fn run(mut self) -> Result<GameSummary, ParchisError> {
        let wanted = self.config.game.players;
        tracing::info!(
            addr = %self.config.bind_addr,
            players = wanted,
            "waiting for players"
        );

        let mut sessions = Vec::with_capacity(wanted);
        while sessions.len() < wanted {
            match self.transport.accept().await {
                Ok(conn) => {
                    let player = PlayerId(sessions.len() as u64);
                    tracing::info!(%player, conn_id = %conn.id(), "player joined");
                    let session = spawn_session(
                        player,
                        conn,
                        Arc::clone(&self.codec),
                        self.config.turn_timeout(),
                    );
                    session.notify(ServerMessage::Welcome { player }).await?;
                    sessions.push(session);
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }

        let game = &self.config.game;
        let board = match self.config.seed {
            Some(seed) => Board::generate(
                game.track_len,
                game.obstacle_probability,
                &mut StdRng::seed_from_u64(seed),
            ),
            None => Board::generate(
                game.track_len,
                game.obstacle_probability,
                &mut rand::rng(),
            ),
        };

        let coordinator = GameCoordinator::new(
            self.config.game.clone(),
            board,
            sessions,
            self.config.timeout_policy,
        )?;
        Ok(coordinator.run().await)
    }
}
