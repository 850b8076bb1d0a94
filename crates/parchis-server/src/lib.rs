//! # Parchis server
//!
//! An authoritative server for a Parchis-style race game. Players connect
//! over TCP, each gets a session task, and a single coordinator task owns
//! the game: it hands out turns in a fixed rotation, validates and applies
//! every move, and tells all players what happened.
//!
//! ```text
//! TcpTransport ─accept─▶ spawn_session ─SessionHandle─▶ GameCoordinator
//!                                                        │
//!                                     GameState + TurnCoordinator
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parchis_server::prelude::*;
//!
//! # async fn start() -> Result<(), ParchisError> {
//! let config = ServerConfig::load("parchis.toml")?;
//! let summary = ParchisServer::builder().config(config).build().await?.run().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
pub mod game;
mod server;
pub mod session;

pub use config::{ServerConfig, TimeoutPolicy};
pub use error::{ParchisError, SessionError};
pub use game::{GameCoordinator, GameSummary};
pub use server::{ParchisServer, ParchisServerBuilder};
pub use session::{spawn_session, SessionHandle};

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{
        GameSummary, ParchisError, ParchisServer, ParchisServerBuilder, ServerConfig,
        TimeoutPolicy,
    };
    pub use parchis_protocol::{JsonCodec, PlayerId, TextCodec};
    pub use parchis_rules::{GameConfig, GameOutcome};
}
