//! Automated Parchis player.
//!
//! [`MoveAgent`] holds the decision policy (roll, combine, pick a pawn) and
//! has no I/O. [`AgentClient`] wraps it in the connection loop that talks to
//! the server.
//!
//! ```rust,no_run
//! use parchis_agent::{AgentClient, ClientConfig};
//!
//! # async fn play() -> Result<(), parchis_agent::ClientError> {
//! let client = AgentClient::connect(&ClientConfig::default()).await?;
//! let outcome = client.run().await?;
//! println!("winner: {:?}", outcome.winner);
//! # Ok(())
//! # }
//! ```

mod agent;
mod client;
mod config;
mod error;

pub use agent::{select_pawn, Decision, Dice, MoveAgent, Operation};
pub use client::{AgentClient, ClientOutcome};
pub use config::ClientConfig;
pub use error::ClientError;
