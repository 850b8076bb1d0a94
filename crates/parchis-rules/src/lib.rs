//! Game rules for Parchis.
//!
//! Everything in this crate is synchronous and owns no I/O. The server
//! keeps one [`GameState`] and one [`TurnCoordinator`] inside a single task
//! and feeds them the moves its players send; agents reuse [`Board`] and
//! [`pawns::legal_destination`] to make sure they only propose moves the
//! server will accept.
//!
//! # Key types
//!
//! - [`Board`]: the track and its obstacle cells
//! - [`PawnSet`]: one player's pawns and the move rule
//! - [`GameState`]: all players, the win check, the final outcome
//! - [`TurnCoordinator`]: whose turn it is, in a fixed rotation
//! - [`GameConfig`]: track length, player and pawn counts, dice

mod board;
mod config;
mod error;
pub mod pawns;
mod state;
mod turn;

pub use board::Board;
pub use config::GameConfig;
pub use error::{IllegalMove, RulesError, TurnError};
pub use pawns::PawnSet;
pub use state::{GameOutcome, GameState, MoveOutcome};
pub use turn::{TurnCoordinator, TurnState};
