//! Error types for the rules layer.

use parchis_protocol::PlayerId;

/// A structurally valid move that the rules refuse.
///
/// Returned before any state is touched: an illegal move never changes a
/// pawn.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    /// The pawn index is outside the player's pawn set.
    #[error("pawn {pawn} does not exist (player has {count})")]
    NoSuchPawn { pawn: usize, count: usize },

    /// Finished pawns are out of play.
    #[error("pawn {pawn} has already finished")]
    AlreadyFinished { pawn: usize },

    /// The destination cell is an obstacle.
    #[error("pawn {pawn} would land on obstacle at cell {cell}")]
    Blocked { pawn: usize, cell: usize },

    /// No two dice can produce this delta.
    #[error("delta {delta} outside {min}..={max}")]
    DeltaOutOfRange { delta: i32, min: i32, max: i32 },
}

/// Misuse of the turn state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    /// A rotation needs at least one player.
    #[error("no players in rotation")]
    NoPlayers,

    /// The same player appears twice in the rotation.
    #[error("player {0} appears twice in rotation")]
    DuplicatePlayer(PlayerId),

    /// The player is not (or no longer) part of the rotation.
    #[error("player {0} is not in rotation")]
    NotInRotation(PlayerId),

    /// Only the holder of the turn may release or finish it.
    #[error("player {player} does not hold the turn")]
    NotYourTurn { player: PlayerId },

    /// `grant` was called while someone already holds the turn.
    #[error("turn already granted to {0}")]
    AlreadyGranted(PlayerId),

    /// The game is over; no more turns.
    #[error("game is over")]
    GameOver,
}

/// Errors returned by [`GameState`](crate::GameState) operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RulesError {
    /// The player id is not part of this game.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// The same player id was given twice at setup.
    #[error("player {0} listed twice")]
    DuplicatePlayer(PlayerId),

    /// The player was removed from the game and may not move.
    #[error("player {0} has forfeited")]
    Forfeited(PlayerId),

    /// The game already ended; state is read-only.
    #[error("game has ended")]
    GameEnded,

    /// A move the rules refuse.
    #[error(transparent)]
    Illegal(#[from] IllegalMove),

    /// A turn state machine error.
    #[error(transparent)]
    Turn(#[from] TurnError),

    /// The configuration cannot describe a playable game.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
