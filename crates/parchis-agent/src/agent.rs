//! Move selection.
//!
//! An agent rolls two dice, picks at random whether to add or subtract them,
//! and then moves the pawn that gets closest to the finish without landing
//! on an obstacle.

use std::fmt;

use parchis_protocol::{ClientMessage, Position};
use parchis_rules::{pawns, Board};
use rand::Rng;

/// How the two dice are combined into a delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
}

impl Operation {
    pub fn apply(self, dice: Dice) -> i32 {
        let (a, b) = (i32::from(dice.first), i32::from(dice.second));
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Add => write!(f, "+"),
            Self::Subtract => write!(f, "-"),
        }
    }
}

/// One roll of two dice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dice {
    pub first: u8,
    pub second: u8,
}

/// What the agent does with its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Move {
        pawn: usize,
        delta: i32,
        dice: Dice,
        operation: Operation,
    },
    /// Every candidate pawn is finished or would land on an obstacle.
    NoLegalMove {
        delta: i32,
        dice: Dice,
        operation: Operation,
    },
}

impl Decision {
    pub fn delta(&self) -> i32 {
        match self {
            Self::Move { delta, .. } | Self::NoLegalMove { delta, .. } => *delta,
        }
    }

    /// The line to send back to the server.
    pub fn into_message(self) -> ClientMessage {
        match self {
            Self::Move { pawn, delta, .. } => ClientMessage::Move {
                selected_pawn: pawn,
                delta,
            },
            Self::NoLegalMove { .. } => ClientMessage::Pass,
        }
    }
}

/// Picks the pawn that, after moving `delta`, is closest to the finish.
///
/// Finished pawns and moves onto obstacles are skipped. Ties go to the
/// lowest index.
pub fn select_pawn(delta: i32, pawns: &[Position], board: &Board) -> Option<usize> {
    pawns
        .iter()
        .enumerate()
        .filter_map(|(i, &from)| {
            let to = pawns::legal_destination(from, delta, board)?;
            Some((pawns::remaining_distance(to, board.len()), i))
        })
        .min()
        .map(|(_, i)| i)
}

/// A randomized player.
///
/// Generic over the RNG so tests can seed it.
#[derive(Debug)]
pub struct MoveAgent<R: Rng> {
    rng: R,
    faces: u8,
}

impl<R: Rng> MoveAgent<R> {
    pub fn new(rng: R, faces: u8) -> Self {
        Self {
            rng,
            faces: faces.max(1),
        }
    }

    /// Rolls both dice, each uniform in `1..=faces`.
    pub fn roll(&mut self) -> Dice {
        Dice {
            first: self.rng.random_range(1..=self.faces),
            second: self.rng.random_range(1..=self.faces),
        }
    }

    /// Combines `dice` with a coin-flip operation and picks a pawn.
    pub fn decide(&mut self, dice: Dice, pawns: &[Position], board: &Board) -> Decision {
        let operation = if self.rng.random_bool(0.5) {
            Operation::Add
        } else {
            Operation::Subtract
        };
        let delta = operation.apply(dice);

        match select_pawn(delta, pawns, board) {
            Some(pawn) => Decision::Move {
                pawn,
                delta,
                dice,
                operation,
            },
            None => Decision::NoLegalMove {
                delta,
                dice,
                operation,
            },
        }
    }

    pub fn take_turn(&mut self, pawns: &[Position], board: &Board) -> Decision {
        let dice = self.roll();
        self.decide(dice, pawns, board)
    }
}
