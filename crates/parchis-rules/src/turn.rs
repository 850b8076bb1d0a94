//! Turn rotation.

use std::fmt;

use parchis_protocol::PlayerId;

use crate::TurnError;

// ---------------------------------------------------------------------------
// TurnState
// ---------------------------------------------------------------------------

/// Where the rotation is.
///
/// ```text
/// TurnGranted(p) --release(p)--> AwaitingTurn { next } --grant()--> TurnGranted(next)
/// TurnGranted(p) --finish(p)---> GameOver { winner: Some(p) }
/// any            --forfeit(last player)--> GameOver { winner: None }
/// ```
///
/// `GameOver` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Nobody holds the turn; `next` gets it on the next `grant()`.
    AwaitingTurn { next: PlayerId },
    /// Exactly this player may move.
    TurnGranted(PlayerId),
    /// No more turns.
    GameOver { winner: Option<PlayerId> },
}

impl TurnState {
    /// The player currently allowed to move, if any.
    pub fn holder(&self) -> Option<PlayerId> {
        match self {
            Self::TurnGranted(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self, Self::GameOver { .. })
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingTurn { next } => write!(f, "AwaitingTurn({next})"),
            Self::TurnGranted(p) => write!(f, "TurnGranted({p})"),
            Self::GameOver { winner: Some(p) } => write!(f, "GameOver({p})"),
            Self::GameOver { winner: None } => write!(f, "GameOver"),
        }
    }
}

// ---------------------------------------------------------------------------
// TurnCoordinator
// ---------------------------------------------------------------------------

/// Hands the turn to one player at a time, in join order.
///
/// The next player is stored in the state itself, so there is never more
/// than one candidate and never a turn granted to two players.
#[derive(Debug, Clone)]
pub struct TurnCoordinator {
    rotation: Vec<PlayerId>,
    state: TurnState,
    turns_completed: u64,
}

impl TurnCoordinator {
    /// Starts a rotation with the turn granted to the first player.
    pub fn new(players: &[PlayerId]) -> Result<Self, TurnError> {
        let first = *players.first().ok_or(TurnError::NoPlayers)?;
        for (i, id) in players.iter().enumerate() {
            if players[..i].contains(id) {
                return Err(TurnError::DuplicatePlayer(*id));
            }
        }
        Ok(Self {
            rotation: players.to_vec(),
            state: TurnState::TurnGranted(first),
            turns_completed: 0,
        })
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// The player holding the turn, if any.
    pub fn current(&self) -> Option<PlayerId> {
        self.state.holder()
    }

    /// Players still in the rotation, in turn order.
    pub fn rotation(&self) -> &[PlayerId] {
        &self.rotation
    }

    /// Turns ended with [`release`](Self::release).
    pub fn turns_completed(&self) -> u64 {
        self.turns_completed
    }

    /// Ends `player`'s turn and queues the next player in the rotation.
    pub fn release(&mut self, player: PlayerId) -> Result<PlayerId, TurnError> {
        self.check_holder(player)?;
        let next = self.successor(player)?;
        self.state = TurnState::AwaitingTurn { next };
        self.turns_completed += 1;
        Ok(next)
    }

    /// Gives the turn to the queued player.
    pub fn grant(&mut self) -> Result<PlayerId, TurnError> {
        match self.state {
            TurnState::AwaitingTurn { next } => {
                self.state = TurnState::TurnGranted(next);
                Ok(next)
            }
            TurnState::TurnGranted(p) => Err(TurnError::AlreadyGranted(p)),
            TurnState::GameOver { .. } => Err(TurnError::GameOver),
        }
    }

    /// Ends the game with `player`, who must hold the turn, as winner.
    pub fn finish(&mut self, player: PlayerId) -> Result<(), TurnError> {
        self.check_holder(player)?;
        self.state = TurnState::GameOver {
            winner: Some(player),
        };
        Ok(())
    }

    /// Removes `player` from the rotation.
    ///
    /// If they held or were about to receive the turn, it is queued for the
    /// next remaining player. Removing the last player ends the game with no
    /// winner.
    pub fn forfeit(&mut self, player: PlayerId) -> Result<TurnState, TurnError> {
        if self.state.is_over() {
            return Err(TurnError::GameOver);
        }
        let index = self.index_of(player)?;
        let next = self.rotation[(index + 1) % self.rotation.len()];
        self.rotation.remove(index);

        if self.rotation.is_empty() {
            self.state = TurnState::GameOver { winner: None };
            return Ok(self.state);
        }

        let was_due = match self.state {
            TurnState::TurnGranted(p) => p == player,
            TurnState::AwaitingTurn { next } => next == player,
            TurnState::GameOver { .. } => false,
        };
        if was_due {
            self.state = TurnState::AwaitingTurn { next };
        }
        Ok(self.state)
    }

    fn check_holder(&self, player: PlayerId) -> Result<(), TurnError> {
        match self.state {
            TurnState::TurnGranted(p) if p == player => Ok(()),
            TurnState::GameOver { .. } => Err(TurnError::GameOver),
            _ => Err(TurnError::NotYourTurn { player }),
        }
    }

    fn index_of(&self, player: PlayerId) -> Result<usize, TurnError> {
        self.rotation
            .iter()
            .position(|p| *p == player)
            .ok_or(TurnError::NotInRotation(player))
    }

    fn successor(&self, player: PlayerId) -> Result<PlayerId, TurnError> {
        let index = self.index_of(player)?;
        Ok(self.rotation[(index + 1) % self.rotation.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u64) -> Vec<PlayerId> {
        (0..n).map(PlayerId).collect()
    }

    /// Plays one full non-ending turn for whoever holds it.
    fn pass_turn(turns: &mut TurnCoordinator) -> PlayerId {
        let holder = turns.current().unwrap();
        turns.release(holder).unwrap();
        turns.grant().unwrap()
    }

    #[test]
    fn test_new_grants_first_player() {
        let turns = TurnCoordinator::new(&ids(3)).unwrap();
        assert_eq!(turns.state(), TurnState::TurnGranted(PlayerId(0)));
        assert_eq!(turns.current(), Some(PlayerId(0)));
    }

    #[test]
    fn test_new_rejects_empty_and_duplicates() {
        assert_eq!(TurnCoordinator::new(&[]).unwrap_err(), TurnError::NoPlayers);
        assert_eq!(
            TurnCoordinator::new(&[PlayerId(2), PlayerId(2)]).unwrap_err(),
            TurnError::DuplicatePlayer(PlayerId(2))
        );
    }

    #[test]
    fn test_round_robin_returns_to_first_after_n_turns() {
        for n in 1..=5 {
            let mut turns = TurnCoordinator::new(&ids(n)).unwrap();
            let mut order = Vec::new();
            for _ in 0..n {
                order.push(pass_turn(&mut turns));
            }
            assert_eq!(*order.last().unwrap(), PlayerId(0));
            assert_eq!(turns.turns_completed(), n);
            let expected: Vec<_> = (1..n).chain([0]).map(PlayerId).collect();
            assert_eq!(order, expected);
        }
    }

    #[test]
    fn test_release_queues_next_without_granting() {
        let mut turns = TurnCoordinator::new(&ids(2)).unwrap();
        assert_eq!(turns.release(PlayerId(0)).unwrap(), PlayerId(1));
        assert_eq!(
            turns.state(),
            TurnState::AwaitingTurn { next: PlayerId(1) }
        );
        assert_eq!(turns.current(), None);
    }

    #[test]
    fn test_only_holder_may_release() {
        let mut turns = TurnCoordinator::new(&ids(3)).unwrap();
        assert_eq!(
            turns.release(PlayerId(1)).unwrap_err(),
            TurnError::NotYourTurn { player: PlayerId(1) }
        );
        assert_eq!(
            turns.finish(PlayerId(2)).unwrap_err(),
            TurnError::NotYourTurn { player: PlayerId(2) }
        );
    }

    #[test]
    fn test_never_two_grants() {
        let mut turns = TurnCoordinator::new(&ids(2)).unwrap();
        assert_eq!(
            turns.grant().unwrap_err(),
            TurnError::AlreadyGranted(PlayerId(0))
        );

        turns.release(PlayerId(0)).unwrap();
        turns.grant().unwrap();
        assert_eq!(
            turns.grant().unwrap_err(),
            TurnError::AlreadyGranted(PlayerId(1))
        );
    }

    #[test]
    fn test_finish_is_terminal() {
        let mut turns = TurnCoordinator::new(&ids(2)).unwrap();
        turns.finish(PlayerId(0)).unwrap();

        assert_eq!(
            turns.state(),
            TurnState::GameOver {
                winner: Some(PlayerId(0))
            }
        );
        assert_eq!(turns.grant().unwrap_err(), TurnError::GameOver);
        assert_eq!(turns.release(PlayerId(0)).unwrap_err(), TurnError::GameOver);
        assert_eq!(turns.forfeit(PlayerId(1)).unwrap_err(), TurnError::GameOver);
    }

    #[test]
    fn test_forfeit_of_holder_moves_turn_on() {
        let mut turns = TurnCoordinator::new(&ids(3)).unwrap();
        let state = turns.forfeit(PlayerId(0)).unwrap();

        assert_eq!(state, TurnState::AwaitingTurn { next: PlayerId(1) });
        assert_eq!(turns.rotation(), &[PlayerId(1), PlayerId(2)]);
        assert_eq!(turns.grant().unwrap(), PlayerId(1));
    }

    #[test]
    fn test_forfeit_of_queued_player_skips_them() {
        let mut turns = TurnCoordinator::new(&ids(3)).unwrap();
        turns.release(PlayerId(0)).unwrap();
        turns.forfeit(PlayerId(1)).unwrap();

        assert_eq!(
            turns.state(),
            TurnState::AwaitingTurn { next: PlayerId(2) }
        );
    }

    #[test]
    fn test_forfeit_of_bystander_keeps_holder() {
        let mut turns = TurnCoordinator::new(&ids(3)).unwrap();
        turns.forfeit(PlayerId(2)).unwrap();

        assert_eq!(turns.state(), TurnState::TurnGranted(PlayerId(0)));
        assert_eq!(pass_turn(&mut turns), PlayerId(1));
        assert_eq!(pass_turn(&mut turns), PlayerId(0));
    }

    #[test]
    fn test_forfeit_last_player_ends_without_winner() {
        let mut turns = TurnCoordinator::new(&ids(2)).unwrap();
        turns.forfeit(PlayerId(0)).unwrap();
        let state = turns.forfeit(PlayerId(1)).unwrap();

        assert_eq!(state, TurnState::GameOver { winner: None });
        assert!(turns.state().is_over());
    }

    #[test]
    fn test_forfeit_unknown_player() {
        let mut turns = TurnCoordinator::new(&ids(2)).unwrap();
        assert_eq!(
            turns.forfeit(PlayerId(7)).unwrap_err(),
            TurnError::NotInRotation(PlayerId(7))
        );
    }

    #[test]
    fn test_single_player_keeps_the_turn() {
        let mut turns = TurnCoordinator::new(&ids(1)).unwrap();
        assert_eq!(pass_turn(&mut turns), PlayerId(0));
        assert_eq!(pass_turn(&mut turns), PlayerId(0));
    }
}
