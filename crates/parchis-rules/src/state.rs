//! The authoritative game state.

use std::sync::Arc;

use parchis_protocol::{PlayerId, Position};

use crate::{Board, GameConfig, IllegalMove, PawnSet, RulesError};

/// How a game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    /// The player finished every pawn.
    Won(PlayerId),
    /// Every player forfeited before anyone finished.
    Abandoned,
}

impl GameOutcome {
    pub fn winner(self) -> Option<PlayerId> {
        match self {
            Self::Won(p) => Some(p),
            Self::Abandoned => None,
        }
    }
}

/// What an accepted move did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOutcome {
    pub player: PlayerId,
    pub pawn: usize,
    pub delta: i32,
    pub from: Position,
    pub to: Position,
    /// `true` if this move finished the player's last pawn.
    pub won: bool,
}

#[derive(Debug, Clone)]
struct PlayerState {
    id: PlayerId,
    pawns: PawnSet,
    forfeited: bool,
}

/// Board plus every player's pawns.
///
/// Mutated once per accepted move (pawn update, then win check). Once
/// [`outcome`](Self::outcome) is set the state is read-only and every
/// mutation returns [`RulesError::GameEnded`].
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    board: Arc<Board>,
    players: Vec<PlayerState>,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// Starts a game with every pawn at the start.
    pub fn new(
        config: GameConfig,
        board: Board,
        players: &[PlayerId],
    ) -> Result<Self, RulesError> {
        config.validate()?;
        if players.is_empty() {
            return Err(RulesError::InvalidConfig("no players".into()));
        }
        for (i, id) in players.iter().enumerate() {
            if players[..i].contains(id) {
                return Err(RulesError::DuplicatePlayer(*id));
            }
        }

        let players = players
            .iter()
            .map(|&id| PlayerState {
                id,
                pawns: PawnSet::new(config.pawns_per_player),
                forfeited: false,
            })
            .collect();

        Ok(Self {
            config,
            board: Arc::new(board),
            players,
            outcome: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The shared, read-only board.
    pub fn board(&self) -> &Arc<Board> {
        &self.board
    }

    /// All player ids in seating order.
    pub fn players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().map(|p| p.id)
    }

    /// Players that have not forfeited.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players.iter().filter(|p| !p.forfeited).map(|p| p.id)
    }

    pub fn pawns(&self, player: PlayerId) -> Result<&PawnSet, RulesError> {
        self.player(player).map(|p| &p.pawns)
    }

    /// The win condition for one player.
    pub fn all_finished(&self, player: PlayerId) -> Result<bool, RulesError> {
        self.pawns(player).map(PawnSet::all_finished)
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.outcome.and_then(GameOutcome::winner)
    }

    pub fn is_ended(&self) -> bool {
        self.outcome.is_some()
    }

    /// Applies one move and runs the win check.
    ///
    /// The delta must be something two dice can produce. The move is
    /// validated in full before the pawn is touched.
    pub fn apply_move(
        &mut self,
        player: PlayerId,
        pawn: usize,
        delta: i32,
    ) -> Result<MoveOutcome, RulesError> {
        if self.outcome.is_some() {
            return Err(RulesError::GameEnded);
        }
        let range = self.config.delta_range();
        if !range.contains(&delta) {
            return Err(IllegalMove::DeltaOutOfRange {
                delta,
                min: *range.start(),
                max: *range.end(),
            }
            .into());
        }

        let index = self.index_of(player)?;
        let state = &mut self.players[index];
        if state.forfeited {
            return Err(RulesError::Forfeited(player));
        }

        let from = state.pawns.position(pawn)?;
        let to = state.pawns.apply_move(pawn, delta, &self.board)?;
        let won = state.pawns.all_finished();

        tracing::debug!(
            %player, pawn, delta, %from, %to, "move applied"
        );

        if won {
            self.outcome = Some(GameOutcome::Won(player));
            tracing::info!(%player, "all pawns finished");
        }

        Ok(MoveOutcome {
            player,
            pawn,
            delta,
            from,
            to,
            won,
        })
    }

    /// Takes a player out of the game. Their pawns stay where they are.
    pub fn forfeit(&mut self, player: PlayerId) -> Result<(), RulesError> {
        if self.outcome.is_some() {
            return Err(RulesError::GameEnded);
        }
        let index = self.index_of(player)?;
        let state = &mut self.players[index];
        if state.forfeited {
            return Err(RulesError::Forfeited(player));
        }
        state.forfeited = true;
        Ok(())
    }

    /// Ends the game without a winner.
    pub fn abandon(&mut self) -> Result<(), RulesError> {
        if self.outcome.is_some() {
            return Err(RulesError::GameEnded);
        }
        self.outcome = Some(GameOutcome::Abandoned);
        Ok(())
    }

    fn index_of(&self, player: PlayerId) -> Result<usize, RulesError> {
        self.players
            .iter()
            .position(|p| p.id == player)
            .ok_or(RulesError::UnknownPlayer(player))
    }

    fn player(&self, player: PlayerId) -> Result<&PlayerState, RulesError> {
        self.index_of(player).map(|i| &self.players[i])
    }
}
