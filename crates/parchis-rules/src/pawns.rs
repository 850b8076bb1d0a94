//! Pawn positions and the move rule.
//!
//! The free functions here are shared by the server (which applies moves)
//! and the agents (which pick them), so both sides agree on where a pawn
//! ends up.

use parchis_protocol::Position;

use crate::{Board, IllegalMove};

/// Where a pawn at `from` ends up after moving `delta` cells on a track of
/// `track_len` cells, ignoring obstacles.
///
/// - `Finished` pawns don't move: returns `None`.
/// - `AtStart` counts as the virtual cell `-1`.
/// - Reaching or passing `track_len` gives `Finished`.
/// - Falling below cell 0 clamps to cell 0.
pub fn project(from: Position, delta: i32, track_len: usize) -> Option<Position> {
    let base: i64 = match from {
        Position::Finished => return None,
        Position::AtStart => -1,
        Position::Cell(c) => c as i64,
    };
    let target = base + i64::from(delta);
    Some(if target >= track_len as i64 {
        Position::Finished
    } else if target < 0 {
        Position::Cell(0)
    } else {
        Position::Cell(target as usize)
    })
}

/// Like [`project`], but also `None` when the landing cell is an obstacle.
pub fn legal_destination(
    from: Position,
    delta: i32,
    board: &Board,
) -> Option<Position> {
    match project(from, delta, board.len())? {
        Position::Cell(cell) if board.is_obstacle(cell) => None,
        to => Some(to),
    }
}

/// Cells left to walk before `position` is finished.
pub fn remaining_distance(position: Position, track_len: usize) -> usize {
    match position {
        Position::Finished => 0,
        Position::Cell(c) => track_len.saturating_sub(c),
        Position::AtStart => track_len + 1,
    }
}

// ---------------------------------------------------------------------------
// PawnSet
// ---------------------------------------------------------------------------

/// One player's pawns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PawnSet {
    positions: Vec<Position>,
}

impl PawnSet {
    /// `count` pawns, all waiting at the start.
    pub fn new(count: usize) -> Self {
        Self {
            positions: vec![Position::AtStart; count],
        }
    }

    pub fn from_positions(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The position of one pawn.
    pub fn position(&self, pawn: usize) -> Result<Position, IllegalMove> {
        self.positions
            .get(pawn)
            .copied()
            .ok_or(IllegalMove::NoSuchPawn {
                pawn,
                count: self.positions.len(),
            })
    }

    /// The win condition: every pawn is `Finished`.
    pub fn all_finished(&self) -> bool {
        self.positions.iter().all(|p| p.is_finished())
    }

    pub fn finished_count(&self) -> usize {
        self.positions.iter().filter(|p| p.is_finished()).count()
    }

    /// Moves one pawn by `delta` and returns its new position.
    ///
    /// On error nothing changes. Only the selected pawn is ever touched.
    pub fn apply_move(
        &mut self,
        pawn: usize,
        delta: i32,
        board: &Board,
    ) -> Result<Position, IllegalMove> {
        let from = self.position(pawn)?;
        let to = project(from, delta, board.len())
            .ok_or(IllegalMove::AlreadyFinished { pawn })?;
        if let Position::Cell(cell) = to {
            if board.is_obstacle(cell) {
                return Err(IllegalMove::Blocked { pawn, cell });
            }
        }
        self.positions[pawn] = to;
        Ok(to)
    }
}

#[cfg(test)]
mod tests {
    use parchis_protocol::Cell;

    use super::*;

    fn board_with_obstacles(len: usize, obstacles: &[usize]) -> Board {
        let mut cells = vec![Cell::Normal; len];
        for &i in obstacles {
            cells[i] = Cell::Obstacle;
        }
        Board::from_cells(cells)
    }

    // =====================================================================
    // project
    // =====================================================================

    #[test]
    fn test_project_overshoot_finishes() {
        assert_eq!(project(Position::Cell(36), 10, 40), Some(Position::Finished));
        assert_eq!(project(Position::Cell(39), 1, 40), Some(Position::Finished));
        assert_eq!(project(Position::Cell(38), 1, 40), Some(Position::Cell(39)));
    }

    #[test]
    fn test_project_from_start_counts_from_minus_one() {
        assert_eq!(project(Position::AtStart, 1, 40), Some(Position::Cell(0)));
        assert_eq!(project(Position::AtStart, 12, 40), Some(Position::Cell(11)));
    }

    #[test]
    fn test_project_negative_clamps_to_first_cell() {
        assert_eq!(project(Position::Cell(2), -5, 40), Some(Position::Cell(0)));
        assert_eq!(project(Position::AtStart, -3, 40), Some(Position::Cell(0)));
    }

    #[test]
    fn test_project_finished_is_none() {
        assert_eq!(project(Position::Finished, 3, 40), None);
    }

    #[test]
    fn test_remaining_distance() {
        assert_eq!(remaining_distance(Position::Finished, 40), 0);
        assert_eq!(remaining_distance(Position::Cell(15), 40), 25);
        assert_eq!(remaining_distance(Position::AtStart, 40), 41);
    }

    #[test]
    fn test_legal_destination_skips_obstacles_but_not_finish() {
        let board = board_with_obstacles(40, &[8, 39]);
        assert_eq!(legal_destination(Position::Cell(5), 3, &board), None);
        assert_eq!(legal_destination(Position::Cell(35), 4, &board), None);
        assert_eq!(
            legal_destination(Position::Cell(35), 5, &board),
            Some(Position::Finished)
        );
    }

    // =====================================================================
    // PawnSet::apply_move
    // =====================================================================

    #[test]
    fn test_apply_move_to_finish() {
        let board = Board::open(40);
        let mut pawns = PawnSet::from_positions(vec![Position::Cell(36)]);
        assert_eq!(pawns.apply_move(0, 10, &board), Ok(Position::Finished));
        assert_eq!(pawns.positions(), &[Position::Finished]);
    }

    #[test]
    fn test_apply_move_onto_obstacle_is_rejected() {
        let board = board_with_obstacles(40, &[8]);
        let mut pawns = PawnSet::from_positions(vec![Position::Cell(5)]);

        let result = pawns.apply_move(0, 3, &board);

        assert_eq!(result, Err(IllegalMove::Blocked { pawn: 0, cell: 8 }));
        assert_eq!(pawns.positions(), &[Position::Cell(5)]);
    }

    #[test]
    fn test_apply_move_touches_only_selected_pawn() {
        let board = Board::open(40);
        let mut pawns = PawnSet::from_positions(vec![
            Position::Cell(1),
            Position::Cell(2),
            Position::AtStart,
        ]);
        pawns.apply_move(1, 4, &board).unwrap();
        assert_eq!(
            pawns.positions(),
            &[Position::Cell(1), Position::Cell(6), Position::AtStart]
        );
    }

    #[test]
    fn test_finished_pawn_never_changes() {
        let board = Board::open(40);
        let mut pawns = PawnSet::from_positions(vec![Position::Finished]);
        for delta in -5..=12 {
            assert_eq!(
                pawns.apply_move(0, delta, &board),
                Err(IllegalMove::AlreadyFinished { pawn: 0 })
            );
            assert_eq!(pawns.positions(), &[Position::Finished]);
        }
    }

    #[test]
    fn test_unknown_pawn_index() {
        let board = Board::open(40);
        let mut pawns = PawnSet::new(4);
        assert_eq!(
            pawns.apply_move(4, 1, &board),
            Err(IllegalMove::NoSuchPawn { pawn: 4, count: 4 })
        );
    }

    #[test]
    fn test_result_always_on_track_or_finished() {
        let board = Board::open(40);
        for start in 0..40 {
            for delta in -50..=50 {
                let mut pawns =
                    PawnSet::from_positions(vec![Position::Cell(start)]);
                match pawns.apply_move(0, delta, &board).unwrap() {
                    Position::Finished => {}
                    Position::Cell(c) => assert!(c < 40, "{start}+{delta} -> {c}"),
                    Position::AtStart => panic!("moved back to start"),
                }
            }
        }
    }

    #[test]
    fn test_all_finished_requires_every_pawn() {
        let mut pawns = PawnSet::from_positions(vec![
            Position::Finished,
            Position::Finished,
            Position::Cell(39),
        ]);
        assert!(!pawns.all_finished());
        assert_eq!(pawns.finished_count(), 2);

        pawns.apply_move(2, 1, &Board::open(40)).unwrap();
        assert!(pawns.all_finished());
    }

    #[test]
    fn test_new_pawns_wait_at_start() {
        let pawns = PawnSet::new(4);
        assert_eq!(pawns.len(), 4);
        assert!(pawns.positions().iter().all(|p| *p == Position::AtStart));
        assert!(!pawns.all_finished());
    }
}
