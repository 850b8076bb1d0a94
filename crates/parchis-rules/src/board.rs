//! The track and its obstacles.

use parchis_protocol::Cell;
use rand::Rng;

/// An immutable track of `len()` cells.
///
/// Cell indices run from `0` to `len() - 1`; index `len()` is the finish
/// line, which is not stored and is never an obstacle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    /// Draws a board where every cell is independently an obstacle with
    /// probability `obstacle_probability`.
    ///
    /// Out-of-range probabilities are clamped to `[0, 1]`; NaN counts as 0.
    pub fn generate<R: Rng>(
        size: usize,
        obstacle_probability: f64,
        rng: &mut R,
    ) -> Self {
        let p = if obstacle_probability.is_nan() {
            0.0
        } else {
            obstacle_probability.clamp(0.0, 1.0)
        };
        let cells = (0..size)
            .map(|_| {
                if rng.random_bool(p) {
                    Cell::Obstacle
                } else {
                    Cell::Normal
                }
            })
            .collect();
        Self { cells }
    }

    /// Builds a board from an explicit layout.
    pub fn from_cells(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// A board of `size` normal cells.
    pub fn open(size: usize) -> Self {
        Self {
            cells: vec![Cell::Normal; size],
        }
    }

    /// Number of cells on the track.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The cell at `index`, or `None` past the end of the track.
    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Whether a pawn may not land on `index`.
    ///
    /// Every index at or beyond the finish answers `false`, so finishing is
    /// always possible.
    pub fn is_obstacle(&self, index: usize) -> bool {
        self.cell(index) == Some(Cell::Obstacle)
    }

    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Obstacle).count()
    }
}
