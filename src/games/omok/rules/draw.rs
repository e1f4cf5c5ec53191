//! Full-board detection.

use super::super::{Board, Cell};
use tracing::instrument;

/// Checks if every cell holds a stone.
///
/// A full board with no winner is a draw; the win check runs first.
#[instrument(skip(board), fields(size = board.size()))]
pub fn is_full(board: &Board) -> bool {
    board.cells().iter().all(|c| *c != Cell::Empty)
}
