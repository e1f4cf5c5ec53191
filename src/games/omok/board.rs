//! Fixed-size square board.

use super::types::{Cell, Move, Player};
use crate::error::BoardError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::instrument;

/// Square grid of cells, stored row-major.
///
/// The side length is fixed at construction. Stones are only written
/// through the game state machine, one per accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty `size × size` board.
    #[instrument]
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size * size],
        }
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// True if `mv` lies on the board.
    pub fn contains(&self, mv: Move) -> bool {
        mv.row < self.size && mv.col < self.size
    }

    /// Gets the cell at `mv`, or `None` when off the board.
    pub fn get(&self, mv: Move) -> Option<Cell> {
        if self.contains(mv) {
            Some(self.cells[mv.row * self.size + mv.col])
        } else {
            None
        }
    }

    /// Checks if a cell is on the board and empty.
    pub fn is_empty(&self, mv: Move) -> bool {
        matches!(self.get(mv), Some(Cell::Empty))
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterates over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks(0) panics, and a zero-sized board has no rows anyway
        self.cells.chunks(self.size.max(1))
    }

    /// Number of empty cells.
    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == Cell::Empty).count()
    }

    /// First empty cell in row-major scan order.
    pub fn first_empty(&self) -> Option<Move> {
        self.cells
            .iter()
            .position(|c| *c == Cell::Empty)
            .map(|idx| Move::new(idx / self.size, idx % self.size))
    }

    /// Writes a stone. Caller guarantees `mv` is on the board and empty.
    pub(crate) fn place(&mut self, mv: Move, player: Player) {
        debug_assert!(self.is_empty(mv), "placing on {mv} which is not an empty cell");
        let idx = mv.row * self.size + mv.col;
        self.cells[idx] = Cell::Occupied(player);
    }

    /// Renders the board for an oracle prompt.
    ///
    /// One row per line, cells separated by spaces: `0` empty, `B` black,
    /// `W` white. [`Board::from_str`] reads the same format back.
    pub fn to_prompt_grid(&self) -> String {
        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        Cell::Empty => "0".to_string(),
                        Cell::Occupied(p) => p.symbol().to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parses a square grid of `0`/`.` (empty), `B` and `W`.
    ///
    /// Whitespace inside a row is ignored; blank lines are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows: Vec<Vec<Cell>> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .filter(|c| !c.is_whitespace())
                    .map(|c| match c {
                        '0' | '.' => Ok(Cell::Empty),
                        'B' | 'b' => Ok(Cell::Occupied(Player::Black)),
                        'W' | 'w' => Ok(Cell::Occupied(Player::White)),
                        other => Err(BoardError::new(format!("Unknown cell symbol '{}'", other))),
                    })
                    .collect()
            })
            .collect::<Result<_, _>>()?;

        let size = rows.len();
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != size) {
            return Err(BoardError::new(format!(
                "Row {} has {} cells, expected {}",
                idx,
                row.len(),
                size
            )));
        }

        Ok(Self {
            size,
            cells: rows.into_iter().flatten().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(15);
        assert_eq!(board.size(), 15);
        assert_eq!(board.cells().len(), 225);
        assert_eq!(board.empty_count(), 225);
        assert_eq!(board.first_empty(), Some(Move::new(0, 0)));
    }

    #[test]
    fn test_get_off_board() {
        let board = Board::new(3);
        assert_eq!(board.get(Move::new(3, 0)), None);
        assert_eq!(board.get(Move::new(0, 3)), None);
        assert!(!board.is_empty(Move::new(5, 5)));
    }

    #[test]
    fn test_first_empty_is_row_major() {
        let mut board = Board::new(3);
        for col in 0..3 {
            board.place(Move::new(0, col), Player::Black);
        }
        board.place(Move::new(1, 0), Player::White);
        assert_eq!(board.first_empty(), Some(Move::new(1, 1)));
    }

    #[test]
    fn test_prompt_grid_round_trip() {
        let mut board = Board::new(3);
        board.place(Move::new(1, 1), Player::Black);
        board.place(Move::new(2, 0), Player::White);
        let text = board.to_prompt_grid();
        assert_eq!(text, "0 0 0\n0 B 0\nW 0 0");
        assert_eq!(text.parse::<Board>().unwrap(), board);
    }

    #[test]
    fn test_parse_rejects_ragged_rows() {
        assert!("000\n00\n000".parse::<Board>().is_err());
        assert!("0X0\n000\n000".parse::<Board>().is_err());
    }
}
