//! Win detection from the last placed stone.

use super::super::{Board, Cell, Move, Player};
use tracing::instrument;

/// Horizontal, vertical, diagonal ↘, diagonal ↗.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Steps `i` cells from `origin` along `(dr, dc)`, returning `None` off the board.
fn step(board: &Board, origin: Move, dr: isize, dc: isize, i: isize) -> Option<Move> {
    let row = origin.row.checked_add_signed(dr * i)?;
    let col = origin.col.checked_add_signed(dc * i)?;
    let mv = Move::new(row, col);
    board.contains(mv).then_some(mv)
}

/// Counts contiguous `player` stones walking away from `origin`, excluding it.
///
/// Stops at the first cell that is off the board or not `player`.
fn walk(board: &Board, origin: Move, player: Player, dr: isize, dc: isize) -> Vec<Move> {
    let mut run = Vec::new();
    let mut i = 1;
    while let Some(mv) = step(board, origin, dr, dc, i) {
        if board.get(mv) != Some(Cell::Occupied(player)) {
            break;
        }
        run.push(mv);
        i += 1;
    }
    run
}

/// Returns the color at `last_move` if that stone sits in a run of at least
/// `win_length` contiguous same-colored stones along any of the four axes.
///
/// Only runs through `last_move` are examined. An empty or off-board
/// `last_move` never wins.
#[instrument(skip(board), fields(size = board.size()))]
pub fn detect_winner(board: &Board, last_move: Move, win_length: usize) -> Option<Player> {
    winning_run(board, last_move, win_length).map(|(player, _)| player)
}

/// Like [`detect_winner`], also returning every stone of the qualifying run
/// in board order.
#[instrument(skip(board), fields(size = board.size()))]
pub fn winning_run(
    board: &Board,
    last_move: Move,
    win_length: usize,
) -> Option<(Player, Vec<Move>)> {
    let player = board.get(last_move)?.stone()?;

    for (dr, dc) in DIRECTIONS {
        let forward = walk(board, last_move, player, dr, dc);
        let backward = walk(board, last_move, player, -dr, -dc);

        if 1 + forward.len() + backward.len() >= win_length {
            let mut run: Vec<Move> = backward.into_iter().rev().collect();
            run.push(last_move);
            run.extend(forward);
            return Some((player, run));
        }
    }

    None
}
