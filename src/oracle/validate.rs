//! Validation of oracle suggestions against the live board.

use super::OracleReply;
use crate::error::{OracleError, OracleErrorKind};
use crate::games::omok::{Board, Move};
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

/// Why a suggested coordinate was replaced by the fallback cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// Suggested row or column outside `[0, N)`.
    OutOfRange {
        /// Suggested row.
        row: i64,
        /// Suggested column.
        col: i64,
    },
    /// Suggested cell already holds a stone.
    Occupied(Move),
}

/// A legal move derived from an oracle reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedMove {
    /// Cell to play.
    pub mv: Move,
    /// Set when `mv` is the fallback rather than the oracle's own pick.
    pub fallback: Option<FallbackReason>,
}

/// Resolves an oracle reply to a legal move.
///
/// Out-of-range coordinates are rejected rather than clamped. A rejected
/// or occupied suggestion is replaced by the first empty cell in
/// row-major order. Fails only when the board has no empty cell left.
#[instrument(skip(board), fields(size = board.size()))]
pub fn resolve_move(board: &Board, reply: &OracleReply) -> Result<ResolvedMove, OracleError> {
    let fallback = match suggested_cell(board, reply) {
        Some(mv) if board.is_empty(mv) => {
            return Ok(ResolvedMove { mv, fallback: None });
        }
        Some(mv) => FallbackReason::Occupied(mv),
        None => FallbackReason::OutOfRange {
            row: reply.row,
            col: reply.col,
        },
    };

    let mv = board.first_empty().ok_or_else(|| {
        debug_assert!(false, "oracle consulted on a full board");
        OracleError::new(OracleErrorKind::NoEmptyCell)
    })?;

    warn!(?fallback, fallback_move = %mv, "Oracle suggestion rejected, using first empty cell");
    Ok(ResolvedMove {
        mv,
        fallback: Some(fallback),
    })
}

fn suggested_cell(board: &Board, reply: &OracleReply) -> Option<Move> {
    let row = usize::try_from(reply.row).ok()?;
    let col = usize::try_from(reply.col).ok()?;
    let mv = Move::new(row, col);
    board.contains(mv).then_some(mv)
}
