//! Request and reply shapes exchanged with a move oracle.

use crate::games::omok::{Board, Player, Rules};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stamp identifying one oracle request.
///
/// Tickets grow monotonically for the lifetime of a [`Game`](crate::Game)
/// and survive resets, so a reply can always be matched to the request
/// that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ticket(pub u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything an oracle needs to choose a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleRequest {
    /// Stamp to hand back with the reply.
    pub ticket: Ticket,
    /// Board snapshot at request time.
    pub board: Board,
    /// Board size and win length.
    pub rules: Rules,
    /// Color the oracle plays.
    pub color: Player,
}

/// Raw coordinate suggested by an oracle, not yet validated.
///
/// Coordinates are signed so that negative suggestions survive parsing
/// and can be rejected by validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleReply {
    /// Suggested row.
    pub row: i64,
    /// Suggested column.
    pub col: i64,
    /// Free-text rationale, if any.
    pub reasoning: Option<String>,
}

impl OracleReply {
    /// Creates a reply without rationale.
    pub fn new(row: i64, col: i64) -> Self {
        Self {
            row,
            col,
            reasoning: None,
        }
    }
}
