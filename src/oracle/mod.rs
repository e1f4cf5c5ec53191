//! Move oracle boundary.
//!
//! An oracle receives an [`OracleRequest`] and answers with a coordinate.
//! Nothing an oracle says is trusted: replies are parsed with
//! [`parse_reply`] and checked against the board with [`resolve_move`]
//! before a stone is placed.

mod first_empty;
mod llm;
mod parse;
mod prompt;
mod request;
mod validate;

pub use first_empty::FirstEmptyOracle;
pub use llm::LlmOracle;
pub use parse::parse_reply;
pub use prompt::{system_prompt, user_prompt};
pub use request::{OracleReply, OracleRequest, Ticket};
pub use validate::{FallbackReason, ResolvedMove, resolve_move};

use crate::error::OracleError;

/// Something that suggests moves for the oracle seat.
#[async_trait::async_trait]
pub trait MoveOracle: Send + Sync {
    /// Suggests a move for `request.color` on `request.board`.
    ///
    /// The reply may be illegal; callers validate it.
    async fn suggest_move(&self, request: &OracleRequest) -> Result<OracleReply, OracleError>;

    /// Returns the oracle's display name.
    fn name(&self) -> &str;
}
