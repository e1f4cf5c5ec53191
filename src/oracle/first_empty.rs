//! Offline oracle that needs no network.

use super::{MoveOracle, OracleReply, OracleRequest};
use crate::error::{OracleError, OracleErrorKind};
use tracing::debug;

/// Oracle that always picks the first empty cell in row-major order.
pub struct FirstEmptyOracle {
    name: String,
}

impl FirstEmptyOracle {
    /// Creates a new first-empty oracle.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for FirstEmptyOracle {
    fn default() -> Self {
        Self::new("Offline")
    }
}

#[async_trait::async_trait]
impl MoveOracle for FirstEmptyOracle {
    async fn suggest_move(&self, request: &OracleRequest) -> Result<OracleReply, OracleError> {
        let mv = request
            .board
            .first_empty()
            .ok_or_else(|| OracleError::new(OracleErrorKind::NoEmptyCell))?;

        debug!(oracle = %self.name, %mv, "Offline oracle chose position");
        Ok(OracleReply::new(mv.row as i64, mv.col as i64))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
