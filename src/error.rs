//! Error types with caller location tracking.

use derive_more::{Display, Error};
use tracing::{error, instrument};

/// Why an oracle consultation produced no usable move.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum OracleErrorKind {
    /// Request could not be delivered or the provider answered with an error.
    #[display("transport failure: {_0}")]
    Transport(String),
    /// Reply did not contain a JSON object of the expected shape.
    #[display("malformed reply: {_0}")]
    Malformed(String),
    /// Reply object lacks a coordinate field.
    #[display("reply has no '{_0}' coordinate")]
    MissingCoordinate(&'static str),
    /// Coordinate present but not an integer.
    #[display("'{field}' coordinate is not an integer: {value}")]
    NonNumericCoordinate {
        /// Field name (`row` or `col`).
        field: &'static str,
        /// Offending JSON value.
        value: String,
    },
    /// Oracle did not answer in time.
    #[display("no reply within {_0} seconds")]
    Timeout(u64),
    /// Fallback scan found no empty cell.
    #[display("no empty cell left for a fallback move")]
    NoEmptyCell,
}

/// Oracle error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Oracle error: {} at {}:{}", kind, file, line)]
pub struct OracleError {
    /// What went wrong.
    pub kind: OracleErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl OracleError {
    /// Creates a new oracle error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: OracleErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        error!(kind = %kind, "Oracle error created");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// The error kind.
    pub fn kind(&self) -> &OracleErrorKind {
        &self.kind
    }
}

impl From<crate::llm_client::LlmError> for OracleError {
    #[track_caller]
    fn from(err: crate::llm_client::LlmError) -> Self {
        Self::new(OracleErrorKind::Transport(err.message))
    }
}

/// Board text could not be parsed.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", message, file, line)]
pub struct BoardError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
