//! Error types for engine operations

use thiserror::Error;

/// Failure raised by the engine itself, as opposed to an XQuery error a
/// query is expected to raise (see [`QueryError`]).
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    /// XML parsing failed
    #[error("XML parsing error: {0}")]
    Parse(String),

    /// The engine could not hand out a connection
    #[error("connection error: {0}")]
    Connection(String),

    /// Internal engine failure during compilation or evaluation
    #[error("engine error: {0}")]
    Internal(String),

    /// The engine ran out of memory; unrecoverable
    #[error("engine out of memory: {0}")]
    OutOfMemory(String),

    /// The engine overflowed its stack; unrecoverable
    #[error("engine stack overflow: {0}")]
    StackOverflow(String),
}

impl EngineError {
    /// Fatal errors terminate the runner's message loop instead of turning
    /// into an `Error` verdict.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::OutOfMemory(_) | Self::StackOverflow(_))
    }
}

/// An XQuery error produced by evaluating a query, carrying its `err:` code.
///
/// These are ordinary test outcomes: many XQTS cases expect a specific code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct QueryError {
    /// Error code, e.g. `FORG0001`
    pub code: String,
    /// Human-readable message from the engine
    pub message: String,
}

impl QueryError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
