//! XQuery engine abstraction.
//!
//! The runner never talks to a concrete engine; it acquires an
//! [`EngineConnection`] per test-case and issues [`QueryRequest`]s through it.
//! Dropping the connection releases whatever the engine holds for it, which
//! is how the runner releases engine resources on every exit path.

use crate::error::{EngineError, QueryError};
use crate::xdm::Sequence;

/// A text resource made available to a query via `fn:unparsed-text` and
/// friends: the declared charset plus the decoded content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextResource {
    pub charset: String,
    pub text: String,
}

/// Everything a single query execution needs.
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    /// XQuery source text
    pub query: String,
    /// Whether the engine may cache the compiled form; set for the runner's
    /// fixed helper queries, unset for one-off test queries.
    pub cache_compiled: bool,
    /// Static base URI, if any
    pub base_uri: Option<String>,
    /// Initial context sequence; `Some(empty)` is a forced empty context,
    /// `None` means no context item at all.
    pub context: Option<Sequence>,
    /// Documents available to `fn:doc`, keyed by URI
    pub available_documents: Vec<(String, Sequence)>,
    /// Collections available to `fn:collection`, keyed by URI
    pub available_collections: Vec<(String, Vec<Sequence>)>,
    /// Text resources available to `fn:unparsed-text`, keyed by URI
    pub available_text_resources: Vec<(String, TextResource)>,
    /// External variable bindings
    pub variables: Vec<(String, Sequence)>,
}

impl QueryRequest {
    /// A request carrying nothing but the query text.
    pub fn bare(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }
}

/// Outcome of evaluating a query: either a result sequence or an XQuery
/// error. Both are ordinary outcomes for a conformance test.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Sequence(Sequence),
    Error(QueryError),
}

/// A query outcome together with the timings of the engine invocation that
/// produced it, in milliseconds.
#[derive(Debug, Clone)]
pub struct Evaluated {
    pub outcome: QueryOutcome,
    pub compilation_ms: u64,
    pub execution_ms: u64,
}

/// A connection scoped to one test-case. Engine resources held by the
/// connection are released on drop.
pub trait EngineConnection {
    /// Execute a query. An `Err` is an engine failure; an expected XQuery
    /// error comes back as `Ok` with [`QueryOutcome::Error`].
    fn execute_query(&mut self, request: &QueryRequest) -> Result<Evaluated, EngineError>;

    /// Parse raw bytes as an XML document, yielding a one-item sequence.
    fn parse_xml(&mut self, bytes: &[u8]) -> Result<Sequence, EngineError>;

    /// Plain string rendering of a sequence.
    fn sequence_to_string(&mut self, seq: &Sequence) -> Result<String, EngineError>;

    /// Adaptive string rendering of a sequence, suitable for diagnostics.
    fn sequence_to_string_adaptive(&mut self, seq: &Sequence) -> Result<String, EngineError>;
}

/// An XQuery engine the runner can draw per-test-case connections from.
pub trait QueryEngine {
    type Conn: EngineConnection;

    fn acquire(&mut self) -> Result<Self::Conn, EngineError>;
}
