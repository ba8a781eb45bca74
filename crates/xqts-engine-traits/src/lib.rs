//! Core trait abstractions for XQuery evaluation engines.
//!
//! This crate defines the contract an embedded XQuery engine must implement
//! to be driven by the XQTS test-case runner: the XDM value model returned by
//! queries, the request shape a query is executed with, and the connection
//! lifecycle the runner scopes around each test-case.

pub mod engine;
pub mod error;
pub mod xdm;

pub use engine::{
    EngineConnection, Evaluated, QueryEngine, QueryOutcome, QueryRequest, TextResource,
};
pub use error::{EngineError, QueryError};
pub use xdm::{is_subtype_of, NodeInfo, NodeKind, Sequence, XdmItem};
