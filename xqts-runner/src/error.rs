//! Error types for the runner core

use std::path::PathBuf;

use thiserror::Error;
use xqts_engine_traits::{EngineError, QueryError};

use crate::messages::ResourceError;

/// Everything that can turn a test-case into an `Error` verdict.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// The test-case descriptor carries no query at all
    #[error("Invalid Test Case")]
    InvalidTestCase,

    /// The resource cache could not produce a dependency
    #[error("failed to fetch resource {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: ResourceError,
    },

    /// A referenced source file never arrived in the resolved environment
    #[error("no resolved source for {0}")]
    MissingSource(PathBuf),

    /// The query file referenced by the test never arrived
    #[error("no resolved query for test case")]
    MissingQuery,

    /// The query file was not valid UTF-8
    #[error("query file is not valid UTF-8: {0}")]
    QueryNotUtf8(#[from] std::str::Utf8Error),

    /// A text resource declared a charset no decoder exists for
    #[error("unknown charset: {0}")]
    UnknownCharset(String),

    /// A parameter's select expression raised an XQuery error
    #[error("select expression for parameter ${name} failed: {source}")]
    ParamSelect {
        name: String,
        #[source]
        source: QueryError,
    },

    /// A fixed helper query raised an XQuery error where a value was required
    #[error("helper query failed: {0}")]
    HelperQuery(#[source] QueryError),

    /// A helper query produced something other than the expected shape
    #[error("helper query returned a non-string result")]
    NonStringSerialization,

    /// The test case expected no result at all
    #[error("test case has no expected result")]
    MissingExpectedResult,

    /// Reading an assertion's companion file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// XML diffing could not compare the serialized fragments
    #[error("XML comparison failed: {0}")]
    XmlDiff(String),

    /// Non-fatal engine failure; becomes an `Error` verdict
    #[error(transparent)]
    Engine(EngineError),

    /// Fatal engine failure; logged and re-raised out of the message loop
    #[error("fatal engine failure: {0}")]
    Fatal(#[source] EngineError),
}

impl RunnerError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RunnerError::Fatal(_))
    }
}

impl From<EngineError> for RunnerError {
    /// Keeps the fatal flag intact so `?` on an engine call cannot turn an
    /// unrecoverable failure into an `Error` verdict.
    fn from(error: EngineError) -> Self {
        if error.is_fatal() {
            RunnerError::Fatal(error)
        } else {
            RunnerError::Engine(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, RunnerError>;
