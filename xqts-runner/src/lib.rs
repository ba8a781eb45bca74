//! xqts-runner: test-case runner core for XQTS conformance testing.
//!
//! Given a test-case descriptor, the runner gathers every resource the case
//! depends on from a shared cache, dispatches the query to an embedded
//! XQuery engine, evaluates the expected-result assertion tree, and reports
//! exactly one verdict per accepted case.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::mpsc;
//! use xqts_runner::{Runner, RunnerMessage};
//!
//! let (cache_tx, cache_rx) = mpsc::channel();
//! let (inbox_tx, inbox_rx) = mpsc::channel();
//! let runner = Runner::new(engine, cache_tx);
//! inbox_tx.send(RunnerMessage::RunTestCase(submission))?;
//! runner.run(inbox_rx)?;
//! ```

pub mod assertions;
pub mod catalog;
pub mod context;
pub mod error;
pub mod messages;
pub mod pending;
pub mod queries;
pub mod reporter;
pub mod runner;
pub mod timings;
pub mod verdict;
pub mod xmldiff;

// Re-export core types
pub use catalog::{Assertion, Environment, TestCase, TestCaseId, TestSetRef, TestSource};
pub use error::RunnerError;
pub use messages::{CacheRequest, ManagerMessage, ResourceError, RunTestCase, RunnerMessage};
pub use runner::Runner;
pub use timings::TimingTotals;
pub use verdict::{TestOutcome, TestResult};

// Re-export the engine contract
pub use xqts_engine_traits as engine;
