//! Messages exchanged with the resource cache and the test manager.
//!
//! The runner is a single-inbox actor: it consumes [`RunnerMessage`]s,
//! requests dependencies from the cache via [`CacheRequest`], and reports
//! progress and verdicts to the manager via [`ManagerMessage`]. The manager's
//! sender travels inside each submission, so distinct managers can submit to
//! the same runner.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

use thiserror::Error;

use crate::catalog::{TestCase, TestSetRef};
use crate::verdict::TestResult;

/// Why a resource fetch failed, as reported by the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ResourceError {
    pub message: String,
}

impl ResourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A test-case submission.
#[derive(Debug, Clone)]
pub struct RunTestCase {
    pub test_set: TestSetRef,
    pub test_case: TestCase,
    pub manager: Sender<ManagerMessage>,
}

/// Inbound messages.
#[derive(Debug, Clone)]
pub enum RunnerMessage {
    RunTestCase(RunTestCase),
    /// A previously requested resource, fanned out to every waiting case
    CachedResource {
        path: PathBuf,
        bytes: Arc<[u8]>,
    },
    /// A resource fetch failed; every waiting case errors out
    ResourceGetError {
        path: PathBuf,
        error: ResourceError,
    },
}

/// Outbound requests to the resource cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheRequest {
    GetResource { path: PathBuf },
}

/// Outbound messages to the manager. For every accepted submission the
/// manager sees exactly one `RunningTestCase` followed by exactly one
/// `RanTestCase`.
#[derive(Debug)]
pub enum ManagerMessage {
    RunningTestCase {
        test_set: TestSetRef,
        test_case: String,
    },
    RanTestCase {
        test_set: TestSetRef,
        result: TestResult,
    },
}
