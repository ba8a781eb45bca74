//! Verdicts produced by running a test-case.

use crate::catalog::TestCaseId;
use crate::error::RunnerError;

/// Outcome of a test-case run.
#[derive(Debug)]
pub enum TestOutcome {
    /// The assertion tree held
    Pass,
    /// The assertion tree did not hold
    Failure { reason: String },
    /// Something went wrong before or while checking
    Error { cause: RunnerError },
    /// An earlier stage decided the test does not apply to this engine.
    /// Never produced by the runner core itself.
    AssumptionFailed { reason: String },
}

impl TestOutcome {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestOutcome::Pass)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestOutcome::Failure { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, TestOutcome::Error { .. })
    }

    pub fn is_assumption_failed(&self) -> bool {
        matches!(self, TestOutcome::AssumptionFailed { .. })
    }
}

/// Result of running a single test-case. Timings are the sum over every
/// engine invocation the case performed, helper queries included; `-1` for
/// both means no engine call happened.
#[derive(Debug)]
pub struct TestResult {
    pub test_set: String,
    pub test_case: String,
    pub compilation_ms: i64,
    pub execution_ms: i64,
    pub outcome: TestOutcome,
}

impl TestResult {
    fn new(id: &TestCaseId, outcome: TestOutcome, compilation_ms: i64, execution_ms: i64) -> Self {
        Self {
            test_set: id.test_set.clone(),
            test_case: id.test_case.clone(),
            compilation_ms,
            execution_ms,
            outcome,
        }
    }

    pub fn pass(id: &TestCaseId, compilation_ms: i64, execution_ms: i64) -> Self {
        Self::new(id, TestOutcome::Pass, compilation_ms, execution_ms)
    }

    pub fn failure(
        id: &TestCaseId,
        reason: impl Into<String>,
        compilation_ms: i64,
        execution_ms: i64,
    ) -> Self {
        Self::new(
            id,
            TestOutcome::Failure {
                reason: reason.into(),
            },
            compilation_ms,
            execution_ms,
        )
    }

    pub fn error(
        id: &TestCaseId,
        cause: RunnerError,
        compilation_ms: i64,
        execution_ms: i64,
    ) -> Self {
        Self::new(
            id,
            TestOutcome::Error { cause },
            compilation_ms,
            execution_ms,
        )
    }

    pub fn assumption_failed(
        id: &TestCaseId,
        reason: impl Into<String>,
        compilation_ms: i64,
        execution_ms: i64,
    ) -> Self {
        Self::new(
            id,
            TestOutcome::AssumptionFailed {
                reason: reason.into(),
            },
            compilation_ms,
            execution_ms,
        )
    }

    pub fn id(&self) -> TestCaseId {
        TestCaseId::new(self.test_set.clone(), self.test_case.clone())
    }
}
