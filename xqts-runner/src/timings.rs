//! Accumulation of engine invocation timings across a test-case.

use xqts_engine_traits::Evaluated;

/// Sum of `(compilation, execution)` milliseconds over every engine
/// invocation performed for one test-case, helper queries included.
///
/// A verdict produced before any engine call reports `-1` for both.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingTotals {
    calls: u32,
    compilation_ms: u64,
    execution_ms: u64,
}

impl TimingTotals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, evaluated: &Evaluated) {
        self.calls += 1;
        self.compilation_ms += evaluated.compilation_ms;
        self.execution_ms += evaluated.execution_ms;
    }

    pub fn calls(&self) -> u32 {
        self.calls
    }

    /// `(compilation, execution)` totals, or `(-1, -1)` if no engine call
    /// was made.
    pub fn totals(&self) -> (i64, i64) {
        if self.calls == 0 {
            (-1, -1)
        } else {
            (self.compilation_ms as i64, self.execution_ms as i64)
        }
    }
}
