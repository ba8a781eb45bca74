//! Compliance report generation over collected verdicts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::verdict::{TestOutcome, TestResult};

/// Summary of a batch of test-case verdicts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub assumptions_failed: usize,
    pub pass_rate: f64,
}

impl ComplianceSummary {
    pub fn from_results(results: &[TestResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.outcome.is_pass()).count();
        let failed = results.iter().filter(|r| r.outcome.is_failure()).count();
        let errors = results.iter().filter(|r| r.outcome.is_error()).count();
        let assumptions_failed = results
            .iter()
            .filter(|r| r.outcome.is_assumption_failed())
            .count();

        let applicable = total - assumptions_failed;
        let pass_rate = if applicable > 0 {
            (passed as f64 / applicable as f64) * 100.0
        } else {
            0.0
        };

        Self {
            total,
            passed,
            failed,
            errors,
            assumptions_failed,
            pass_rate,
        }
    }
}

/// A compliance report for one engine over one suite run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceReport {
    pub engine: String,
    pub timestamp: DateTime<Utc>,
    pub suite: String,
    pub summary: ComplianceSummary,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub results: Vec<DetailedTestResult>,
}

/// Flattened test result for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedTestResult {
    pub test_set: String,
    pub test_case: String,
    pub outcome: String,
    pub message: Option<String>,
    pub compilation_ms: i64,
    pub execution_ms: i64,
}

impl From<&TestResult> for DetailedTestResult {
    fn from(result: &TestResult) -> Self {
        let (outcome, message) = match &result.outcome {
            TestOutcome::Pass => ("pass".to_string(), None),
            TestOutcome::Failure { reason } => ("failure".to_string(), Some(reason.clone())),
            TestOutcome::Error { cause } => ("error".to_string(), Some(cause.to_string())),
            TestOutcome::AssumptionFailed { reason } => {
                ("assumption-failed".to_string(), Some(reason.clone()))
            }
        };

        Self {
            test_set: result.test_set.clone(),
            test_case: result.test_case.clone(),
            outcome,
            message,
            compilation_ms: result.compilation_ms,
            execution_ms: result.execution_ms,
        }
    }
}

impl ComplianceReport {
    pub fn new(engine: &str, suite: &str, results: &[TestResult]) -> Self {
        let summary = ComplianceSummary::from_results(results);
        let detailed = results.iter().map(DetailedTestResult::from).collect();

        Self {
            engine: engine.to_string(),
            timestamp: Utc::now(),
            suite: suite.to_string(),
            summary,
            results: detailed,
        }
    }

    /// Generate a markdown report
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# {} Compliance Report\n\n", self.engine));
        md.push_str(&format!("**Suite:** {}\n", self.suite));
        md.push_str(&format!(
            "**Date:** {}\n\n",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        md.push_str("## Summary\n\n");
        md.push_str("| Metric | Count |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!("| Total | {} |\n", self.summary.total));
        md.push_str(&format!("| Passed | {} |\n", self.summary.passed));
        md.push_str(&format!("| Failed | {} |\n", self.summary.failed));
        md.push_str(&format!("| Errors | {} |\n", self.summary.errors));
        md.push_str(&format!(
            "| Assumptions failed | {} |\n",
            self.summary.assumptions_failed
        ));
        md.push_str(&format!(
            "| **Pass Rate** | **{:.2}%** |\n\n",
            self.summary.pass_rate
        ));

        let unhappy: Vec<_> = self
            .results
            .iter()
            .filter(|r| r.outcome == "failure" || r.outcome == "error")
            .collect();
        if !unhappy.is_empty() {
            md.push_str("## Failed Tests\n\n");
            md.push_str("| Test Set | Test Case | Outcome | Message |\n");
            md.push_str("|----------|-----------|---------|--------|\n");
            for r in unhappy.iter().take(100) {
                md.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    r.test_set,
                    r.test_case,
                    r.outcome,
                    r.message
                        .as_deref()
                        .unwrap_or("-")
                        .chars()
                        .take(50)
                        .collect::<String>()
                ));
            }
            if unhappy.len() > 100 {
                md.push_str(&format!(
                    "\n... and {} more failed tests\n",
                    unhappy.len() - 100
                ));
            }
        }

        md
    }

    /// Generate a JSON report
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Generate a CSV report with all test results
    pub fn to_csv(&self) -> String {
        let mut csv = String::new();
        csv.push_str("test_set,test_case,outcome,message,compilation_ms,execution_ms\n");
        for r in &self.results {
            let msg = r.message.as_deref().unwrap_or("").replace('"', "\"\"");
            csv.push_str(&format!(
                "{},{},{},\"{}\",{},{}\n",
                r.test_set, r.test_case, r.outcome, msg, r.compilation_ms, r.execution_ms
            ));
        }
        csv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TestCaseId;
    use crate::error::RunnerError;

    fn results() -> Vec<TestResult> {
        let id = |name: &str| TestCaseId::new("set", name);
        vec![
            TestResult::pass(&id("a"), 1, 2),
            TestResult::failure(&id("b"), "wrong", 1, 2),
            TestResult::error(&id("c"), RunnerError::InvalidTestCase, -1, -1),
            TestResult::assumption_failed(&id("d"), "feature missing", -1, -1),
        ]
    }

    #[test]
    fn summary_counts_outcomes() {
        let summary = ComplianceSummary::from_results(&results());
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.assumptions_failed, 1);
        assert!((summary.pass_rate - 100.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn markdown_lists_unhappy_cases() {
        let report = ComplianceReport::new("scripted", "xqts", &results());
        let md = report.to_markdown();
        assert!(md.contains("| Total | 4 |"));
        assert!(md.contains("| b | failure | wrong |"));
        assert!(md.contains("Invalid Test Case"));
    }

    #[test]
    fn csv_has_one_row_per_result() {
        let report = ComplianceReport::new("scripted", "xqts", &results());
        assert_eq!(report.to_csv().lines().count(), 5);
    }
}
