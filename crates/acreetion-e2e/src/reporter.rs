//! Per-case results and the aggregated run report.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    /// Case passed
    Passed,
    /// Case failed
    Failed,
    /// Case was not executed (fail-fast stopped the run)
    Skipped,
}

impl TestStatus {
    /// Check if status is passing
    #[must_use]
    pub const fn is_passed(&self) -> bool {
        matches!(self, Self::Passed)
    }

    /// Check if status is failing
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Result of one executed case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Case name
    pub name: String,
    /// Outcome
    pub status: TestStatus,
    /// Wall-clock duration
    pub duration: Duration,
    /// Error message if failed
    pub error: Option<String>,
    /// Failure classification (`timeout`, `mismatch`, `locator-not-found`, ...)
    pub error_kind: Option<String>,
    /// Screenshot captured at failure time, if any
    pub screenshot: Option<PathBuf>,
}

impl CaseResult {
    /// A passing result
    #[must_use]
    pub fn passed(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Passed,
            duration,
            error: None,
            error_kind: None,
            screenshot: None,
        }
    }

    /// A failing result
    #[must_use]
    pub fn failed(name: impl Into<String>, duration: Duration, error: &crate::E2eError) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Failed,
            duration,
            error: Some(error.to_string()),
            error_kind: Some(error.kind().to_string()),
            screenshot: None,
        }
    }

    /// A skipped result
    #[must_use]
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: TestStatus::Skipped,
            duration: Duration::ZERO,
            error: None,
            error_kind: None,
            screenshot: None,
        }
    }

    /// Attach a failure screenshot path
    #[must_use]
    pub fn with_screenshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.screenshot = Some(path.into());
        self
    }
}

/// Aggregated results of a suite run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Individual case results, in completion order
    pub results: Vec<CaseResult>,
    /// Total wall-clock duration of the run
    pub duration: Duration,
}

impl SuiteReport {
    /// Create an empty report
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a case result
    pub fn record(&mut self, result: CaseResult) {
        self.results.push(result);
    }

    /// Whether every executed case passed
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| !r.status.is_failed())
    }

    /// Number of passing cases
    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_passed()).count()
    }

    /// Number of failing cases
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.status.is_failed()).count()
    }

    /// Number of skipped cases
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.status == TestStatus::Skipped)
            .count()
    }

    /// Total recorded cases
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// The failing results
    #[must_use]
    pub fn failures(&self) -> Vec<&CaseResult> {
        self.results.iter().filter(|r| r.status.is_failed()).collect()
    }

    /// Plain-text summary, one line per case plus a totals line
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        for result in &self.results {
            let line = match result.status {
                TestStatus::Passed => {
                    format!("PASS {} ({}ms)\n", result.name, result.duration.as_millis())
                }
                TestStatus::Failed => format!(
                    "FAIL {} ({}ms): {}\n",
                    result.name,
                    result.duration.as_millis(),
                    result.error.as_deref().unwrap_or("unknown error")
                ),
                TestStatus::Skipped => format!("SKIP {}\n", result.name),
            };
            out.push_str(&line);
        }
        out.push_str(&format!(
            "{} passed, {} failed, {} skipped in {}ms\n",
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.duration.as_millis()
        ));
        out
    }
}
