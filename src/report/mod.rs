//! # Run Report
//!
//! Summary statistics over one run's outcomes, the console summary, and the
//! machine-readable snapshot persisted by `storage::save_report`.

use std::time::Duration;

use serde::Serialize;
use time::OffsetDateTime;

use crate::testing::collector::ExecutionOutcome;

const BANNER_WIDTH: usize = 80;

#[derive(Debug, Clone, PartialEq)]
pub struct SuiteReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage in `0.0..=100.0`; zero for an empty run.
    pub success_rate: f64,
    pub elapsed_seconds: f64,
    pub generated_at: OffsetDateTime,
    pub results: Vec<ExecutionOutcome>,
}

impl SuiteReport {
    pub fn from_outcomes(results: Vec<ExecutionOutcome>, elapsed: Duration, generated_at: OffsetDateTime) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|outcome| outcome.success).count();
        let failed = total - passed;
        let success_rate = if total == 0 {
            0.0
        } else {
            passed as f64 / total as f64 * 100.0
        };

        Self {
            total,
            passed,
            failed,
            success_rate,
            elapsed_seconds: elapsed.as_secs_f64(),
            generated_at,
            results,
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExecutionOutcome> {
        self.results.iter().filter(|outcome| !outcome.success)
    }

    pub fn passes(&self) -> impl Iterator<Item = &ExecutionOutcome> {
        self.results.iter().filter(|outcome| outcome.success)
    }

    /// Human-readable summary: totals, then failed cases with their error
    /// text, then passed cases.
    pub fn summary_lines(&self) -> Vec<String> {
        let banner = "=".repeat(BANNER_WIDTH);
        let rule = "-".repeat(BANNER_WIDTH / 2);
        let mut lines = vec![
            banner.clone(),
            "TEST EXECUTION SUMMARY".to_string(),
            banner.clone(),
            format!("Total Tests: {}", self.total),
            format!("Passed: {}", self.passed),
            format!("Failed: {}", self.failed),
            format!("Success Rate: {:.1}%", self.success_rate),
            format!("Total Execution Time: {:.2}s", self.elapsed_seconds),
            banner,
        ];

        if self.failed > 0 {
            lines.push("FAILED TESTS:".to_string());
            lines.push(rule.clone());
            for outcome in self.failures() {
                lines.push(format!("[FAIL] {} (Status: {})", outcome.test_name, outcome.status_code));
                if let Some(error) = &outcome.error {
                    lines.push(format!("   Error: {error}"));
                }
            }
        }

        lines.push("PASSED TESTS:".to_string());
        lines.push(rule);
        for outcome in self.passes() {
            lines.push(format!("[PASS] {} (Status: {})", outcome.test_name, outcome.status_code));
        }

        lines
    }

    pub fn log_summary(&self) {
        for line in self.summary_lines() {
            log::info!("{line}");
        }
    }

    pub fn snapshot(&self) -> ReportSnapshot<'_> {
        ReportSnapshot {
            summary: ReportSummary {
                total_tests: self.total,
                passed: self.passed,
                failed: self.failed,
                success_rate: round_to_2(self.success_rate),
                execution_time: round_to_2(self.elapsed_seconds),
                timestamp: self.generated_at,
            },
            detailed_results: &self.results,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportSnapshot<'a> {
    pub summary: ReportSummary,
    pub detailed_results: &'a [ExecutionOutcome],
}

#[derive(Debug, Serialize)]
pub struct ReportSummary {
    pub total_tests: usize,
    pub passed: usize,
    pub failed: usize,
    pub success_rate: f64,
    pub execution_time: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

fn round_to_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
