use std::time::Instant;

use time::OffsetDateTime;

use crate::http::client::HttpClient;
use crate::report::SuiteReport;

use super::case::{Suite, TestCase};
use super::collector::{ExecutionOutcome, ResultCollector};

/// Error text recorded for any case whose request produced no response.
pub const TRANSPORT_FAILURE: &str = "transport failure";

/// Drives one run: suites in order, cases in order, one request at a time.
/// Owns the only collector for the run.
pub struct Runner {
    client: HttpClient,
    collector: ResultCollector,
}

impl Runner {
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            collector: ResultCollector::new(),
        }
    }

    /// Runs every suite and builds the report. A failing case or suite never
    /// stops the run; dropping the returned future discards everything
    /// collected so far.
    pub async fn run(mut self, suites: &[Suite]) -> SuiteReport {
        log::info!("Starting comprehensive API testing...");
        let started = Instant::now();

        for suite in suites {
            self.run_suite(suite).await;
        }

        SuiteReport::from_outcomes(
            self.collector.into_outcomes(),
            started.elapsed(),
            OffsetDateTime::now_utc(),
        )
    }

    /// Runs one suite's cases in order and returns how many of them failed.
    pub async fn run_suite(&mut self, suite: &Suite) -> usize {
        log::info!("Testing {}...", suite.description);
        let start = self.collector.len();
        for case in &suite.cases {
            let outcome = self.execute(case).await;
            log_outcome(&outcome);
            self.collector.record(outcome);
        }

        let suite_failed = self.collector.all()[start..]
            .iter()
            .filter(|outcome| !outcome.success)
            .count();
        let (passed, failed) = self.collector.counts();
        log::debug!(
            "Finished suite `{}`: {suite_failed} of {} failed; {passed} passed, {failed} failed so far",
            suite.name,
            suite.cases.len()
        );
        suite_failed
    }

    pub async fn execute(&self, case: &TestCase) -> ExecutionOutcome {
        match self.client.send(case.request()).await {
            Ok(response) => {
                log::debug!(
                    "{} answered in {} ms: {}",
                    case.name,
                    response.duration_ms,
                    String::from_utf8_lossy(&response.body)
                );
                if let Some(reason) = response.json.invalid_reason() {
                    log::warn!("{} returned a body that is not valid JSON: {reason}", case.name);
                }
                let verdict = case.expectation.evaluate(response.status_code, &response.json);
                ExecutionOutcome::new(
                    case.name,
                    verdict.success,
                    response.status_code,
                    response.json.value().cloned(),
                    verdict.error,
                )
            }
            Err(failure) => {
                log::error!("Request failed for {} {}: {failure}", case.method, case.endpoint);
                ExecutionOutcome::new(case.name, false, 0, None, Some(TRANSPORT_FAILURE.to_string()))
            }
        }
    }
}

fn log_outcome(outcome: &ExecutionOutcome) {
    let status = if outcome.success { "PASS" } else { "FAIL" };
    log::info!("[{status}] {} - Status: {}", outcome.test_name, outcome.status_code);
    if let Some(error) = &outcome.error {
        log::error!("Error: {error}");
    }
}
