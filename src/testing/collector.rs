use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

/// Recorded result of dispatching one test case. Field order is the order
/// written to the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionOutcome {
    pub test_name: String,
    pub success: bool,
    #[serde(rename = "response_code")]
    pub status_code: u16,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub response_data: Option<Value>,
    pub error: Option<String>,
}

impl ExecutionOutcome {
    pub fn new(
        test_name: impl Into<String>,
        success: bool,
        status_code: u16,
        response_data: Option<Value>,
        error: Option<String>,
    ) -> Self {
        Self {
            test_name: test_name.into(),
            success,
            status_code,
            timestamp: OffsetDateTime::now_utc(),
            response_data,
            error,
        }
    }
}

/// Append-only log of outcomes in dispatch order. Owned by a single runner.
#[derive(Debug, Default)]
pub struct ResultCollector {
    outcomes: Vec<ExecutionOutcome>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: ExecutionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn all(&self) -> &[ExecutionOutcome] {
        &self.outcomes
    }

    /// Returns `(passed, failed)`.
    pub fn counts(&self) -> (usize, usize) {
        let passed = self.outcomes.iter().filter(|outcome| outcome.success).count();
        (passed, self.outcomes.len() - passed)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn into_outcomes(self) -> Vec<ExecutionOutcome> {
        self.outcomes
    }
}
