//! The fixed set of suites run against the stock analytics service.
//!
//! Order matters: suites run top to bottom and cases in declaration order, so
//! a trigger (`Update All Symbols`) is always dispatched before the status
//! poll that observes it.

use std::collections::HashSet;

use reqwest::header::{HeaderName, HeaderValue};
use serde_json::json;

use crate::error::HarnessError;
use crate::http::method::HttpMethod;

use super::case::{Expectation, Suite, TestCase};

const ROOT_FIELDS: [&str; 5] = ["service", "version", "status", "timestamp", "endpoints"];

/// Analytics endpoints may legitimately fail with 500 when the service has no
/// price data loaded yet.
const COMPUTED_OR_NO_DATA: [u16; 2] = [200, 500];

pub fn default_catalog() -> Vec<Suite> {
    vec![
        root_suite(),
        health_suite(),
        update_suite(),
        ingestion_suite(),
        analytics_suite(),
        content_type_suite(),
        error_handler_suite(),
    ]
}

fn root_suite() -> Suite {
    Suite {
        name: "root",
        description: "root endpoint",
        cases: vec![
            TestCase::new(
                "Root Endpoint",
                HttpMethod::Get,
                "/",
                Expectation::Schema {
                    status: 200,
                    required_fields: ROOT_FIELDS.to_vec(),
                },
            ),
            TestCase::new("Favicon Endpoint", HttpMethod::Get, "/favicon.ico", Expectation::Status(204)),
        ],
    }
}

fn health_suite() -> Suite {
    Suite {
        name: "health",
        description: "health endpoints",
        cases: vec![
            TestCase::new("Health Check", HttpMethod::Get, "/v1/health", Expectation::Status(200)),
            TestCase::new(
                "Detailed Health Check",
                HttpMethod::Get,
                "/v1/health/detailed",
                Expectation::Status(200),
            ),
        ],
    }
}

fn update_suite() -> Suite {
    Suite {
        name: "updates",
        description: "update endpoints",
        cases: vec![
            // 409 when a previous run's update is still in progress.
            TestCase::new(
                "Update All Symbols",
                HttpMethod::Post,
                "/v1/update_all_symbols",
                Expectation::StatusIn(vec![200, 202, 409]),
            ),
            TestCase::new(
                "Update Status",
                HttpMethod::Get,
                "/v1/update_all_symbols/status",
                Expectation::Status(200),
            ),
        ],
    }
}

fn ingestion_suite() -> Suite {
    Suite {
        name: "ingestion",
        description: "BhavCopy endpoint",
        cases: vec![TestCase::new(
            "BhavCopy Processing",
            HttpMethod::Post,
            "/v1/bhavcopy",
            Expectation::StatusIn(COMPUTED_OR_NO_DATA.to_vec()),
        )],
    }
}

fn analytics_suite() -> Suite {
    let computed = || Expectation::StatusIn(COMPUTED_OR_NO_DATA.to_vec());

    Suite {
        name: "analytics",
        description: "analytics endpoints",
        cases: vec![
            TestCase::new(
                "SMA Nearby - Default Parameters",
                HttpMethod::Post,
                "/v1/analytics/sma-nearby",
                computed(),
            )
            .with_payload(json!({})),
            TestCase::new(
                "SMA Nearby - Custom Parameters",
                HttpMethod::Post,
                "/v1/analytics/sma-nearby",
                computed(),
            )
            .with_payload(json!({"sma_period": 20, "threshold_pct": 1.5})),
            TestCase::new(
                "SMA Nearby - Invalid Parameters",
                HttpMethod::Post,
                "/v1/analytics/sma-nearby",
                Expectation::Rejects(400),
            )
            .with_payload(json!({"sma_period": -1, "threshold_pct": 101})),
            TestCase::new(
                "SMA Database Update - Default",
                HttpMethod::Post,
                "/v1/analytics/smadb",
                computed(),
            )
            .with_payload(json!({})),
            TestCase::new(
                "SMA Database Update - Custom Parameters",
                HttpMethod::Post,
                "/v1/analytics/smadb",
                computed(),
            )
            .with_payload(json!({"sma_period": 50, "threshold_pct": 3.0})),
            TestCase::new(
                "SMA Backfill - Default",
                HttpMethod::Post,
                "/v1/analytics/smadb/backfill",
                computed(),
            )
            .with_payload(json!({})),
            TestCase::new(
                "SMA Backfill - Custom Parameters",
                HttpMethod::Post,
                "/v1/analytics/smadb/backfill",
                computed(),
            )
            .with_payload(json!({"sma_period": 20, "threshold_pct": 2.0, "days": 5})),
            TestCase::new(
                "SMA Backfill - Invalid Days",
                HttpMethod::Post,
                "/v1/analytics/smadb/backfill",
                Expectation::Rejects(400),
            )
            .with_payload(json!({"sma_period": 20, "threshold_pct": 2.0, "days": 10})),
        ],
    }
}

fn content_type_suite() -> Suite {
    Suite {
        name: "content_type",
        description: "invalid content type",
        cases: vec![
            TestCase::new(
                "Invalid Content Type",
                HttpMethod::Post,
                "/v1/analytics/sma-nearby",
                Expectation::Rejects(400),
            )
            .with_payload(json!({"test": "data"}))
            .with_header("Content-Type", "text/plain"),
        ],
    }
}

fn error_handler_suite() -> Suite {
    Suite {
        name: "error_handlers",
        description: "error handlers",
        cases: vec![
            TestCase::new(
                "404 Error Handler",
                HttpMethod::Get,
                "/nonexistent-endpoint",
                Expectation::Rejects(404),
            ),
            TestCase::new("405 Error Handler", HttpMethod::Delete, "/v1/health", Expectation::Rejects(405)),
        ],
    }
}

/// Rejects malformed definitions before anything is dispatched.
pub fn validate(suites: &[Suite]) -> Result<(), HarnessError> {
    if suites.is_empty() {
        return Err(HarnessError::Configuration("catalog has no suites".to_string()));
    }

    let mut names = HashSet::new();
    for suite in suites {
        if suite.cases.is_empty() {
            return Err(HarnessError::Configuration(format!("suite `{}` has no cases", suite.name)));
        }
        for case in &suite.cases {
            if !names.insert(case.name) {
                return Err(HarnessError::Configuration(format!("duplicate case name `{}`", case.name)));
            }
            validate_case(case).map_err(|reason| {
                HarnessError::Configuration(format!("case `{}` in suite `{}`: {reason}", case.name, suite.name))
            })?;
        }
    }

    Ok(())
}

fn validate_case(case: &TestCase) -> Result<(), String> {
    if !case.endpoint.starts_with('/') {
        return Err(format!("endpoint `{}` must start with `/`", case.endpoint));
    }
    if case.payload.is_some() && !case.method.accepts_body() {
        return Err(format!("{} requests cannot carry a payload", case.method));
    }

    match &case.expectation {
        Expectation::StatusIn(allowed) if allowed.is_empty() => {
            return Err("allowed status set is empty".to_string());
        }
        Expectation::Schema { required_fields, .. } if required_fields.is_empty() => {
            return Err("schema expectation lists no required fields".to_string());
        }
        _ => {}
    }

    for (key, value) in &case.header_overrides {
        HeaderName::from_bytes(key.trim().as_bytes()).map_err(|e| format!("invalid header key `{key}`: {e}"))?;
        HeaderValue::from_str(value.trim()).map_err(|e| format!("invalid header value for `{key}`: {e}"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_case_suite(case: TestCase) -> Vec<Suite> {
        vec![Suite {
            name: "probe",
            description: "probe",
            cases: vec![case],
        }]
    }

    fn assert_rejected(suites: &[Suite], fragment: &str) {
        match validate(suites) {
            Err(HarnessError::Configuration(message)) => {
                assert!(message.contains(fragment), "`{message}` should mention `{fragment}`");
            }
            other => panic!("expected configuration fault, got {other:?}"),
        }
    }

    #[test]
    fn default_catalog_is_valid() {
        validate(&default_catalog()).unwrap();
    }

    #[test]
    fn default_catalog_keeps_declaration_order() {
        let suites = default_catalog();
        let suite_names: Vec<_> = suites.iter().map(|suite| suite.name).collect();
        assert_eq!(
            suite_names,
            ["root", "health", "updates", "ingestion", "analytics", "content_type", "error_handlers"]
        );

        let per_suite: Vec<_> = suites.iter().map(|suite| suite.cases.len()).collect();
        assert_eq!(per_suite, [2, 2, 2, 1, 8, 1, 2]);

        let cases: Vec<_> = suites.iter().flat_map(|suite| &suite.cases).collect();
        assert_eq!(cases.len(), per_suite.iter().sum::<usize>());
        assert_eq!(cases.first().map(|case| case.name), Some("Root Endpoint"));
        assert_eq!(cases.last().map(|case| case.name), Some("405 Error Handler"));

        let trigger = cases.iter().position(|case| case.name == "Update All Symbols").unwrap();
        let poll = cases.iter().position(|case| case.name == "Update Status").unwrap();
        assert!(trigger < poll);
    }

    #[test]
    fn invalid_inputs_expect_rejection() {
        let suites = default_catalog();
        let invalid: Vec<_> = suites
            .iter()
            .flat_map(|suite| &suite.cases)
            .filter(|case| case.name.contains("Invalid"))
            .collect();
        assert_eq!(invalid.len(), 3);
        assert!(invalid.iter().all(|case| case.expectation == Expectation::Rejects(400)));
    }

    #[test]
    fn rejects_empty_catalog_and_empty_suite() {
        assert_rejected(&[], "no suites");
        let suites = vec![Suite {
            name: "empty",
            description: "empty",
            cases: Vec::new(),
        }];
        assert_rejected(&suites, "no cases");
    }

    #[test]
    fn rejects_duplicate_names_across_suites() {
        let case = TestCase::new("Health Check", HttpMethod::Get, "/v1/health", Expectation::Status(200));
        let mut suites = single_case_suite(case.clone());
        suites.push(Suite {
            name: "again",
            description: "again",
            cases: vec![case],
        });
        assert_rejected(&suites, "duplicate case name");
    }

    #[test]
    fn rejects_relative_endpoint() {
        let case = TestCase::new("Health", HttpMethod::Get, "v1/health", Expectation::Status(200));
        assert_rejected(&single_case_suite(case), "must start with");
    }

    #[test]
    fn rejects_payload_on_get() {
        let case = TestCase::new("Health", HttpMethod::Get, "/v1/health", Expectation::Status(200))
            .with_payload(json!({"unexpected": true}));
        assert_rejected(&single_case_suite(case), "cannot carry a payload");
    }

    #[test]
    fn rejects_empty_expectations() {
        let case = TestCase::new("Update", HttpMethod::Post, "/v1/update", Expectation::StatusIn(Vec::new()));
        assert_rejected(&single_case_suite(case), "allowed status set is empty");

        let case = TestCase::new(
            "Root",
            HttpMethod::Get,
            "/",
            Expectation::Schema {
                status: 200,
                required_fields: Vec::new(),
            },
        );
        assert_rejected(&single_case_suite(case), "no required fields");
    }

    #[test]
    fn rejects_bad_header_override() {
        let case = TestCase::new("Root", HttpMethod::Get, "/", Expectation::Status(200))
            .with_header("Content Type", "text/plain");
        assert_rejected(&single_case_suite(case), "invalid header key");
    }
}
