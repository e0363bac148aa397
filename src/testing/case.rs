use serde_json::Value;

use crate::http::method::HttpMethod;
use crate::http::request::RequestInput;
use crate::http::response::ResponseJson;

/// Rule deciding whether a response counts as a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expectation {
    /// Status must equal the code.
    Status(u16),
    /// Status must be one of the codes; for endpoints whose answer depends
    /// on server state (e.g. 409 while a job is already running).
    StatusIn(Vec<u16>),
    /// Status must match and the JSON body must be an object carrying every
    /// required field.
    Schema {
        status: u16,
        required_fields: Vec<&'static str>,
    },
    /// Negative path: the service must reject the request with exactly this
    /// code.
    Rejects(u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub success: bool,
    pub error: Option<String>,
}

impl Verdict {
    fn pass() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }
}

impl Expectation {
    pub fn evaluate(&self, status_code: u16, body: &ResponseJson) -> Verdict {
        match self {
            Expectation::Status(expected) => {
                if status_code == *expected {
                    Verdict::pass()
                } else {
                    Verdict::fail(format!("expected status {expected}, got {status_code}"))
                }
            }
            Expectation::StatusIn(allowed) => {
                if allowed.contains(&status_code) {
                    Verdict::pass()
                } else {
                    Verdict::fail(format!("expected status in {allowed:?}, got {status_code}"))
                }
            }
            Expectation::Schema {
                status,
                required_fields,
            } => {
                if status_code != *status {
                    return Verdict::fail(format!("expected status {status}, got {status_code}"));
                }
                if let ResponseJson::Invalid(reason) = body {
                    return Verdict::fail(format!("invalid JSON response: {reason}"));
                }

                let object = body.value().and_then(Value::as_object);
                let missing: Vec<&str> = required_fields
                    .iter()
                    .copied()
                    .filter(|field| !object.is_some_and(|object| object.contains_key(*field)))
                    .collect();
                if missing.is_empty() {
                    Verdict::pass()
                } else {
                    Verdict::fail(format!("missing required fields: {}", missing.join(", ")))
                }
            }
            Expectation::Rejects(expected) => {
                if status_code == *expected {
                    Verdict::pass()
                } else {
                    Verdict::fail(format!("expected error status {expected}, got {status_code}"))
                }
            }
        }
    }
}

/// One declared request and the rule its response is judged by.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: &'static str,
    pub method: HttpMethod,
    pub endpoint: &'static str,
    pub payload: Option<Value>,
    pub header_overrides: Vec<(String, String)>,
    pub expectation: Expectation,
}

impl TestCase {
    pub fn new(name: &'static str, method: HttpMethod, endpoint: &'static str, expectation: Expectation) -> Self {
        Self {
            name,
            method,
            endpoint,
            payload: None,
            header_overrides: Vec::new(),
            expectation,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.header_overrides.push((name.to_string(), value.to_string()));
        self
    }

    pub fn request(&self) -> RequestInput<'_> {
        RequestInput {
            payload: self.payload.as_ref(),
            header_overrides: &self.header_overrides,
            ..RequestInput::new(self.method, self.endpoint)
        }
    }
}

/// Ordered group of cases covering one area of the target service.
#[derive(Debug, Clone)]
pub struct Suite {
    pub name: &'static str,
    pub description: &'static str,
    pub cases: Vec<TestCase>,
}
