use serde_json::Value;

/// Outcome of attempting to read the response body as JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseJson {
    Empty,
    Parsed(Value),
    Invalid(String),
}

impl ResponseJson {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return ResponseJson::Empty;
        }
        match serde_json::from_slice(bytes) {
            Ok(value) => ResponseJson::Parsed(value),
            Err(err) => ResponseJson::Invalid(err.to_string()),
        }
    }

    pub fn value(&self) -> Option<&Value> {
        match self {
            ResponseJson::Parsed(value) => Some(value),
            ResponseJson::Empty | ResponseJson::Invalid(_) => None,
        }
    }

    pub fn invalid_reason(&self) -> Option<&str> {
        match self {
            ResponseJson::Invalid(reason) => Some(reason),
            ResponseJson::Empty | ResponseJson::Parsed(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub duration_ms: u128,
    pub body: Vec<u8>,
    pub json: ResponseJson,
}
