use serde_json::Value;

use super::method::HttpMethod;

/// One outbound call, borrowed from the test case that issues it.
#[derive(Debug, Clone, Copy)]
pub struct RequestInput<'a> {
    pub method: HttpMethod,
    pub endpoint: &'a str,
    pub payload: Option<&'a Value>,
    pub header_overrides: &'a [(String, String)],
}

impl<'a> RequestInput<'a> {
    pub fn new(method: HttpMethod, endpoint: &'a str) -> Self {
        Self {
            method,
            endpoint,
            payload: None,
            header_overrides: &[],
        }
    }
}
