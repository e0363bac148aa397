use std::fmt::{self, Display};
use std::path::PathBuf;

use thiserror::Error;

/// Faults that end an invocation. Per-case problems never surface here; the
/// runner turns them into failed outcomes instead.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Invalid test catalog: {0}")]
    Configuration(String),

    #[error("Run interrupted by operator")]
    Interrupted,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to write report `{}`: {reason}", .path.display())]
    Report { path: PathBuf, reason: String },
}

impl HarnessError {
    pub fn exit_code(&self) -> u8 {
        match self {
            HarnessError::Interrupted => 130,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Dns,
    Connect,
    Read,
    Request,
}

impl Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransportErrorKind::Timeout => "TIMEOUT",
            TransportErrorKind::Dns => "DNS_ERROR",
            TransportErrorKind::Connect => "CONNECT_ERROR",
            TransportErrorKind::Read => "READ_ERROR",
            TransportErrorKind::Request => "REQUEST_ERROR",
        };
        write!(f, "{label}")
    }
}

/// A request that never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {reason}")]
pub struct TransportFailure {
    pub kind: TransportErrorKind,
    pub reason: String,
}

impl TransportFailure {
    pub fn new(kind: TransportErrorKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        Self {
            kind: classify_reqwest_error(err),
            reason: err.to_string(),
        }
    }
}

fn classify_reqwest_error(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        return TransportErrorKind::Timeout;
    }

    if caused_by_dns(err) {
        return TransportErrorKind::Dns;
    }
    if err.is_connect() {
        return TransportErrorKind::Connect;
    }
    if err.is_builder() {
        return TransportErrorKind::Request;
    }

    TransportErrorKind::Read
}

/// Walks the source chain only; the top-level message carries the request
/// URL, which may itself contain "dns".
fn caused_by_dns(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        let message = cause.to_string().to_ascii_lowercase();
        if message.contains("dns error") || message.contains("failed to lookup address") {
            return true;
        }
        source = cause.source();
    }
    false
}
