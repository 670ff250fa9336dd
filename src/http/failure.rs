use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Error payload conventionally returned by the API: `{message?, detail?}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// Picks `message` and `detail` out of a response body. Fields that are
    /// not strings are ignored; a body with neither yields `None`.
    pub fn from_value(body: &Value) -> Option<Self> {
        let field = |name: &str| body.get(name).and_then(Value::as_str).map(str::to_string);
        let parsed = Self {
            message: field("message"),
            detail: field("detail"),
        };
        if parsed.message.is_none() && parsed.detail.is_none() {
            None
        } else {
            Some(parsed)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No response was received (DNS, refused connection, timeout).
    Network,
    /// The server answered with a non-2xx status.
    Status,
    /// The request could not be built (bad URL, header or form).
    Request,
}

/// A failed exchange with the server.
///
/// Observed by response interceptors, then handed back to the caller
/// unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportFailure {
    pub kind: FailureKind,
    /// Absent when no response was received.
    pub status: Option<u16>,
    pub data: Option<ErrorBody>,
    pub message: String,
}

impl TransportFailure {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Network,
            status: None,
            data: None,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Request,
            status: None,
            data: None,
            message: message.into(),
        }
    }

    pub fn from_status(status: u16, body: &Value) -> Self {
        Self {
            kind: FailureKind::Status,
            status: Some(status),
            data: ErrorBody::from_value(body),
            message: format!("Request failed with status code {}", status),
        }
    }

    pub fn with_data(mut self, data: ErrorBody) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_network(&self) -> bool {
        self.kind == FailureKind::Network
    }
}

impl fmt::Display for TransportFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TransportFailure {}
