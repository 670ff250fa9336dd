use reqwest::StatusCode;
use std::fmt;

use crate::http::TransportFailure;

/// Why an API call did not produce a value.
#[derive(Debug)]
pub enum ApiError {
    /// The exchange failed. Carries the failure exactly as the transport
    /// produced it, after the response interceptors observed it.
    Transport(TransportFailure),
    /// The request payload could not be serialized.
    Encode(serde_json::Error),
    /// A successful response body did not match the expected shape.
    Decode {
        status: StatusCode,
        source: serde_json::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Transport(failure) => failure.status,
            ApiError::Encode(_) => None,
            ApiError::Decode { status, .. } => Some(status.as_u16()),
        }
    }

    pub fn as_transport(&self) -> Option<&TransportFailure> {
        match self {
            ApiError::Transport(failure) => Some(failure),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(failure) => write!(f, "{}", failure),
            ApiError::Encode(e) => write!(f, "Failed to encode request payload: {}", e),
            ApiError::Decode { status, source } => {
                write!(f, "Failed to decode response body (HTTP {}): {}", status, source)
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Transport(failure) => Some(failure),
            ApiError::Encode(e) => Some(e),
            ApiError::Decode { source, .. } => Some(source),
        }
    }
}

impl From<TransportFailure> for ApiError {
    fn from(failure: TransportFailure) -> Self {
        ApiError::Transport(failure)
    }
}
