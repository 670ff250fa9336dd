//! Failure classification: status to treatment, with message extraction.

use std::fmt;

use crate::http::TransportFailure;
use crate::i18n::{Localizer, translate};
use crate::notify::Notification;

/// Shown when a failure carries no usable message at all.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred.";

pub const UNAUTHORIZED_MESSAGE: &str = "Unauthorized. Please log in again.";
pub const FORBIDDEN_MESSAGE: &str = "Forbidden. You don't have access.";
pub const NOT_FOUND_MESSAGE: &str = "Not found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// HTTP 400; user-correctable.
    BadRequest,
    /// HTTP 401
    Unauthorized,
    /// HTTP 403
    Forbidden,
    /// HTTP 404
    NotFound,
    /// Any other status, or no response at all.
    Other,
}

impl ErrorClass {
    pub fn from_status(status: Option<u16>) -> Self {
        match status {
            Some(400) => ErrorClass::BadRequest,
            Some(401) => ErrorClass::Unauthorized,
            Some(403) => ErrorClass::Forbidden,
            Some(404) => ErrorClass::NotFound,
            _ => ErrorClass::Other,
        }
    }

    /// Fixed copy displayed instead of the server's message, if any.
    pub fn fixed_message(self) -> Option<&'static str> {
        match self {
            ErrorClass::Unauthorized => Some(UNAUTHORIZED_MESSAGE),
            ErrorClass::Forbidden => Some(FORBIDDEN_MESSAGE),
            ErrorClass::NotFound => Some(NOT_FOUND_MESSAGE),
            ErrorClass::BadRequest | ErrorClass::Other => None,
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorClass::BadRequest => "bad request",
            ErrorClass::Unauthorized => "unauthorized",
            ErrorClass::Forbidden => "forbidden",
            ErrorClass::NotFound => "not found",
            ErrorClass::Other => "other",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub class: ErrorClass,
    /// The message extracted from the failure. For 401/403/404 this is not
    /// the text shown to the user.
    pub message: String,
    pub notification: Notification,
}

/// First non-empty of `data.message`, `data.detail`, the failure's own
/// message, else [`FALLBACK_MESSAGE`].
pub fn extract_message(failure: &TransportFailure) -> String {
    let data = failure.data.as_ref();
    [
        data.and_then(|d| d.message.as_deref()),
        data.and_then(|d| d.detail.as_deref()),
        Some(failure.message.as_str()),
    ]
    .into_iter()
    .flatten()
    .find(|candidate| !candidate.is_empty())
    .unwrap_or(FALLBACK_MESSAGE)
    .to_string()
}

/// Decides how a failure is presented, without presenting it.
pub fn classify(failure: &TransportFailure, localizer: &dyn Localizer) -> Classification {
    let class = ErrorClass::from_status(failure.status);
    let message = extract_message(failure);

    let notification = match class {
        ErrorClass::BadRequest => Notification::warning(message.clone()),
        ErrorClass::Other => Notification::error(translate(localizer, &message)),
        fixed => Notification::error(translate(
            localizer,
            fixed.fixed_message().unwrap_or(FALLBACK_MESSAGE),
        )),
    };

    Classification {
        class,
        message,
        notification,
    }
}
