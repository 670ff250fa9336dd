//! User-facing notification sinks.

use log::{error, warn};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Warning,
    Error,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationKind::Warning => write!(f, "warning"),
            NotificationKind::Error => write!(f, "error"),
        }
    }
}

/// A message shown to the user once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub text: String,
}

impl Notification {
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            text: text.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.text)
    }
}

/// Fire-and-forget sink for notifications.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NotificationKind, text: &str);
}

/// Routes notifications into the logger.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationKind, text: &str) {
        match kind {
            NotificationKind::Warning => warn!("{}", text),
            NotificationKind::Error => error!("{}", text),
        }
    }
}

/// Prints notifications to stderr, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, kind: NotificationKind, text: &str) {
        eprintln!("{}", Notification { kind, text: text.to_string() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_display() {
        assert_eq!(Notification::warning("Check input").to_string(), "warning: Check input");
        assert_eq!(Notification::error("Not found.").to_string(), "error: Not found.");
    }

    #[test]
    fn test_notification_serializes_lowercase_kind() {
        let json = serde_json::to_value(Notification::warning("x")).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "warning", "text": "x"}));
    }

    #[test_log::test]
    fn test_log_notifier_does_not_panic() {
        LogNotifier.notify(NotificationKind::Warning, "careful");
        LogNotifier.notify(NotificationKind::Error, "broken");
    }
}
