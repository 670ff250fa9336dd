use log::debug;

use super::ResponseInterceptor;
use crate::error::ErrorHandler;
use crate::http::TransportFailure;

/// Hands every failure to the error handler when a user is there to see
/// the notification. Successes pass through untouched.
#[derive(Clone)]
pub struct ErrorReporter {
    handler: ErrorHandler,
    interactive: bool,
}

impl ErrorReporter {
    pub fn new(handler: ErrorHandler, interactive: bool) -> Self {
        Self {
            handler,
            interactive,
        }
    }
}

impl ResponseInterceptor for ErrorReporter {
    fn on_failure(&self, failure: &TransportFailure) {
        if !self.interactive {
            debug!("Not reporting failure in non-interactive context: {}", failure);
            return;
        }
        self.handler.handle(failure);
    }
}
