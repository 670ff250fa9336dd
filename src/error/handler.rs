use log::debug;
use std::sync::Arc;

use super::classify::classify;
use crate::http::TransportFailure;
use crate::i18n::Localizer;
use crate::notify::Notifier;

/// Presents failures to the user: classify, notify once, return the
/// extracted message.
#[derive(Clone)]
pub struct ErrorHandler {
    notifier: Arc<dyn Notifier>,
    localizer: Arc<dyn Localizer>,
}

impl ErrorHandler {
    pub fn new(notifier: Arc<dyn Notifier>, localizer: Arc<dyn Localizer>) -> Self {
        Self {
            notifier,
            localizer,
        }
    }

    #[tracing::instrument(skip(self, failure), fields(status = ?failure.status))]
    pub fn handle(&self, failure: &TransportFailure) -> String {
        let classification = classify(failure, self.localizer.as_ref());
        debug!(
            "Classified failure as {}: {}",
            classification.class, classification.message
        );
        self.notifier.notify(
            classification.notification.kind,
            &classification.notification.text,
        );
        classification.message
    }
}
