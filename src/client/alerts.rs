//! Failure alert surface.
//!
//! Transport and HTTP-status failures are surfaced to the user through an
//! external alert sink. Delivery happens on its own task, off the failing
//! request's execution context, and is fire-and-forget: the caller still
//! gets the typed error whether or not the alert lands.

use crate::error::ApiError;
use std::sync::Arc;
use tracing::debug;

/// Alert presentation surface. The implementation owns dispatch onto the
/// UI context.
pub trait AlertSink: Send + Sync {
    fn show_failure(&self, title: &str, message: &str);
}

/// Dispatches an alert for the failure if its kind warrants one.
/// Decode failures never alert.
pub(crate) fn dispatch_alert(sink: Option<&Arc<dyn AlertSink>>, error: &ApiError) {
    if !error.should_alert() {
        return;
    }
    let Some(sink) = sink else {
        return;
    };

    let sink = Arc::clone(sink);
    let title = error.alert_title();
    let message = error.to_string();
    debug!("Dispatching failure alert: {title}");
    tokio::spawn(async move {
        sink.show_failure(&title, &message);
    });
}
