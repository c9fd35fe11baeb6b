use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

/// User-facing message sink (toasts in the dashboard).
pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

/// Writes notifications to the log. Used when no UI is attached.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success | Severity::Info => info!(target: "schedule_view::notify", "{}", message),
            Severity::Warning => warn!(target: "schedule_view::notify", "{}", message),
            Severity::Error => error!(target: "schedule_view::notify", "{}", message),
        }
    }
}
