//! User notification seam

use clipwatch_core::Severity;

/// Presents a transient message to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}

/// A message waiting to be shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    /// Hands the notice to a notifier
    pub fn send(&self, notifier: &dyn Notifier) {
        notifier.notify(&self.message, self.severity);
    }
}
