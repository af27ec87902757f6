//! Terminal presentation
//!
//! Notifier and presentation sink that write to stdout.

use clipwatch_core::{JobId, Severity};
use clipwatch_watcher::{Notifier, Presentation, PresentationSink};
use colored::*;

fn paint(text: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Info => text.cyan(),
        Severity::Success => text.green(),
        Severity::Warning => text.yellow(),
        Severity::Danger => text.red(),
    }
}

/// Prints notices as `[severity] message`
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        let tag = format!("[{}]", severity);
        println!("{} {}", paint(&tag, severity).bold(), message);
    }
}

/// Prints one status line per rendered presentation
pub struct ConsolePresenter;

impl PresentationSink for ConsolePresenter {
    fn render(&self, id: &JobId, presentation: &Presentation) {
        let marker = if presentation.busy { "…" } else { "•" };
        println!(
            "  {} {} {}",
            marker,
            format!("job {}", id).bold(),
            paint(&presentation.label, presentation.tone)
        );
    }
}
