use crate::domain::ports::Notifier;
use crate::domain::verification::{Notification, Severity};
use std::io::Write;
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

/// Writes notifications to a terminal stream, one line each.
pub struct ConsoleNotifier<W: Write + Send> {
    out: Mutex<W>,
}

impl<W: Write + Send> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConsoleNotifier<std::io::Stdout> {
    /// Notifications interleaved with the rendered text view.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl ConsoleNotifier<std::io::Stderr> {
    /// Keeps stdout free for machine-readable output.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write + Send> Notifier for ConsoleNotifier<W> {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Destructive => warn!(title = %notification.title, "Notifying user"),
            _ => info!(title = %notification.title, "Notifying user"),
        }

        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = writeln!(out, "{notification}").and_then(|()| out.flush()) {
            warn!(error = %e, "Could not write notification");
        }
    }
}
