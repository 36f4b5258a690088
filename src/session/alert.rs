//! User-facing blocking alerts.
use parking_lot::Mutex;
use tracing::warn;

/// Where the session sends messages the user has to act on
/// (install a wallet, switch network).
pub trait AlertSink: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes alerts to stderr so they stay visible next to the rendered page.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleAlert;

impl AlertSink for ConsoleAlert {
    fn alert(&self, message: &str) {
        warn!(target: "alert", message = %message, "user alert raised");
        eprintln!("alert: {}", message);
    }
}

/// Keeps every alert in memory.
#[derive(Debug, Default)]
pub struct RecordingAlerts {
    messages: Mutex<Vec<String>>,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }
}

impl AlertSink for RecordingAlerts {
    fn alert(&self, message: &str) {
        warn!(target: "alert", message = %message, "user alert raised");
        self.messages.lock().push(message.to_string());
    }
}
