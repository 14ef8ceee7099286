use tracing::{debug, error, info, warn};

use crate::client_log::entry::LogEntry;
use crate::client_log::level::LogLevel;

/// Where recorded entries are echoed as they happen.
pub trait LogMirror: Send + Sync {
    fn emit(&self, entry: &LogEntry);
}

/// Echoes entries into the process `tracing` subscriber. CRITICAL shares the
/// error channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMirror;

impl LogMirror for TracingMirror {
    fn emit(&self, entry: &LogEntry) {
        let line = entry.formatted();
        let data = entry.data.as_ref().map(|d| d.to_string());
        let data = data.as_deref().unwrap_or("-");

        match entry.level {
            LogLevel::Debug => debug!(target: "client", data, "{}", line),
            LogLevel::Info => info!(target: "client", data, "{}", line),
            LogLevel::Warn => warn!(target: "client", data, "{}", line),
            LogLevel::Error | LogLevel::Critical => error!(target: "client", data, "{}", line),
        }
    }
}
