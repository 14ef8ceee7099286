use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client_log::level::LogLevel;

/// One recorded client log line. Serialized as the collector's JSON body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub data: Option<Value>,
    pub context: Option<String>,
    pub session_id: String,
    pub uptime: f64,
}

impl LogEntry {
    /// Console line: `[ts] [LEVEL] [+uptime s] [context] message`.
    pub fn formatted(&self) -> String {
        let mut line = format!(
            "[{}] [{}] [+{:.3}s]",
            self.timestamp, self.level, self.uptime
        );
        if let Some(context) = &self.context {
            line.push_str(&format!(" [{}]", context));
        }
        line.push(' ');
        line.push_str(&self.message);
        line
    }
}
