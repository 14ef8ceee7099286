use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::error;

use crate::client_log::entry::LogEntry;

pub const COLLECTOR_PATH: &str = "/api/v1/logs/client";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("collector rejected log entry (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("failed to reach collector: {0}")]
    Transport(String),
    #[error("failed to encode log entry: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Sends a single entry to wherever error reports are collected.
pub trait LogTransport: Send + Sync {
    fn deliver(&self, entry: &LogEntry) -> Result<(), DeliveryError>;
}

/// Posts entries as JSON to the backend's client log collector.
#[derive(Debug)]
pub struct CollectorTransport {
    endpoint: String,
    agent: ureq::Agent,
}

impl CollectorTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl LogTransport for CollectorTransport {
    fn deliver(&self, entry: &LogEntry) -> Result<(), DeliveryError> {
        let body = serde_json::to_string(entry)?;
        match self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_string(&body)
        {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(status, response)) => Err(DeliveryError::Rejected {
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(e) => Err(DeliveryError::Transport(e.to_string())),
        }
    }
}

/// Hands the entry to `transport` on a detached thread. The outcome is only
/// ever written to the process log; nothing is retried or re-logged through
/// the client logger.
pub(crate) fn dispatch(transport: Arc<dyn LogTransport>, entry: LogEntry) {
    let spawned = std::thread::Builder::new()
        .name("client-log-delivery".to_string())
        .spawn(move || {
            if let Err(e) = transport.deliver(&entry) {
                error!(
                    error = %e,
                    session_id = entry.session_id,
                    "Failed to send log to server"
                );
            }
        });

    if let Err(e) = spawned {
        error!(error = %e, "Failed to start log delivery thread");
    }
}
