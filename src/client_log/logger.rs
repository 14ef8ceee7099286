use std::fmt::Display;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client_log::buffer::LogBuffer;
use crate::client_log::entry::LogEntry;
use crate::client_log::level::LogLevel;
use crate::client_log::mirror::{LogMirror, TracingMirror};
use crate::client_log::session::Session;
use crate::client_log::transport::{self, CollectorTransport, LogTransport};
use crate::config::{AppConfig, Environment};
use crate::util::dates;

const BANNER_RULE_WIDTH: usize = 80;
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Snapshot of the current session and its buffered history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogExport {
    pub session_id: String,
    pub start_time: String,
    pub end_time: String,
    pub duration: f64,
    pub user_agent: String,
    pub logs: Vec<LogEntry>,
}

struct LoggerState {
    threshold: LogLevel,
    buffer: LogBuffer,
}

/// Session-scoped client logger.
///
/// Entries at or above the threshold are kept in a bounded history, echoed
/// through the [`LogMirror`], and, when a transport is attached, ERROR and
/// CRITICAL entries are forwarded to the collector without blocking the
/// caller. Constructed once at startup and shared as `Arc<ClientLogger>`.
pub struct ClientLogger {
    session: Session,
    environment: Environment,
    user_agent: String,
    state: Mutex<LoggerState>,
    mirror: Box<dyn LogMirror>,
    transport: Option<Arc<dyn LogTransport>>,
}

impl std::fmt::Debug for ClientLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientLogger")
            .field("session_id", &self.session.id())
            .field("environment", &self.environment)
            .field("remote", &self.transport.is_some())
            .finish()
    }
}

impl ClientLogger {
    pub fn new(threshold: LogLevel, capacity: usize) -> Self {
        Self {
            session: Session::start(),
            environment: Environment::Development,
            user_agent: default_user_agent(),
            state: Mutex::new(LoggerState {
                threshold,
                buffer: LogBuffer::with_capacity(capacity),
            }),
            mirror: Box::new(TracingMirror),
            transport: None,
        }
    }

    /// Builds the logger described by the config. Remote delivery is only
    /// attached outside development.
    pub fn from_config(config: &AppConfig) -> Self {
        let threshold = config.log.client_threshold;
        let logger = Self::new(threshold, config.log.buffer_capacity).with_environment(config.environment);

        if config.environment.is_development() {
            return logger;
        }

        logger.with_transport(Arc::new(CollectorTransport::new(
            config.log.collector_endpoint.clone(),
            DELIVERY_TIMEOUT,
        )))
    }

    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn LogTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_mirror(mut self, mirror: impl LogMirror + 'static) -> Self {
        self.mirror = Box::new(mirror);
        self
    }

    pub fn session_id(&self) -> &str {
        self.session.id()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn threshold(&self) -> LogLevel {
        self.state().threshold
    }

    pub fn len(&self) -> usize {
        self.state().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state().buffer.is_empty()
    }

    fn state(&self) -> MutexGuard<'_, LoggerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Startup banner written once during bootstrap.
    pub fn announce_start(&self) {
        let rule = "=".repeat(BANNER_RULE_WIDTH);
        self.info(rule.clone());
        self.info("CROWNBORN LEADERBOARD - CLIENT STARTING");
        self.info(format!("Session ID: {}", self.session.id()));
        self.info(format!("Environment: {}", self.environment.name()));
        self.info(format!("User Agent: {}", self.user_agent));
        self.info(rule);
    }

    pub fn set_level(&self, threshold: LogLevel) {
        self.state().threshold = threshold;
        self.info(format!("Log level set to: {}", threshold));
    }

    pub fn log(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        data: Option<Value>,
        context: Option<&str>,
    ) {
        self.record(level, message.into(), data, context, true);
    }

    fn record(
        &self,
        level: LogLevel,
        message: String,
        data: Option<Value>,
        context: Option<&str>,
        buffered: bool,
    ) {
        let entry = {
            let mut state = self.state();
            if level < state.threshold {
                return;
            }

            let entry = LogEntry {
                timestamp: dates::now_iso_millis(),
                level,
                message,
                data,
                context: context.map(String::from),
                session_id: self.session.id().to_string(),
                uptime: self.session.uptime_secs(),
            };
            if buffered {
                state.buffer.push(entry.clone());
            }
            entry
        };

        self.mirror.emit(&entry);

        if level.is_reportable() {
            if let Some(transport) = &self.transport {
                transport::dispatch(Arc::clone(transport), entry);
            }
        }
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message, None, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message, None, None);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(LogLevel::Warn, message, None, None);
    }

    pub fn error(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(LogLevel::Error, message, data, None);
    }

    pub fn critical(&self, message: impl Into<String>, data: Option<Value>) {
        self.log(LogLevel::Critical, message, data, None);
    }

    pub fn log_user_action(&self, action: &str, details: Value) {
        self.log(
            LogLevel::Info,
            format!("USER_ACTION: {}", action),
            Some(details),
            Some("UserAction"),
        );
    }

    pub fn log_api_request(&self, method: &str, url: &str, request_data: Option<Value>) {
        self.log(
            LogLevel::Debug,
            format!("API_REQUEST: {} {}", method, url),
            request_data,
            Some("API"),
        );
    }

    pub fn log_api_response(
        &self,
        method: &str,
        url: &str,
        status: u16,
        response_data: Option<Value>,
        duration_ms: u128,
    ) {
        let level = match status {
            200..=299 => LogLevel::Info,
            400..=u16::MAX => LogLevel::Error,
            _ => LogLevel::Warn,
        };
        self.log(
            level,
            format!("API_RESPONSE: {} {} -> {} ({}ms)", method, url, status, duration_ms),
            response_data,
            Some("API"),
        );
    }

    pub fn log_api_error(
        &self,
        method: &str,
        url: &str,
        error: &(dyn std::error::Error + 'static),
        response: Option<Value>,
    ) {
        let mut causes = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        self.log(
            LogLevel::Error,
            format!("API_ERROR: {} {}", method, url),
            Some(json!({
                "message": error.to_string(),
                "causes": causes,
                "response": response,
            })),
            Some("API"),
        );
    }

    pub fn log_performance(&self, metric: &str, value: impl Display, unit: &str) {
        self.log(
            LogLevel::Debug,
            format!("PERFORMANCE: {} = {}{}", metric, value, unit),
            None,
            Some("Performance"),
        );
    }

    pub fn log_navigation(&self, from: &str, to: &str) {
        self.log(
            LogLevel::Info,
            format!("NAVIGATION: {} -> {}", from, to),
            None,
            Some("Navigation"),
        );
    }

    pub fn log_component_mount(&self, component: &str) {
        self.log(
            LogLevel::Debug,
            format!("COMPONENT_MOUNT: {}", component),
            None,
            Some("Component"),
        );
    }

    pub fn log_component_unmount(&self, component: &str) {
        self.log(
            LogLevel::Debug,
            format!("COMPONENT_UNMOUNT: {}", component),
            None,
            Some("Component"),
        );
    }

    pub fn export_logs(&self) -> LogExport {
        let logs = self.state().buffer.snapshot();
        LogExport {
            session_id: self.session.id().to_string(),
            start_time: dates::iso_millis(self.session.started_at()),
            end_time: dates::iso_millis(Utc::now()),
            duration: self.session.uptime_secs(),
            user_agent: self.user_agent.clone(),
            logs,
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.export_logs())
    }

    /// Writes the export to `crownborn_logs_<session>.json` under `dir`.
    pub fn download_logs(&self, dir: &Path) -> io::Result<PathBuf> {
        let json = self.export_json().map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        let path = dir.join(format!("crownborn_logs_{}.json", self.session.id()));
        fs::write(&path, json)?;

        self.log(
            LogLevel::Info,
            "Logs downloaded",
            Some(json!({ "path": path.display().to_string() })),
            None,
        );
        Ok(path)
    }

    pub fn recent_logs(&self, count: usize) -> Vec<LogEntry> {
        self.state().buffer.recent(count)
    }

    /// Empties the history. The notice about the clear is echoed but not
    /// kept, so the buffer stays empty afterwards.
    pub fn clear_logs(&self) {
        self.state().buffer.clear();
        self.record(LogLevel::Info, "Logs cleared".to_string(), None, None, false);
    }
}

fn default_user_agent() -> String {
    format!(
        "{}/{} ({}; {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
