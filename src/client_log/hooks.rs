use std::any::Any;
use std::future::Future;
use std::panic::{self, Location};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use serde_json::json;
use tokio::task::JoinHandle;

use crate::client_log::logger::ClientLogger;

static PANIC_LOGGER: OnceLock<Arc<ClientLogger>> = OnceLock::new();

/// Routes panics into the client log as ERROR entries. The previously
/// installed hook still runs afterwards. Only the first call has an effect.
pub fn install_panic_hook(logger: Arc<ClientLogger>) {
    if PANIC_LOGGER.set(logger).is_err() {
        return;
    }
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if let Some(logger) = PANIC_LOGGER.get() {
            let (message, data) = describe_panic(info.payload(), info.location());
            logger.error(format!("Unhandled error: {}", message), Some(data));
        }
        previous(info);
    }));
}

/// Whether panics already reach `logger` through the panic hook.
fn hook_reports_to(logger: &Arc<ClientLogger>) -> bool {
    PANIC_LOGGER
        .get()
        .is_some_and(|installed| Arc::ptr_eq(installed, logger))
}

fn describe_panic(
    payload: &(dyn Any + Send),
    location: Option<&Location<'_>>,
) -> (String, serde_json::Value) {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    let thread = std::thread::current();
    let data = json!({
        "filename": location.map(|l| l.file()),
        "lineno": location.map(|l| l.line()),
        "colno": location.map(|l| l.column()),
        "thread": thread.name(),
        "error": std::backtrace::Backtrace::capture().to_string(),
    });
    (message, data)
}

/// Spawns `future` and logs an ERROR entry if it panics or returns an error.
/// A panic already recorded by the panic hook for the same logger is not
/// recorded again.
pub fn spawn_supervised<F, E>(
    logger: Arc<ClientLogger>,
    name: &'static str,
    future: F,
) -> JoinHandle<()>
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let task = tokio::spawn(future);
    tokio::spawn(async move {
        match task.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => logger.error(
                format!("Unhandled task failure: {}", e),
                Some(json!({ "task": name, "reason": e.to_string() })),
            ),
            Err(join_error) if join_error.is_panic() && !hook_reports_to(&logger) => logger.error(
                format!("Unhandled task failure: {} panicked", name),
                Some(json!({ "task": name, "reason": join_error.to_string() })),
            ),
            Err(_) => {}
        }
    })
}

/// One-shot startup measurement, reported the first time the client is ready.
#[derive(Debug)]
pub struct StartupTimer {
    started: Instant,
    reported: AtomicBool,
}

impl StartupTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            reported: AtomicBool::new(false),
        }
    }

    /// Returns `true` only for the call that actually logged.
    pub fn report(&self, logger: &ClientLogger) -> bool {
        if self.reported.swap(true, Ordering::SeqCst) {
            return false;
        }
        logger.log_performance("page_load", self.started.elapsed().as_millis(), "ms");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_log::level::LogLevel;

    fn logger() -> Arc<ClientLogger> {
        Arc::new(ClientLogger::new(LogLevel::Debug, 100))
    }

    #[tokio::test]
    async fn test_failed_task_is_logged_once() {
        let logger = logger();
        let handle = spawn_supervised(Arc::clone(&logger), "fetch", async {
            Err::<(), _>("socket closed")
        });
        handle.await.unwrap();

        let logs = logger.recent_logs(10);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].level, LogLevel::Error);
        assert_eq!(logs[0].message, "Unhandled task failure: socket closed");
    }

    #[tokio::test]
    async fn test_panicking_task_is_logged() {
        let logger = logger();
        let handle = spawn_supervised(Arc::clone(&logger), "render", async {
            if true {
                panic!("render exploded");
            }
            Ok::<(), String>(())
        });
        handle.await.unwrap();

        let logs = logger.recent_logs(10);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "Unhandled task failure: render panicked");
        assert_eq!(logs[0].data.as_ref().unwrap()["task"], "render");
    }

    #[tokio::test]
    async fn test_hooked_panic_in_supervised_task_is_logged_once() {
        let logger = logger();
        install_panic_hook(Arc::clone(&logger));

        let handle = spawn_supervised(Arc::clone(&logger), "layout", async {
            if true {
                panic!("layout overflow");
            }
            Ok::<(), String>(())
        });
        handle.await.unwrap();

        // Other tests panic too and the hook is process-wide; only look at ours.
        let failures: Vec<String> = logger
            .recent_logs(1000)
            .into_iter()
            .map(|e| e.message)
            .filter(|m| m.contains("layout"))
            .collect();
        assert_eq!(failures, vec!["Unhandled error: layout overflow"]);
    }

    #[tokio::test]
    async fn test_successful_task_logs_nothing() {
        let logger = logger();
        spawn_supervised(Arc::clone(&logger), "noop", async { Ok::<(), String>(()) })
            .await
            .unwrap();
        assert!(logger.is_empty());
    }

    #[test]
    fn test_describe_panic_reads_payloads() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("bad state"));
        let (message, data) = describe_panic(owned.as_ref(), None);
        assert_eq!(message, "bad state");
        assert!(data["filename"].is_null());

        let borrowed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(describe_panic(borrowed.as_ref(), None).0, "static message");

        let other: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(describe_panic(other.as_ref(), None).0, "unknown panic payload");
    }

    #[test]
    fn test_startup_timer_reports_once() {
        let logger = logger();
        let timer = StartupTimer::start();

        assert!(timer.report(&logger));
        assert!(!timer.report(&logger));

        let logs = logger.recent_logs(10);
        assert_eq!(logs.len(), 1);
        assert!(logs[0].message.starts_with("PERFORMANCE: page_load = "));
        assert_eq!(logs[0].context.as_deref(), Some("Performance"));
    }
}
