use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;

const SESSION_SUFFIX_LEN: usize = 9;

/// One client run. Created with the logger and never persisted.
#[derive(Debug, Clone)]
pub struct Session {
    id: String,
    started_at: DateTime<Utc>,
    started: Instant,
}

impl Session {
    pub fn start() -> Self {
        let started_at = Utc::now();
        Self {
            id: generate_session_id(started_at),
            started_at,
            started: Instant::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Seconds since the session began, fractional.
    pub fn uptime_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// `<unix millis>_<9 lowercase base-36 chars>`
fn generate_session_id(now: DateTime<Utc>) -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(|b| (b as char).to_ascii_lowercase())
        .take(SESSION_SUFFIX_LEN)
        .collect();
    format!("{}_{}", now.timestamp_millis(), suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_id_shape() {
        let session = Session::start();
        let (millis, suffix) = session.id().split_once('_').expect("id has a separator");

        assert_eq!(millis.parse::<i64>().unwrap(), session.started_at().timestamp_millis());
        assert_eq!(suffix.len(), SESSION_SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        let a = Session::start();
        let b = Session::start();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_uptime_is_monotonic() {
        let session = Session::start();
        let first = session.uptime_secs();
        std::thread::sleep(Duration::from_millis(5));
        assert!(session.uptime_secs() > first);
    }
}
