use std::collections::VecDeque;

use crate::client_log::entry::LogEntry;

pub const DEFAULT_CAPACITY: usize = 1000;

/// Chronological history of recent entries. Oldest are dropped once full.
#[derive(Debug)]
pub struct LogBuffer {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The last `count` entries, oldest first.
    pub fn recent(&self, count: usize) -> Vec<LogEntry> {
        let skip = self.entries.len().saturating_sub(count);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_log::level::LogLevel;

    fn entry(n: usize) -> LogEntry {
        LogEntry {
            timestamp: "2024-05-01T00:00:00.000Z".to_string(),
            level: LogLevel::Info,
            message: format!("message {}", n),
            data: None,
            context: None,
            session_id: "s".to_string(),
            uptime: n as f64,
        }
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let mut buffer = LogBuffer::default();
        for n in 0..=DEFAULT_CAPACITY {
            buffer.push(entry(n));
        }

        assert_eq!(buffer.len(), DEFAULT_CAPACITY);
        let recent = buffer.recent(DEFAULT_CAPACITY);
        assert_eq!(recent.len(), DEFAULT_CAPACITY);
        assert_eq!(recent.first().unwrap().message, "message 1");
        assert_eq!(recent.last().unwrap().message, "message 1000");
        assert!(recent.windows(2).all(|w| w[0].uptime < w[1].uptime));
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut buffer = LogBuffer::with_capacity(10);
        for n in 0..5 {
            buffer.push(entry(n));
        }

        let messages: Vec<String> = buffer.recent(2).into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["message 3", "message 4"]);
        assert_eq!(buffer.recent(50).len(), 5);
        assert!(buffer.recent(0).is_empty());
    }

    #[test]
    fn test_clear_empties_buffer() {
        let mut buffer = LogBuffer::with_capacity(3);
        buffer.push(entry(0));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(buffer.snapshot().is_empty());
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut buffer = LogBuffer::with_capacity(0);
        buffer.push(entry(0));
        buffer.push(entry(1));
        assert_eq!(buffer.capacity(), 1);
        assert_eq!(buffer.recent(1)[0].message, "message 1");
    }
}
