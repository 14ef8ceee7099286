use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Client log severity. The numeric value is what goes over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum LogLevel {
    Debug = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Critical = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Whether entries at this level are forwarded to the collector.
    pub fn is_reportable(self) -> bool {
        self >= LogLevel::Error
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<LogLevel> for u8 {
    fn from(level: LogLevel) -> Self {
        level.ordinal()
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, String> {
        LogLevel::ALL
            .into_iter()
            .find(|l| l.ordinal() == value)
            .ok_or_else(|| format!("invalid log level ordinal: {}", value))
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        LogLevel::ALL
            .into_iter()
            .find(|l| l.name().eq_ignore_ascii_case(wanted))
            .or_else(|| match wanted.to_ascii_lowercase().as_str() {
                "warning" => Some(LogLevel::Warn),
                _ => None,
            })
            .ok_or_else(|| format!("unknown log level: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Critical);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("debug".parse::<LogLevel>(), Ok(LogLevel::Debug));
        assert_eq!("Critical".parse::<LogLevel>(), Ok(LogLevel::Critical));
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serializes_as_ordinal() {
        assert_eq!(serde_json::to_string(&LogLevel::Error).unwrap(), "3");
        let parsed: LogLevel = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, LogLevel::Critical);
        assert!(serde_json::from_str::<LogLevel>("9").is_err());
    }

    #[test]
    fn test_ordinal_conversion() {
        assert_eq!(LogLevel::try_from(3), Ok(LogLevel::Error));
        assert_eq!(u8::from(LogLevel::Warn), 2);
        assert_eq!(
            LogLevel::try_from(5),
            Err("invalid log level ordinal: 5".to_string())
        );
    }

    #[test]
    fn test_only_error_and_above_are_reportable() {
        assert!(!LogLevel::Warn.is_reportable());
        assert!(LogLevel::Error.is_reportable());
        assert!(LogLevel::Critical.is_reportable());
    }
}
