use std::path::PathBuf;

use crate::client_log::LogLevel;
use crate::leaderboard::country::{self, Country};
use crate::leaderboard::LeaderboardMode;

pub const DEFAULT_RECENT_LOGS: usize = 100;

pub const HELP: &str = "\
Commands:
  mode <fastest_total|highest_stage>   switch ranking mode
  country <code|global>                filter by country
  countries                            list available country filters
  refresh                              fetch the current board again
  stage <n>                            show fastest times for one stage
  rank <user_id>                       look up one player's rank in the current mode
  logs [n]                             show the last n client log entries (default 100)
  export [dir]                         write the client log export to a file
  clear-logs                           empty the client log history
  level <debug|info|warn|error|critical>  set the client log threshold
  help                                 show this help
  quit                                 exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Mode(LeaderboardMode),
    Country(Country),
    Countries,
    Refresh,
    Stage(u32),
    Rank(String),
    Logs(usize),
    Export(Option<PathBuf>),
    ClearLogs,
    Level(LogLevel),
    Help,
    Quit,
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = parts.split_first() else {
        return Ok(None);
    };

    let command = match (name.to_ascii_lowercase().as_str(), args) {
        ("mode", [mode]) => Command::Mode(mode.parse()?),
        ("mode", _) => return Err("Usage: mode <fastest_total|highest_stage>".to_string()),
        ("country", []) => Command::Country(country::GLOBAL),
        ("country", words) => {
            let input = words.join(" ");
            let country = country::resolve(&input)
                .ok_or_else(|| format!("Unknown country '{}'. Try 'countries'.", input))?;
            Command::Country(country)
        }
        ("countries", []) => Command::Countries,
        ("refresh", []) => Command::Refresh,
        ("stage", [n]) => Command::Stage(
            n.parse()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("Stage must be a positive number, got '{}'", n))?,
        ),
        ("stage", _) => return Err("Usage: stage <n>".to_string()),
        ("rank", [user_id]) => Command::Rank(user_id.to_string()),
        ("rank", _) => return Err("Usage: rank <user_id>".to_string()),
        ("logs", []) => Command::Logs(DEFAULT_RECENT_LOGS),
        ("logs", [n]) => Command::Logs(
            n.parse()
                .map_err(|_| format!("Log count must be a number, got '{}'", n))?,
        ),
        ("export", []) => Command::Export(None),
        ("export", [dir]) => Command::Export(Some(PathBuf::from(dir))),
        ("clear-logs", []) => Command::ClearLogs,
        ("level", [level]) => Command::Level(level.parse()?),
        ("level", _) => return Err("Usage: level <debug|info|warn|error|critical>".to_string()),
        ("help", _) => Command::Help,
        ("quit" | "exit", []) => Command::Quit,
        (other, _) => return Err(format!("Unknown command '{}'. Type 'help' for a list.", other)),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn test_mode_and_country() {
        assert_eq!(
            parse("mode highest_stage"),
            Ok(Some(Command::Mode(LeaderboardMode::HighestStage)))
        );
        assert_eq!(parse("country jp").unwrap().unwrap(), Command::Country(country::resolve("JP").unwrap()));
        assert_eq!(parse("country united states").unwrap().unwrap(), Command::Country(country::resolve("US").unwrap()));
        assert_eq!(parse("country").unwrap().unwrap(), Command::Country(country::GLOBAL));
        assert!(parse("country ZZ").unwrap_err().contains("Unknown country"));
        assert!(parse("mode").is_err());
        assert!(parse("mode slowest").is_err());
    }

    #[test]
    fn test_lookups() {
        assert_eq!(parse("stage 4"), Ok(Some(Command::Stage(4))));
        assert!(parse("stage 0").is_err());
        assert!(parse("stage four").is_err());
        assert_eq!(parse("rank 42"), Ok(Some(Command::Rank("42".to_string()))));
    }

    #[test]
    fn test_log_commands() {
        assert_eq!(parse("logs"), Ok(Some(Command::Logs(DEFAULT_RECENT_LOGS))));
        assert_eq!(parse("logs 5"), Ok(Some(Command::Logs(5))));
        assert_eq!(parse("export /tmp"), Ok(Some(Command::Export(Some(PathBuf::from("/tmp"))))));
        assert_eq!(parse("clear-logs"), Ok(Some(Command::ClearLogs)));
        assert_eq!(parse("level WARN"), Ok(Some(Command::Level(LogLevel::Warn))));
        assert!(parse("level loud").is_err());
    }

    #[test]
    fn test_unknown_and_quit() {
        assert!(parse("dance").unwrap_err().contains("Unknown command"));
        assert_eq!(parse("exit"), Ok(Some(Command::Quit)));
        assert_eq!(parse("QUIT"), Ok(Some(Command::Quit)));
    }
}
