use std::fmt;

use colored::{ColoredString, Colorize};

use crate::api::LeaderboardEntry;
use crate::leaderboard::mode::LeaderboardMode;

/// `"1h 1m 1s"`, `"2m 5s"`, `"45s"`; zero or negative is `"-"`.
pub fn format_time(ms: i64) -> String {
    if ms <= 0 {
        return "-".to_string();
    }

    let seconds = ms / 1000;
    let minutes = seconds / 60;
    let hours = minutes / 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankMedal {
    Gold,
    Silver,
    Bronze,
    Rank(u32),
}

impl fmt::Display for RankMedal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankMedal::Gold => f.write_str("🥇"),
            RankMedal::Silver => f.write_str("🥈"),
            RankMedal::Bronze => f.write_str("🥉"),
            RankMedal::Rank(rank) => write!(f, "{}", rank),
        }
    }
}

pub fn rank_medal(rank: u32) -> RankMedal {
    match rank {
        1 => RankMedal::Gold,
        2 => RankMedal::Silver,
        3 => RankMedal::Bronze,
        other => RankMedal::Rank(other),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankColor {
    Gold,
    Silver,
    Bronze,
    Default,
}

impl RankColor {
    pub fn paint(self, text: &str) -> ColoredString {
        match self {
            RankColor::Gold => text.yellow().bold(),
            RankColor::Silver => text.white().bold(),
            RankColor::Bronze => text.truecolor(251, 146, 60).bold(),
            RankColor::Default => text.normal().bold(),
        }
    }
}

pub fn rank_color(rank: u32) -> RankColor {
    match rank {
        1 => RankColor::Gold,
        2 => RankColor::Silver,
        3 => RankColor::Bronze,
        _ => RankColor::Default,
    }
}

/// The stage reached; a missing or zero `stage` falls back to `score`.
pub fn stage_value(entry: &LeaderboardEntry) -> i64 {
    entry.stage.filter(|stage| *stage != 0).unwrap_or(entry.score)
}

/// Value of the mode-dependent fourth column.
pub fn metric_cell(mode: LeaderboardMode, entry: &LeaderboardEntry) -> String {
    match mode {
        LeaderboardMode::FastestTotal => format_time(entry.score),
        LeaderboardMode::HighestStage => format!("Stage {}", stage_value(entry)),
    }
}
