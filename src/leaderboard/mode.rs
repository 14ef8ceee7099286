use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ranking criterion sent as the `mode` query parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardMode {
    #[default]
    FastestTotal,
    HighestStage,
}

impl LeaderboardMode {
    pub const ALL: [LeaderboardMode; 2] = [LeaderboardMode::FastestTotal, LeaderboardMode::HighestStage];

    pub fn as_query(self) -> &'static str {
        match self {
            LeaderboardMode::FastestTotal => "fastest_total",
            LeaderboardMode::HighestStage => "highest_stage",
        }
    }

    /// Human-friendly label shown in the mode picker and table title.
    pub fn to_label(self) -> &'static str {
        match self {
            LeaderboardMode::FastestTotal => "Fastest Total Time",
            LeaderboardMode::HighestStage => "Highest Stage Reached",
        }
    }

    /// Header of the mode-dependent fourth column.
    pub fn metric_header(self) -> &'static str {
        match self {
            LeaderboardMode::FastestTotal => "Time",
            LeaderboardMode::HighestStage => "Stage",
        }
    }
}

impl fmt::Display for LeaderboardMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

impl FromStr for LeaderboardMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fastest_total" | "fastest" | "time" => Ok(LeaderboardMode::FastestTotal),
            "highest_stage" | "highest" | "stage" => Ok(LeaderboardMode::HighestStage),
            other => Err(format!(
                "unknown leaderboard mode '{}', expected fastest_total or highest_stage",
                other
            )),
        }
    }
}
