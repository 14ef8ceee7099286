use std::path::PathBuf;

use clap::Parser;

use crate::leaderboard::LeaderboardMode;

#[derive(Parser, Debug, Clone)]
#[command(name = "crownborn-leaderboard")]
#[command(about = "Browse the Crownborn global leaderboard from the terminal")]
pub struct AppArgs {
    #[arg(long, help = "Config file path (defaults to crownborn.toml next to the executable)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Initial leaderboard mode (fastest_total or highest_stage)")]
    pub mode: Option<LeaderboardMode>,

    #[arg(long, help = "Initial country filter, e.g. US; omit for the global board")]
    pub country: Option<String>,

    #[arg(long, help = "Disable coloured rank output")]
    pub no_color: bool,
}

impl AppArgs {
    pub fn from_cli() -> Self {
        <Self as Parser>::parse()
    }
}
