//! Line-based front end: turns stdin commands into view events and logger
//! calls, and redraws the board whenever the view publishes a new state.

pub mod args;
pub mod command;

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::api::LeaderboardSource;
use crate::client_log::hooks::StartupTimer;
use crate::client_log::ClientLogger;
use crate::console::command::Command;
use crate::leaderboard::render;
use crate::leaderboard::{country, ViewHandle, ViewState};

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Print(String),
    Silent,
    Quit,
}

pub struct ConsoleContext {
    pub view: ViewHandle,
    pub source: Arc<dyn LeaderboardSource>,
    pub logger: Arc<ClientLogger>,
    pub export_dir: PathBuf,
    pub color: bool,
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(ctx: ConsoleContext) -> Result<(), crate::Error> {
    println!("{}", command::HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match command::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        debug!(?command, "Executing console command");
        match execute(command, &ctx).await {
            Outcome::Print(text) => println!("{}", text),
            Outcome::Silent => {}
            Outcome::Quit => break,
        }
    }

    info!("Console closed");
    Ok(())
}

pub async fn execute(command: Command, ctx: &ConsoleContext) -> Outcome {
    match command {
        Command::Mode(mode) => view_event(ctx.view.set_mode(mode).await),
        Command::Country(country) => view_event(ctx.view.set_country(country.code).await),
        Command::Refresh => view_event(ctx.view.refresh().await),
        Command::Countries => {
            let lines: Vec<String> = country::COUNTRIES
                .iter()
                .map(|c| format!("{:<3} {}", if c.code.is_empty() { "-" } else { c.code }, c.name))
                .collect();
            Outcome::Print(lines.join("\n"))
        }
        Command::Stage(stage) => {
            let current = ctx.view.current();
            ctx.logger.log_navigation("global", &format!("stage/{}", stage));
            let text = match ctx.source.stage(stage, &current.country).await {
                Ok(response) => {
                    render::render_stage(stage, &current.country, &response.entries, ctx.color).to_text()
                }
                Err(e) => {
                    ctx.logger.log_api_error(
                        "GET",
                        &format!("/v1/leaderboard/stage/{}", stage),
                        &e,
                        e.response_body().map(|body| json!(body)),
                    );
                    format!("Could not load stage {}: {}", stage, e)
                }
            };
            ctx.logger.log_navigation(&format!("stage/{}", stage), "global");
            Outcome::Print(text)
        }
        Command::Rank(user_id) => {
            let mode = ctx.view.current().mode;
            match ctx.source.user_rank(&user_id, mode).await {
                Ok(rank) => Outcome::Print(render::render_rank(&rank)),
                Err(e) => Outcome::Print(format!("Could not look up {}: {}", user_id, e)),
            }
        }
        Command::Logs(count) => {
            let lines: Vec<String> = ctx
                .logger
                .recent_logs(count)
                .iter()
                .map(|entry| entry.formatted())
                .collect();
            if lines.is_empty() {
                Outcome::Print("No client log entries.".to_string())
            } else {
                Outcome::Print(lines.join("\n"))
            }
        }
        Command::Export(dir) => {
            let dir = dir.unwrap_or_else(|| ctx.export_dir.clone());
            match ctx.logger.download_logs(&dir) {
                Ok(path) => Outcome::Print(format!("Logs written to {}", path.display())),
                Err(e) => Outcome::Print(format!("Could not export logs to {}: {}", dir.display(), e)),
            }
        }
        Command::ClearLogs => {
            ctx.logger.clear_logs();
            Outcome::Print("Client log history cleared.".to_string())
        }
        Command::Level(level) => {
            ctx.logger.set_level(level);
            Outcome::Print(format!("Client log level set to {}", level))
        }
        Command::Help => Outcome::Print(command::HELP.to_string()),
        Command::Quit => Outcome::Quit,
    }
}

fn view_event(result: Result<(), crate::leaderboard::view::ViewClosed>) -> Outcome {
    match result {
        Ok(()) => Outcome::Silent,
        Err(e) => Outcome::Print(e.to_string()),
    }
}

/// Redraws on every published state. Reports startup timing once the first
/// load settles. Ends quietly when the view goes away.
pub async fn render_loop(
    mut state: watch::Receiver<ViewState>,
    logger: Arc<ClientLogger>,
    timer: Arc<StartupTimer>,
    color: bool,
) -> io::Result<()> {
    loop {
        let snapshot = state.borrow_and_update().clone();
        if !snapshot.loading && snapshot.generation > 0 {
            timer.report(&logger);
        }

        let text = render::render_view(&snapshot, color).to_text();
        writeln!(io::stdout().lock(), "\n{}", text)?;

        if state.changed().await.is_err() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, LeaderboardEntry, LeaderboardQuery, LeaderboardResponse, UserRank};
    use crate::client_log::LogLevel;
    use crate::config::PageConfig;
    use crate::leaderboard::{LeaderboardMode, LeaderboardView};
    use async_trait::async_trait;
    use std::time::Duration;

    struct FixedSource;

    #[async_trait]
    impl LeaderboardSource for FixedSource {
        async fn global(&self, _query: &LeaderboardQuery) -> Result<LeaderboardResponse, ApiError> {
            Ok(LeaderboardResponse {
                mode: String::new(),
                country_code: None,
                entries: vec![],
                total_count: 0,
            })
        }

        async fn stage(&self, stage: u32, _country: &str) -> Result<LeaderboardResponse, ApiError> {
            Ok(LeaderboardResponse {
                mode: format!("stage_{}", stage),
                country_code: None,
                entries: vec![LeaderboardEntry {
                    rank: 1,
                    user_id: "7".to_string(),
                    display_name: "Mira".to_string(),
                    country_code: "US".to_string(),
                    score: 45_000,
                    stage: Some(stage as i64),
                }],
                total_count: 1,
            })
        }

        async fn user_rank(&self, user_id: &str, _mode: LeaderboardMode) -> Result<UserRank, ApiError> {
            Err(ApiError::NotFound(format!("User {} not found", user_id)))
        }
    }

    fn context(export_dir: PathBuf) -> (ConsoleContext, tokio::task::JoinHandle<()>) {
        let logger = Arc::new(ClientLogger::new(LogLevel::Debug, 100));
        let source: Arc<dyn LeaderboardSource> = Arc::new(FixedSource);
        let (view, task) = LeaderboardView::spawn(
            Arc::clone(&source),
            Arc::clone(&logger),
            ViewState::new(LeaderboardMode::FastestTotal, ""),
            PageConfig { limit: 10, offset: 0 },
        );
        let ctx = ConsoleContext {
            view,
            source,
            logger,
            export_dir,
            color: false,
        };
        (ctx, task)
    }

    #[tokio::test]
    async fn test_stage_command_renders_board_and_navigation() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _task) = context(dir.path().to_path_buf());

        let Outcome::Print(text) = execute(Command::Stage(3), &ctx).await else {
            panic!("stage should print");
        };
        assert!(text.starts_with("Stage 3 | Global\n"));
        assert!(text.contains("| 🥇   | Mira   | US      |  45s |"));

        let navigation: Vec<String> = ctx
            .logger
            .recent_logs(100)
            .into_iter()
            .filter(|e| e.context.as_deref() == Some("Navigation"))
            .map(|e| e.message)
            .collect();
        assert_eq!(
            navigation,
            vec!["NAVIGATION: global -> stage/3", "NAVIGATION: stage/3 -> global"]
        );
    }

    #[tokio::test]
    async fn test_rank_lookup_failure_is_printed() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _task) = context(dir.path().to_path_buf());

        assert_eq!(
            execute(Command::Rank("42".to_string()), &ctx).await,
            Outcome::Print("Could not look up 42: User 42 not found".to_string())
        );
    }

    #[tokio::test]
    async fn test_export_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _task) = context(dir.path().to_path_buf());

        let Outcome::Print(text) = execute(Command::Export(None), &ctx).await else {
            panic!("export should print");
        };
        assert!(text.starts_with("Logs written to "));
        assert!(dir
            .path()
            .join(format!("crownborn_logs_{}.json", ctx.logger.session_id()))
            .is_file());

        execute(Command::ClearLogs, &ctx).await;
        assert_eq!(
            execute(Command::Logs(10), &ctx).await,
            Outcome::Print("No client log entries.".to_string())
        );
    }

    #[tokio::test]
    async fn test_closed_view_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, task) = context(dir.path().to_path_buf());
        ctx.view.shutdown().await.unwrap();
        tokio::time::timeout(Duration::from_secs(2), task).await.unwrap().unwrap();

        assert_eq!(
            execute(Command::Refresh, &ctx).await,
            Outcome::Print("leaderboard view has shut down".to_string())
        );
        assert_eq!(execute(Command::Quit, &ctx).await, Outcome::Quit);
    }
}
