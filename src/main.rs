mod api;
mod client_log;
mod config;
mod console;
mod leaderboard;
mod logging;
mod table;
mod util;

use std::sync::Arc;

use tracing::{error, info};

use crate::api::{LeaderboardApi, LeaderboardSource};
use crate::client_log::hooks::{self, StartupTimer};
use crate::client_log::ClientLogger;
use crate::console::args::AppArgs;
use crate::console::ConsoleContext;
use crate::leaderboard::{country, LeaderboardView, ViewState};

pub type Error = Box<dyn std::error::Error + Send + Sync + 'static>;

fn main() -> Result<(), Error> {
    let timer = Arc::new(StartupTimer::start());
    let args = AppArgs::from_cli();
    let cfg = config::load_config(args.config.as_deref())?;

    // The local UTC offset can only be read before any other thread exists.
    logging::init(&cfg.log)?;
    info!("Logging Initialised. Initialising Crownborn leaderboard client");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run(cfg, args, timer))
}

async fn run(cfg: config::AppConfig, args: AppArgs, timer: Arc<StartupTimer>) -> Result<(), Error> {
    let logger = Arc::new(ClientLogger::from_config(&cfg));
    logger.announce_start();
    hooks::install_panic_hook(Arc::clone(&logger));

    let source: Arc<dyn LeaderboardSource> = Arc::new(LeaderboardApi::new(
        cfg.api_base.clone(),
        cfg.request_timeout,
        Arc::clone(&logger),
    )?);

    let mode = args.mode.unwrap_or(cfg.default_mode);
    let country_code = match args.country.as_deref() {
        Some(input) => match country::resolve(input) {
            Some(c) => c.code.to_string(),
            None => return Err(format!("Unsupported country: {}", input).into()),
        },
        None => cfg.default_country.clone(),
    };

    info!(
        api_base = cfg.api_base,
        mode = %mode,
        country = country_code,
        "Starting leaderboard view"
    );
    let (view, view_task) = LeaderboardView::spawn(
        Arc::clone(&source),
        Arc::clone(&logger),
        ViewState::new(mode, country_code),
        cfg.page,
    );

    let color = !args.no_color;
    let render_task = hooks::spawn_supervised(
        Arc::clone(&logger),
        "render",
        console::render_loop(view.subscribe(), Arc::clone(&logger), timer, color),
    );

    let ctx = ConsoleContext {
        view: view.clone(),
        source,
        logger: Arc::clone(&logger),
        export_dir: cfg.log.export_dir.clone(),
        color,
    };
    if let Err(e) = console::run(ctx).await {
        error!(error = ?e, "Console input failed");
        logger.critical(format!("Console input failed: {}", e), None);
    }

    info!("Shutting down");
    let _ = view.shutdown().await;
    if let Err(e) = view_task.await {
        error!(error = ?e, "Leaderboard view task failed");
    }
    render_task.abort();

    Ok(())
}
