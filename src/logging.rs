use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Arc;

use tracing::Subscriber;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::time::OffsetTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Registry};

use crate::config::LogConfig;
use crate::Error;

const DIRECTIVES: [&str; 5] = [
    "hyper=warn",
    "hyper_util=warn",
    "reqwest=warn",
    "ureq=warn",
    "crownborn_leaderboard=trace",
];

/// Process log: stderr (stdout belongs to the table), a pretty text file and
/// a JSON file. `RUST_LOG` overrides the configured level.
pub fn init(config: &LogConfig) -> Result<(), Error> {
    let timer = OffsetTime::local_rfc_3339()
        .map_err(|e| format!("local time offset must be available: {}", e))?;

    let console = default_layer()
        .with_writer(std::io::stderr)
        .with_timer(timer.clone());
    let pretty = default_layer()
        .pretty()
        .with_ansi(false)
        .with_timer(timer.clone())
        .with_writer(append_to(&config.path)?);
    let json = default_layer()
        .json()
        .with_ansi(false)
        .with_timer(timer)
        .with_writer(append_to(&config.json_path)?);

    Registry::default()
        .with(build_filter(&config.level))
        .with(console)
        .with(pretty)
        .with(json)
        .try_init()?;
    Ok(())
}

fn append_to(path: &Path) -> std::io::Result<Arc<File>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    Ok(Arc::new(file))
}

fn build_filter(level: &str) -> EnvFilter {
    let base = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    DIRECTIVES
        .iter()
        .filter_map(|d| d.parse::<Directive>().ok())
        .fold(base, |filter, directive| filter.add_directive(directive))
}

fn default_layer<S>() -> tracing_subscriber::fmt::Layer<S>
where
    S: Subscriber,
{
    tracing_subscriber::fmt::layer()
        .with_level(true)
        .with_line_number(true)
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
}
