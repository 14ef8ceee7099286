use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

use serde::Deserialize;

use crate::client_log::transport::COLLECTOR_PATH;
use crate::client_log::LogLevel;
use crate::leaderboard::country;
use crate::leaderboard::mode::LeaderboardMode;
use crate::util::dates;
use crate::Error;

pub const CONFIG_FILE_NAME: &str = "crownborn.toml";
const DEV_API_BASE: &str = "http://localhost:8000";
const MAX_PAGE_LIMIT: u32 = 500;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        matches!(self, Environment::Development)
    }

    pub fn name(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Client log threshold used when the config does not set one.
    pub fn default_client_threshold(self) -> LogLevel {
        match self {
            Environment::Development => LogLevel::Debug,
            Environment::Production => LogLevel::Info,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
struct FileConfig {
    pub environment: Environment,
    pub api_base: Option<String>,
    pub default_mode: Option<String>,
    #[serde(default)]
    pub default_country: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default)]
    pub page_offset: u32,
    pub log: FileLogConfig,
}

#[derive(Debug, Deserialize, Clone)]
struct FileLogConfig {
    pub level: String,
    pub client_level: Option<String>,
    pub path: String,
    pub json_path: String,
    pub collector_endpoint: Option<String>,
    pub buffer_capacity: Option<usize>,
    pub export_dir: Option<String>,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_page_limit() -> u32 {
    100
}

#[derive(Clone, Debug)]
pub struct LogConfig {
    /// `tracing` filter for the process log.
    pub level: String,
    pub client_threshold: LogLevel,
    pub path: PathBuf,
    pub json_path: PathBuf,
    pub collector_endpoint: String,
    pub buffer_capacity: usize,
    pub export_dir: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageConfig {
    pub limit: u32,
    pub offset: u32,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: Environment,
    pub api_base: String,
    pub default_mode: LeaderboardMode,
    pub default_country: String,
    pub request_timeout: Duration,
    pub page: PageConfig,
    pub log: LogConfig,
}

fn expand_tilde(path: &str) -> Result<PathBuf, Error> {
    if path.starts_with("~/") {
        let home = env::var("HOME")?;
        Ok(PathBuf::from(path.replacen("~", &home, 1)))
    } else {
        Ok(PathBuf::from(path))
    }
}

/// Loads `crownborn.toml`, either from `explicit` or from next to the executable.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, Error> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let exe_path = env::current_exe()?;
            match exe_path.parent() {
                Some(dir) => dir.join(CONFIG_FILE_NAME),
                _ => return Err("failed to determine executable directory".into()),
            }
        }
    };

    if !config_path.exists() || !config_path.is_file() {
        return Err(format!(
            "Config file does not exist or is not a file: {}",
            config_path.display()
        )
        .into());
    }
    let s = fs::read_to_string(&config_path)?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<AppConfig, Error> {
    let cfg: FileConfig = toml::from_str(s)?;

    let api_base = match (&cfg.api_base, cfg.environment) {
        (Some(base), _) if !base.trim().is_empty() => base.trim().trim_end_matches('/').to_string(),
        (_, Environment::Development) => DEV_API_BASE.to_string(),
        (_, Environment::Production) => {
            return Err("api_base is required when environment is production".into())
        }
    };

    let default_mode = match &cfg.default_mode {
        Some(mode) => mode.parse::<LeaderboardMode>()?,
        None => LeaderboardMode::default(),
    };

    let default_country = cfg.default_country.trim().to_ascii_uppercase();
    if country::lookup(&default_country).is_none() {
        return Err(format!("Unsupported default_country: {}", cfg.default_country).into());
    }

    if cfg.page_limit == 0 || cfg.page_limit > MAX_PAGE_LIMIT {
        return Err(format!(
            "page_limit must be between 1 and {}, got {}",
            MAX_PAGE_LIMIT, cfg.page_limit
        )
        .into());
    }

    let log = build_log_config(cfg.log, cfg.environment, &api_base)?;

    Ok(AppConfig {
        environment: cfg.environment,
        api_base,
        default_mode,
        default_country,
        request_timeout: Duration::from_secs(cfg.request_timeout_secs.max(1)),
        page: PageConfig {
            limit: cfg.page_limit,
            offset: cfg.page_offset,
        },
        log,
    })
}

fn build_log_config(
    file_log: FileLogConfig,
    environment: Environment,
    api_base: &str,
) -> Result<LogConfig, Error> {
    let path = checked_log_path(&file_log.path)?;
    let json_path = checked_log_path(&file_log.json_path)?;

    let client_threshold = match &file_log.client_level {
        Some(level) => level.parse::<LogLevel>()?,
        None => environment.default_client_threshold(),
    };

    let export_dir = expand_tilde(file_log.export_dir.as_deref().unwrap_or("."))?;
    if !export_dir.is_dir() {
        return Err(format!("Log export directory does not exist: {}", export_dir.display()).into());
    }

    Ok(LogConfig {
        level: file_log.level,
        client_threshold,
        path,
        json_path,
        collector_endpoint: file_log
            .collector_endpoint
            .unwrap_or_else(|| format!("{}{}", api_base, COLLECTOR_PATH)),
        buffer_capacity: file_log
            .buffer_capacity
            .unwrap_or(crate::client_log::buffer::DEFAULT_CAPACITY),
        export_dir,
    })
}

fn checked_log_path(cfg_path: &str) -> Result<PathBuf, Error> {
    let path = log_file_replacements(cfg_path)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(format!("Log file directory does not exist: {}", parent.display()).into());
        }
    }
    if path.exists() && !path.is_file() {
        return Err(format!("Log path exists but is not a file: {}", cfg_path).into());
    }
    Ok(path)
}

fn log_file_replacements(cfg_path: &str) -> Result<PathBuf, Error> {
    let date_str = dates::local_date_yyyy_mm_dd();
    let replaced = cfg_path.replace("{DATE}", &date_str);
    expand_tilde(&replaced)
}
