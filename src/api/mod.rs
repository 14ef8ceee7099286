pub mod leaderboard_api;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::leaderboard::mode::LeaderboardMode;

pub use leaderboard_api::{LeaderboardApi, LeaderboardSource};

pub const GLOBAL_PATH: &str = "/v1/leaderboard/global";

/// One ranked row. Arrives pre-sorted and pre-ranked; never re-ordered here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub display_name: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub stage: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub country_code: Option<String>,
    pub entries: Vec<LeaderboardEntry>,
    #[serde(default)]
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRank {
    pub user_id: String,
    pub display_name: String,
    /// Players may not have picked a country.
    #[serde(default)]
    pub country_code: Option<String>,
    pub mode: String,
    pub rank: u32,
    pub score: i64,
}

/// Parameters of a global leaderboard request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardQuery {
    pub mode: LeaderboardMode,
    /// Empty for the global board.
    pub country: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl LeaderboardQuery {
    pub fn new(mode: LeaderboardMode, country: impl Into<String>) -> Self {
        Self {
            mode,
            country: country.into(),
            limit: None,
            offset: None,
        }
    }

    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = Some(offset);
        self
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("mode", self.mode.as_query().to_string())];
        if !self.country.is_empty() {
            pairs.push(("country", self.country.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }

    /// `/v1/leaderboard/global?mode=..`, for log lines.
    pub fn path_and_query(&self) -> String {
        let query: Vec<String> = self
            .query_pairs()
            .into_iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", GLOBAL_PATH, query.join("&"))
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16, body: String },
    #[error("malformed response from {url}: {source}")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// Response body worth attaching to an error log, if there was one.
    pub fn response_body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}
