use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::info;

use crate::api::{ApiError, LeaderboardQuery, LeaderboardResponse, UserRank, GLOBAL_PATH};
use crate::client_log::ClientLogger;
use crate::leaderboard::mode::LeaderboardMode;

/// Read side of the leaderboard backend.
#[async_trait]
pub trait LeaderboardSource: Send + Sync {
    async fn global(&self, query: &LeaderboardQuery) -> Result<LeaderboardResponse, ApiError>;

    async fn stage(&self, stage: u32, country: &str) -> Result<LeaderboardResponse, ApiError>;

    async fn user_rank(&self, user_id: &str, mode: LeaderboardMode) -> Result<UserRank, ApiError>;
}

/// The rank endpoint answers 200 with `{"error": ..}` for unknown users.
#[derive(Deserialize)]
#[serde(untagged)]
enum RankLookup {
    Found(UserRank),
    Missing { error: String },
}

pub struct LeaderboardApi {
    client: reqwest::Client,
    base_url: String,
    logger: Arc<ClientLogger>,
}

impl LeaderboardApi {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        logger: Arc<ClientLogger>,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(logger.user_agent().to_string())
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            logger,
        })
    }

    /// Each segment is percent-encoded, so user input cannot change the route.
    fn build_request(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<reqwest::Request, ApiError> {
        let mut request = self
            .client
            .get(&self.base_url)
            .query(query)
            .build()
            .map_err(|source| ApiError::Request {
                url: self.base_url.clone(),
                source,
            })?;
        if let Ok(mut path) = request.url_mut().path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        Ok(request)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&'static str, String)],
    ) -> Result<T, ApiError> {
        let request = self.build_request(segments, query)?;
        let url = request.url().to_string();
        self.logger.log_api_request("GET", &url, None);

        let started = Instant::now();
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| ApiError::Request {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| ApiError::Request {
            url: url.clone(),
            source,
        })?;
        self.logger.log_api_response(
            "GET",
            &url,
            status.as_u16(),
            None,
            started.elapsed().as_millis(),
        );

        if !status.is_success() {
            return Err(ApiError::Status {
                url,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Malformed { url, source })
    }
}

fn global_segments() -> Vec<&'static str> {
    GLOBAL_PATH.split('/').filter(|s| !s.is_empty()).collect()
}

#[async_trait]
impl LeaderboardSource for LeaderboardApi {
    #[tracing::instrument(level = "trace", skip(self))]
    async fn global(&self, query: &LeaderboardQuery) -> Result<LeaderboardResponse, ApiError> {
        let response: LeaderboardResponse = self.get_json(&global_segments(), &query.query_pairs()).await?;
        info!(
            mode = %query.mode,
            country = query.country,
            count = response.entries.len(),
            "Fetched global leaderboard"
        );
        Ok(response)
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn stage(&self, stage: u32, country: &str) -> Result<LeaderboardResponse, ApiError> {
        let mut query = Vec::new();
        if !country.is_empty() {
            query.push(("country", country.to_string()));
        }
        let stage_segment = stage.to_string();
        let segments = ["v1", "leaderboard", "stage", stage_segment.as_str()];
        let response: LeaderboardResponse = self.get_json(&segments, &query).await?;
        info!(stage, country, count = response.entries.len(), "Fetched stage leaderboard");
        Ok(response)
    }

    #[tracing::instrument(level = "trace", skip(self))]
    async fn user_rank(&self, user_id: &str, mode: LeaderboardMode) -> Result<UserRank, ApiError> {
        let segments = ["v1", "leaderboard", "user", user_id, "rank"];
        let query = [("mode", mode.as_query().to_string())];
        match self.get_json::<RankLookup>(&segments, &query).await? {
            RankLookup::Found(rank) => Ok(rank),
            RankLookup::Missing { error } => Err(ApiError::NotFound(error)),
        }
    }
}
