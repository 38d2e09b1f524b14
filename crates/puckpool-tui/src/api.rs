// HTTP client for the puckpool proxy server.
//
// `PoolApi` is the seam the app logic talks to; `HttpPoolApi` implements it
// over reqwest. Tests substitute scripted implementations.

use async_trait::async_trait;
use puckpool_core::model::{PlayerId, PlayerStats, SearchHit};
use puckpool_core::season::Season;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server returned status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait PoolApi: Send + Sync {
    /// `GET /api/search?name=<query>`
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError>;

    /// `GET /api/player/<id>?season=<season>`
    async fn player_stats(&self, id: PlayerId, season: &Season) -> Result<PlayerStats, ApiError>;
}

pub struct HttpPoolApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPoolApi {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.server_url.clone(),
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PoolApi for HttpPoolApi {
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ApiError> {
        let url = format!("{}/api/search", self.base_url);
        let hits: Vec<SearchHit> = self.get(self.http.get(url).query(&[("name", query)])).await?;
        debug!(query, results = hits.len(), "search response");
        Ok(hits)
    }

    async fn player_stats(&self, id: PlayerId, season: &Season) -> Result<PlayerStats, ApiError> {
        let url = format!("{}/api/player/{}", self.base_url, id);
        self.get(self.http.get(url).query(&[("season", season.as_str())]))
            .await
    }
}
