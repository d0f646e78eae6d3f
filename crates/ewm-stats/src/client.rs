//! HTTP client for the stats server.

use std::time::Duration;

use async_trait::async_trait;
use ewm_types::datetime;
use reqwest::{Client, Response};
use url::Url;

use crate::{NewHit, Result, StatsError, StatsQuery, StatsSource, ViewStats};

/// Talks to a remote stats server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStatsClient {
    client: Client,
    base_url: Url,
}

impl HttpStatsClient {
    /// Creates a client for the server at `base_url`, which may carry a path
    /// prefix such as `http://gateway/stats-api`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("ewm-stats-client/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| StatsError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: Url::parse(&with_trailing_slash(base_url))?,
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    async fn check(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status, url = %url, body = %body, "stats server rejected request");
        Err(StatsError::Api { status, body })
    }
}

// Endpoints are joined relatively, so the base must end in a slash to keep
// its last path segment.
fn with_trailing_slash(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

#[async_trait]
impl StatsSource for HttpStatsClient {
    async fn save_hit(&self, hit: NewHit) -> Result<()> {
        let response = self
            .client
            .post(self.endpoint("hit")?)
            .json(&hit)
            .send()
            .await
            .map_err(|e| StatsError::Network(e.to_string()))?;

        Self::check(response).await?;
        Ok(())
    }

    async fn get_stats(&self, query: &StatsQuery) -> Result<Vec<ViewStats>> {
        let mut params = vec![
            ("start", datetime::format(&query.start)),
            ("end", datetime::format(&query.end)),
            ("unique", query.unique.to_string()),
        ];
        params.extend(query.uris.iter().map(|uri| ("uris", uri.clone())));

        let response = self
            .client
            .get(self.endpoint("stats")?)
            .query(&params)
            .send()
            .await
            .map_err(|e| StatsError::Network(e.to_string()))?;

        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| StatsError::Decode(e.to_string()))
    }
}
