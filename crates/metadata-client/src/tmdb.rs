//! TMDB search client.
//!
//! `GET {api_url}/search/movie?api_key=..&query=..`, first result wins.
//! Transport errors and 5xx responses are retried with linear backoff;
//! any other non-success status is returned immediately.

use crate::types::{MovieMetadata, SearchResponse};
use crate::{MetadataError, MetadataLookup};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";

/// HTTP client for the TMDB movie search endpoint
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http_client: Client,
    api_key: String,
    api_url: String,
    timeout: Duration,
    max_retries: u32,
    backoff: Duration,
}

impl TmdbClient {
    /// Create a client with the default timeout (5s) and retry policy (2 retries).
    ///
    /// Fails with `MissingApiKey` when the key is blank.
    pub fn new(api_key: impl Into<String>, api_url: impl Into<String>) -> Result<Self, MetadataError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(MetadataError::MissingApiKey);
        }

        Ok(Self {
            http_client: Client::new(),
            api_key,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(5),
            max_retries: 2,
            backoff: Duration::from_millis(200),
        })
    }

    /// Configure per-request timeout (default: 5s)
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Configure how many times a failed request is retried (default: 2)
    pub fn with_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Configure the backoff step; attempt `n` waits `n * backoff` (default: 200ms)
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    async fn search_once(&self, title: &str) -> Result<Option<MovieMetadata>, MetadataError> {
        let url = format!("{}/search/movie", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("query", title)])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MetadataError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let search: SearchResponse = serde_json::from_str(&text)
            .map_err(|e| MetadataError::InvalidResponse(e.to_string()))?;

        Ok(search.results.into_iter().next())
    }
}

/// Transport failures and server-side errors are worth another attempt
fn is_retryable(err: &MetadataError) -> bool {
    match err {
        MetadataError::Http(_) => true,
        MetadataError::Status { status, .. } => StatusCode::from_u16(*status)
            .map(|s| s.is_server_error())
            .unwrap_or(false),
        _ => false,
    }
}

#[async_trait]
impl MetadataLookup for TmdbClient {
    #[instrument(skip(self), level = "debug")]
    async fn lookup(&self, title: &str) -> Result<Option<MovieMetadata>, MetadataError> {
        let mut attempt = 0;
        loop {
            match self.search_once(title).await {
                Ok(found) => {
                    debug!(found = found.is_some(), attempt, "Metadata lookup completed");
                    return Ok(found);
                }
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    warn!(error = %e, attempt, "Metadata lookup failed, retrying");
                    tokio::time::sleep(self.backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
