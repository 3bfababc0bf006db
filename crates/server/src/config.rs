use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use data_loader::MatchMode;
use serde::Deserialize;
use similarity::IndexConfig;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// CSV dataset with one movie per row
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// TMDB API key; only needed for metadata enrichment
    #[serde(default)]
    pub tmdb_api_key: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Recommendations enriched per search
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Title matching policy: `exact` or `substring`
    #[serde(default)]
    pub match_mode: MatchMode,

    /// Per-request timeout for metadata lookups, in seconds
    #[serde(default = "default_lookup_timeout_secs")]
    pub lookup_timeout_secs: u64,

    /// Retries for a failed metadata lookup
    #[serde(default = "default_lookup_retries")]
    pub lookup_retries: u32,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("final_data.csv")
}

fn default_tmdb_api_url() -> String {
    metadata_client::tmdb::DEFAULT_API_URL.to_string()
}

fn default_top_k() -> usize {
    5
}

fn default_lookup_timeout_secs() -> u64 {
    5
}

fn default_lookup_retries() -> u32 {
    2
}

impl AppConfig {
    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<AppConfig>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Load configuration from explicit key/value pairs
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, AppConfig>(pairs)
            .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn index_config(&self) -> IndexConfig {
        IndexConfig::default()
            .with_match_mode(self.match_mode)
            .with_default_k(self.top_k)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_secs)
    }

    /// API key, if one is set and not blank
    pub fn api_key(&self) -> Option<&str> {
        self.tmdb_api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
    }
}
