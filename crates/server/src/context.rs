//! Application context: everything built once at startup and shared after.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};

use data_loader::Catalog;
use metadata_client::{MetadataError, MetadataLookup, TmdbClient};
use similarity::SimilarityIndex;

use crate::config::AppConfig;
use crate::service::SearchService;

/// Read-only state handed to request handlers
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub index: Arc<SimilarityIndex>,
    lookup: Option<Arc<dyn MetadataLookup>>,
}

impl AppContext {
    /// Load the dataset, build the index and set up the metadata client.
    ///
    /// Blocking: run it before serving, or on the blocking pool. Without an
    /// API key the context still builds, with enrichment disabled.
    pub fn build(config: AppConfig) -> Result<Self> {
        let start = Instant::now();

        let catalog = Catalog::load_from_file(&config.dataset_path).with_context(|| {
            format!(
                "Failed to load dataset from {}",
                config.dataset_path.display()
            )
        })?;
        let index = Arc::new(SimilarityIndex::build(catalog, config.index_config()));

        let lookup = match config.api_key() {
            Some(key) => {
                let client = TmdbClient::new(key, config.tmdb_api_url.as_str())?
                    .with_timeout(config.lookup_timeout())
                    .with_retries(config.lookup_retries);
                Some(Arc::new(client) as Arc<dyn MetadataLookup>)
            }
            None => {
                warn!("TMDB_API_KEY not set, metadata enrichment disabled");
                None
            }
        };

        info!("Application context ready in {:?}", start.elapsed());

        Ok(Self {
            config,
            index,
            lookup,
        })
    }

    /// Replace the metadata source
    pub fn with_lookup(mut self, lookup: Arc<dyn MetadataLookup>) -> Self {
        self.lookup = Some(lookup);
        self
    }

    pub fn has_lookup(&self) -> bool {
        self.lookup.is_some()
    }

    /// Search service over this context; fails when no metadata source is set
    pub fn search_service(&self) -> Result<SearchService> {
        let lookup = self
            .lookup
            .clone()
            .ok_or(MetadataError::MissingApiKey)
            .context("Search needs TMDB_API_KEY for metadata enrichment")?;

        Ok(SearchService::new(
            Arc::clone(&self.index),
            lookup,
            self.config.top_k,
        ))
    }
}
