//! Simple test harness for the search service.
//!
//! Builds the application context from the environment and runs one search:
//!
//! ```text
//! TMDB_API_KEY=... cargo run -p server -- "the dark knight"
//! ```

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use server::{AppConfig, AppContext};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,server=debug,similarity=debug")),
        )
        .init();

    info!("Starting CineSmart search harness");

    let config = AppConfig::from_env()?;
    info!("Loading dataset from {}", config.dataset_path.display());
    let context = tokio::task::spawn_blocking(move || AppContext::build(config))
        .await
        .context("Startup task panicked")??;

    let query = std::env::args().nth(1).unwrap_or_else(|| "avatar".to_string());
    let limit = context.config.top_k;

    info!("Recommendations for {:?} (limit: {})", query, limit);
    let recommendations = context.index.query(&query, limit);
    for (i, rec) in recommendations.iter().enumerate() {
        info!("{}. {} - Score: {:.3}", i + 1, rec.title, rec.score);
    }

    let service = match context.search_service() {
        Ok(service) => service,
        Err(e) => {
            info!("Skipping enrichment: {:#}", e);
            return Ok(());
        }
    };

    let hits = service.search(Some(&query)).await?;
    info!("Received {} enriched results:", hits.len());
    for (i, hit) in hits.iter().enumerate() {
        info!(
            "{}. {} ({}) - {}",
            i + 1,
            hit.metadata.title.as_deref().unwrap_or(&hit.title),
            hit.metadata
                .release_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "????".to_string()),
            hit.score
                .map(|s| format!("Score: {:.3}", s))
                .unwrap_or_else(|| "searched title".to_string())
        );
        if let Some(url) = hit.metadata.poster_url() {
            info!("   {}", url);
        }
    }

    Ok(())
}
