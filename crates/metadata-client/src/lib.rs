//! Metadata client for enriching recommendations with poster and overview data.
//!
//! This crate provides the outbound side of the search flow:
//! - `MetadataLookup`: the async seam the search service depends on
//! - `TmdbClient`: an HTTP implementation against the TMDB search API
//! - `MovieMetadata`: the typed, all-optional payload record
//!
//! A failed or empty lookup never affects recommendations; callers drop the
//! entry and move on.

pub mod tmdb;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use tmdb::TmdbClient;
pub use types::MovieMetadata;

/// Errors that can occur when fetching movie metadata
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("No API key configured for the metadata service")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Metadata service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response from metadata service: {0}")]
    InvalidResponse(String),
}

/// Looks up display metadata for a movie title.
///
/// `Ok(None)` means the service answered but knows no such title.
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn lookup(&self, title: &str) -> Result<Option<MovieMetadata>, MetadataError>;
}
