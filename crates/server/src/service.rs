//! # Search Service
//!
//! The request-facing flow on top of the similarity index:
//! 1. Normalize the query; blank or absent → empty result
//! 2. Query the index off the async runtime (`spawn_blocking`)
//! 3. Look up metadata for the query text, then each recommended title,
//!    all concurrently
//! 4. Collect results in request order, omitting failed or empty lookups
//!
//! A lookup failure never fails the search; it is logged and skipped.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use metadata_client::{MetadataLookup, MovieMetadata};
use similarity::{Recommendation, SimilarityIndex, normalize_query};

/// One enriched entry of a search response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Title the lookup was made for
    pub title: String,
    /// Similarity to the anchor; `None` for the searched movie itself
    pub score: Option<f32>,
    pub metadata: MovieMetadata,
}

/// Recommendation and enrichment over a shared, read-only index
#[derive(Clone)]
pub struct SearchService {
    index: Arc<SimilarityIndex>,
    lookup: Arc<dyn MetadataLookup>,
    limit: usize,
}

impl SearchService {
    /// # Arguments
    /// * `index` - Shared similarity index
    /// * `lookup` - Metadata source used for enrichment
    /// * `limit` - Recommendations enriched per search
    pub fn new(index: Arc<SimilarityIndex>, lookup: Arc<dyn MetadataLookup>, limit: usize) -> Self {
        Self {
            index,
            lookup,
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn index(&self) -> &Arc<SimilarityIndex> {
        &self.index
    }

    /// Top `k` recommendations for `title`, computed on the blocking pool
    pub async fn recommend(&self, title: &str, k: usize) -> Result<Vec<Recommendation>> {
        let index = Arc::clone(&self.index);
        let title = title.to_string();

        tokio::task::spawn_blocking(move || index.query(&title, k))
            .await
            .context("Recommendation task panicked")
    }

    /// Searched movie first, then its recommendations, each with metadata.
    ///
    /// An absent or blank query returns an empty list without any lookups.
    #[instrument(skip(self))]
    pub async fn search(&self, query: Option<&str>) -> Result<Vec<SearchHit>> {
        let Some(query) = normalize_query(query) else {
            debug!("Empty search query");
            return Ok(Vec::new());
        };
        let start = Instant::now();

        let recommendations = self.recommend(&query, self.limit).await?;
        info!(
            "Found {} recommendations for {:?}",
            recommendations.len(),
            query
        );

        let mut titles = Vec::with_capacity(recommendations.len() + 1);
        titles.push((query, None));
        titles.extend(
            recommendations
                .into_iter()
                .map(|rec| (rec.title, Some(rec.score))),
        );

        let hits = self.lookup_all(titles).await;
        info!(
            "Search returned {} enriched results in {:?}",
            hits.len(),
            start.elapsed()
        );

        Ok(hits)
    }

    /// Enrich already computed recommendations
    pub async fn enrich(&self, recommendations: Vec<Recommendation>) -> Vec<SearchHit> {
        let titles = recommendations
            .into_iter()
            .map(|rec| (rec.title, Some(rec.score)))
            .collect();
        self.lookup_all(titles).await
    }

    /// One task per title; results are awaited in input order
    async fn lookup_all(&self, titles: Vec<(String, Option<f32>)>) -> Vec<SearchHit> {
        let handles: Vec<_> = titles
            .into_iter()
            .map(|(title, score)| {
                let lookup = Arc::clone(&self.lookup);
                tokio::spawn(async move {
                    let result = lookup.lookup(&title).await;
                    (title, score, result)
                })
            })
            .collect();

        let mut hits = Vec::with_capacity(handles.len());
        for handle in handles {
            match handle.await {
                Ok((title, score, Ok(Some(metadata)))) => hits.push(SearchHit {
                    title,
                    score,
                    metadata,
                }),
                Ok((title, _, Ok(None))) => {
                    debug!(title = %title, "No metadata found");
                }
                Ok((title, _, Err(e))) => {
                    warn!(error = %e, title = %title, "Metadata lookup failed");
                }
                Err(e) => {
                    warn!(error = %e, "Metadata lookup task panicked");
                }
            }
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use data_loader::Catalog;
    use metadata_client::MetadataError;
    use similarity::IndexConfig;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Canned lookup: titles map to a display title (found), `None`
    /// (not found), or are missing from the map (error)
    #[derive(Default)]
    struct MockLookup {
        known: HashMap<String, Option<String>>,
        delays: HashMap<String, u64>,
        calls: Mutex<Vec<String>>,
    }

    impl MockLookup {
        fn found(mut self, title: &str) -> Self {
            self.known.insert(title.to_string(), Some(title.to_uppercase()));
            self
        }

        fn not_found(mut self, title: &str) -> Self {
            self.known.insert(title.to_string(), None);
            self
        }

        fn delayed(mut self, title: &str, millis: u64) -> Self {
            self.delays.insert(title.to_string(), millis);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetadataLookup for MockLookup {
        async fn lookup(&self, title: &str) -> Result<Option<MovieMetadata>, MetadataError> {
            self.calls.lock().unwrap().push(title.to_string());
            if let Some(&millis) = self.delays.get(title) {
                tokio::time::sleep(Duration::from_millis(millis)).await;
            }
            match self.known.get(title) {
                Some(Some(display)) => Ok(Some(MovieMetadata {
                    title: Some(display.clone()),
                    ..Default::default()
                })),
                Some(None) => Ok(None),
                None => Err(MetadataError::InvalidResponse("unknown title".into())),
            }
        }
    }

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn build_test_index() -> Arc<SimilarityIndex> {
        let mut catalog = Catalog::new();
        catalog.push(
            "toy story",
            s("john"),
            [s("tom"), s("tim"), s("ted")],
            s("animation comedy"),
        );
        catalog.push(
            "toy story 2",
            s("john"),
            [s("tom"), s("tim"), s("ted")],
            s("animation comedy"),
        );
        catalog.push(
            "alien",
            s("ridley"),
            [s("sig"), s("john"), s("ian")],
            s("horror scifi"),
        );
        Arc::new(SimilarityIndex::build(catalog, IndexConfig::default()))
    }

    fn service(lookup: MockLookup, limit: usize) -> (SearchService, Arc<MockLookup>) {
        let lookup = Arc::new(lookup);
        let service = SearchService::new(build_test_index(), lookup.clone(), limit);
        (service, lookup)
    }

    fn titles(hits: &[SearchHit]) -> Vec<&str> {
        hits.iter().map(|h| h.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_empty_query_skips_lookups() {
        let (service, lookup) = service(MockLookup::default().found("toy story"), 5);

        assert!(service.search(None).await.unwrap().is_empty());
        assert!(service.search(Some("")).await.unwrap().is_empty());
        assert!(service.search(Some("   ")).await.unwrap().is_empty());
        assert!(lookup.calls().is_empty());
    }

    #[tokio::test]
    async fn test_query_first_then_recommendations() {
        let lookup = MockLookup::default()
            .found("toy story")
            .found("toy story 2")
            .found("alien");
        let (service, _) = service(lookup, 5);

        let hits = service.search(Some("Toy Story")).await.unwrap();
        assert_eq!(titles(&hits), vec!["toy story", "toy story 2", "alien"]);
        assert_eq!(hits[0].score, None);
        assert!(hits[1].score > hits[2].score);
        assert_eq!(hits[1].metadata.title.as_deref(), Some("TOY STORY 2"));
    }

    #[tokio::test]
    async fn test_limit_bounds_lookups() {
        let lookup = MockLookup::default()
            .found("toy story")
            .found("toy story 2")
            .found("alien");
        let (service, lookup) = service(lookup, 1);

        let hits = service.search(Some("toy story")).await.unwrap();
        assert_eq!(titles(&hits), vec!["toy story", "toy story 2"]);
        assert_eq!(lookup.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_and_missing_lookups_omitted() {
        // "toy story 2" errors, "alien" is unknown to the service
        let lookup = MockLookup::default().found("toy story").not_found("alien");
        let (service, lookup) = service(lookup, 5);

        let hits = service.search(Some("toy story")).await.unwrap();
        assert_eq!(titles(&hits), vec!["toy story"]);
        assert_eq!(lookup.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_order_kept_when_lookups_finish_out_of_order() {
        let lookup = MockLookup::default()
            .found("toy story")
            .found("toy story 2")
            .found("alien")
            .delayed("toy story", 60)
            .delayed("toy story 2", 30);
        let (service, _) = service(lookup, 5);

        let hits = service.search(Some("toy story")).await.unwrap();
        assert_eq!(titles(&hits), vec!["toy story", "toy story 2", "alien"]);
    }

    #[tokio::test]
    async fn test_unmatched_query_still_looked_up() {
        let lookup = MockLookup::default().found("inception");
        let (service, lookup) = service(lookup, 5);

        let hits = service.search(Some("Inception")).await.unwrap();
        assert_eq!(titles(&hits), vec!["inception"]);
        assert_eq!(lookup.calls(), vec!["inception".to_string()]);
    }

    #[tokio::test]
    async fn test_recommend_matches_index() {
        let (service, _) = service(MockLookup::default(), 5);

        let recs = service.recommend("alien", 2).await.unwrap();
        assert_eq!(recs, service.index().query("alien", 2));
        assert!(service.recommend("nothing here", 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enrich_recommendations() {
        let lookup = MockLookup::default().found("alien");
        let (service, _) = service(lookup, 5);

        let recs = service.recommend("toy story", 5).await.unwrap();
        let hits = service.enrich(recs).await;
        assert_eq!(titles(&hits), vec!["alien"]);
        assert!(hits[0].score.is_some());
    }
}
