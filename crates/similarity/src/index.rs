//! The similarity index: catalog + vocabulary + features + similarity matrix.
//!
//! Everything is built once in `SimilarityIndex::build` and read-only after.
//! Queries take `&self` and touch no shared mutable state, so one index can
//! sit behind an `Arc` and serve any number of threads.
//!
//! ## Query algorithm
//! 1. Normalize the query (trim, lower-case); blank → empty result
//! 2. Pick the anchor: the lowest-ordinal title matching under the mode
//! 3. Read the anchor's similarity row, drop the anchor itself
//! 4. Rank by score descending, ties by ordinal ascending
//! 5. Return the first `k`

use crate::matrix::SimilarityMatrix;
use crate::stopwords::StopWords;
use crate::tokenizer::Analyzer;
use crate::types::{IndexConfig, IndexStats, Recommendation};
use crate::vectorizer::{FeatureMatrix, TfidfVectorizer};
use data_loader::{Catalog, MatchMode, MovieId, normalize_title};
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Read-only recommendation context built at startup
#[derive(Debug, Clone)]
pub struct SimilarityIndex {
    catalog: Catalog,
    vectorizer: TfidfVectorizer,
    features: FeatureMatrix,
    matrix: SimilarityMatrix,
    config: IndexConfig,
}

impl SimilarityIndex {
    /// Vectorize every signature and precompute all pairwise similarities.
    ///
    /// Blocking and O(N²); call it before serving queries.
    #[instrument(skip_all, fields(movies = catalog.len()))]
    pub fn build(catalog: Catalog, config: IndexConfig) -> Self {
        let start = Instant::now();

        let analyzer = Analyzer::new(StopWords::english(), config.ngram_range);
        let mut vectorizer =
            TfidfVectorizer::new(analyzer).with_max_features(config.max_features);
        let features = vectorizer.fit_transform(&catalog.signatures());
        debug!(
            "Vectorized {} signatures into {} columns ({} non-zero weights)",
            features.n_rows(),
            features.n_cols,
            features.nnz()
        );

        let matrix = SimilarityMatrix::compute(&features);

        info!(
            "Built similarity index: {} movies, {} terms in {:.2?}",
            catalog.len(),
            vectorizer.vocabulary_size(),
            start.elapsed()
        );

        Self {
            catalog,
            vectorizer,
            features,
            matrix,
            config,
        }
    }

    /// Top `k` neighbours of the movie matching `title` under the configured
    /// match mode
    pub fn query(&self, title: &str, k: usize) -> Vec<Recommendation> {
        self.query_with_mode(title, k, self.config.match_mode)
    }

    /// `query` with the configured default `k`
    pub fn query_default(&self, title: &str) -> Vec<Recommendation> {
        self.query(title, self.config.default_k)
    }

    /// Top `k` neighbours with an explicit match mode.
    ///
    /// Never fails: blank input, no matching title and `k == 0` all give an
    /// empty result.
    #[instrument(skip(self), level = "debug")]
    pub fn query_with_mode(&self, title: &str, k: usize, mode: MatchMode) -> Vec<Recommendation> {
        if k == 0 {
            return Vec::new();
        }
        let Some(anchor) = self.find_anchor(title, mode) else {
            debug!("No catalog title matches {:?}", title);
            return Vec::new();
        };
        let Some(row) = self.matrix.row(anchor) else {
            return Vec::new();
        };

        let mut ranked: Vec<(MovieId, f32)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(id, _)| id != anchor)
            .collect();

        // Partition out the top k before sorting them
        if k < ranked.len() {
            ranked.select_nth_unstable_by(k - 1, rank_order);
            ranked.truncate(k);
        }
        ranked.sort_unstable_by(rank_order);

        ranked
            .into_iter()
            .filter_map(|(id, score)| {
                let movie = self.catalog.get(id)?;
                Some(Recommendation {
                    movie_id: id,
                    title: movie.title.clone(),
                    score,
                })
            })
            .collect()
    }

    /// Anchor ordinal for a query: lowest id among matching titles
    pub fn find_anchor(&self, title: &str, mode: MatchMode) -> Option<MovieId> {
        self.catalog.find_first(title, mode).map(|m| m.id)
    }

    /// Cosine similarity between two catalog movies
    pub fn similarity(&self, a: MovieId, b: MovieId) -> Option<f32> {
        self.matrix.get(a, b)
    }

    /// The `n` heaviest TF-IDF terms of a movie, heaviest first
    pub fn top_terms(&self, id: MovieId, n: usize) -> Vec<(String, f32)> {
        let Some(row) = self.features.row(id) else {
            return Vec::new();
        };

        let mut weighted: Vec<(&str, f32)> = row
            .indices
            .iter()
            .zip(&row.values)
            .filter_map(|(&col, &w)| Some((self.vectorizer.term(col)?, w)))
            .collect();
        weighted.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        weighted.truncate(n);

        weighted
            .into_iter()
            .map(|(term, w)| (term.to_string(), w))
            .collect()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            movies: self.catalog.len(),
            vocabulary_size: self.vectorizer.vocabulary_size(),
            nonzero_features: self.features.nnz(),
            matrix_bytes: self.matrix.memory_bytes(),
        }
    }
}

/// Score descending, then ordinal ascending
fn rank_order(a: &(MovieId, f32), b: &(MovieId, f32)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0))
}

/// Normalized form of a query string, `None` when blank
pub fn normalize_query(title: Option<&str>) -> Option<String> {
    let query = normalize_title(title?);
    (!query.is_empty()).then_some(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    fn build_test_index() -> SimilarityIndex {
        let mut catalog = Catalog::new();
        catalog.push(
            "Avatar",
            s("James Cameron"),
            [s("Sam Worthington"), s("Zoe Saldana"), s("Sigourney Weaver")],
            s("Action Adventure Fantasy Sci-Fi"),
        );
        catalog.push(
            "Aliens",
            s("James Cameron"),
            [s("Sigourney Weaver"), s("Michael Biehn"), s("Carrie Henn")],
            s("Action Adventure Sci-Fi Thriller"),
        );
        catalog.push(
            "Titanic",
            s("James Cameron"),
            [s("Leonardo DiCaprio"), s("Kate Winslet"), s("Billy Zane")],
            s("Drama Romance"),
        );
        catalog.push(
            "The Notebook",
            s("Nick Cassavetes"),
            [s("Ryan Gosling"), s("Rachel McAdams"), s("James Garner")],
            s("Drama Romance"),
        );
        catalog.push("Untitled", None, [None, None, None], None);
        SimilarityIndex::build(catalog, IndexConfig::default())
    }

    #[test]
    fn test_query_ranks_shared_credits_first() {
        let index = build_test_index();
        let recs = index.query("avatar", 3);

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].title, "aliens");
        assert!(recs.iter().all(|r| r.movie_id != 0));
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_zero_k_and_blank_query() {
        let index = build_test_index();
        assert!(index.query("avatar", 0).is_empty());
        assert!(index.query("", 5).is_empty());
        assert!(index.query("   ", 5).is_empty());
    }

    #[test]
    fn test_k_larger_than_catalog() {
        let index = build_test_index();
        let recs = index.query("titanic", 50);
        assert_eq!(recs.len(), 4);
    }

    #[test]
    fn test_empty_signature_ties_break_by_ordinal() {
        let index = build_test_index();
        // "untitled" has no terms: every other movie scores 0 against it
        let recs = index.query("untitled", 4);
        let ids: Vec<MovieId> = recs.iter().map(|r| r.movie_id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(recs.iter().all(|r| r.score == 0.0));
        assert_eq!(index.similarity(4, 4), Some(1.0));
    }

    #[test]
    fn test_exact_mode_override() {
        let index = build_test_index();
        assert!(index.query_with_mode("alien", 3, MatchMode::Exact).is_empty());
        assert_eq!(index.find_anchor("alien", MatchMode::Substring), Some(1));
    }

    #[test]
    fn test_top_terms_and_stats() {
        let index = build_test_index();
        let terms = index.top_terms(3, 3);
        assert_eq!(terms.len(), 3);
        assert!(terms[0].1 >= terms[1].1);
        assert!(index.top_terms(99, 3).is_empty());

        let stats = index.stats();
        assert_eq!(stats.movies, 5);
        assert_eq!(stats.vocabulary_size, index.vocabulary_size());
        assert_eq!(stats.matrix_bytes, 5 * 5 * 4);
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query(Some("  AVATAR ")), Some("avatar".to_string()));
        assert_eq!(normalize_query(Some("  ")), None);
        assert_eq!(normalize_query(None), None);
    }
}
