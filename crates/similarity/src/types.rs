//! Result and configuration types for the similarity index.

use data_loader::{MatchMode, MovieId};
use serde::{Deserialize, Serialize};

/// One ranked neighbour of the anchor movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    /// Cosine similarity to the anchor, in `[0, 1]`
    pub score: f32,
}

/// Build and query settings.
///
/// Defaults: 5000 features, unigrams + bigrams, substring matching, k = 5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    pub max_features: usize,
    pub ngram_range: (usize, usize),
    pub match_mode: MatchMode,
    pub default_k: usize,
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure vocabulary cap (default: 5000)
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    /// Configure inclusive n-gram range (default: (1, 2))
    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    /// Configure title matching policy (default: substring)
    pub fn with_match_mode(mut self, match_mode: MatchMode) -> Self {
        self.match_mode = match_mode;
        self
    }

    /// Configure neighbour count used by `query_default` (default: 5)
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_features: 5000,
            ngram_range: (1, 2),
            match_mode: MatchMode::Substring,
            default_k: 5,
        }
    }
}

/// Size figures for logging and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    pub movies: usize,
    pub vocabulary_size: usize,
    pub nonzero_features: usize,
    pub matrix_bytes: usize,
}
