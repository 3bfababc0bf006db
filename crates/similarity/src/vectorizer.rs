//! TF-IDF vectorization of movie signatures.
//!
//! ## Weighting
//! ```text
//! tf(t, d)  = count of term t in document d
//! idf(t)    = ln((1 + N) / (1 + df(t))) + 1
//! w(t, d)   = tf(t, d) * idf(t), then each row is L2-normalized
//! ```
//! The `+1` terms keep idf positive and defined for every vocabulary term.
//! Weight grows with tf and shrinks with df.
//!
//! ## Vocabulary
//! Terms are ranked by total corpus count (ties by term text) and the top
//! `max_features` kept. Column indices are then assigned in alphabetical
//! order so the layout does not depend on hash iteration order.

use crate::tokenizer::Analyzer;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

// =============================================================================
// Sparse storage
// =============================================================================

/// One document's feature row: parallel arrays sorted by column index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseRow {
    pub indices: Vec<u32>,
    pub values: Vec<f32>,
}

impl SparseRow {
    /// Build from unsorted (column, weight) pairs
    pub fn from_pairs(mut pairs: Vec<(u32, f32)>) -> Self {
        pairs.sort_unstable_by_key(|&(idx, _)| idx);
        let (indices, values) = pairs.into_iter().unzip();
        Self { indices, values }
    }

    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn norm(&self) -> f32 {
        self.values.iter().map(|v| v * v).sum::<f32>().sqrt()
    }

    /// Scale to unit length; all-zero rows are left alone.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }

    /// Sparse dot product by merge-join over the sorted indices.
    ///
    /// Products are accumulated in ascending column order whichever side is
    /// `self`, so `a.dot(b) == b.dot(a)` bit for bit.
    pub fn dot(&self, other: &SparseRow) -> f32 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0f32;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Weight stored for `column`, zero when absent
    pub fn get(&self, column: u32) -> f32 {
        match self.indices.binary_search(&column) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }
}

/// Row per document, column per vocabulary term
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    pub rows: Vec<SparseRow>,
    pub n_cols: usize,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, idx: usize) -> Option<&SparseRow> {
        self.rows.get(idx)
    }

    /// Total stored (non-zero) weights
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseRow::nnz).sum()
    }
}

// =============================================================================
// Vectorizer
// =============================================================================

/// Learns a vocabulary and IDF weights from a corpus and maps documents to
/// normalized TF-IDF rows.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    analyzer: Analyzer,
    max_features: Option<usize>,
    vocabulary: HashMap<String, u32>,
    /// Column index -> term
    terms: Vec<String>,
    /// Column index -> idf
    idf: Vec<f32>,
}

impl TfidfVectorizer {
    pub fn new(analyzer: Analyzer) -> Self {
        Self {
            analyzer,
            max_features: None,
            vocabulary: HashMap::new(),
            terms: Vec::new(),
            idf: Vec::new(),
        }
    }

    /// Cap the vocabulary at the `max_features` most frequent terms
    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = Some(max_features);
        self
    }

    /// Learn the vocabulary from `documents` and return their feature rows
    pub fn fit_transform<S: AsRef<str> + Sync>(&mut self, documents: &[S]) -> FeatureMatrix {
        let counts = self.count_documents(documents);
        self.fit_counts(&counts);

        let rows = counts.par_iter().map(|doc| self.weigh(doc)).collect();
        FeatureMatrix {
            rows,
            n_cols: self.terms.len(),
        }
    }

    /// Vectorize a document against the learned vocabulary.
    ///
    /// Terms outside the vocabulary are ignored.
    pub fn transform_one(&self, document: &str) -> SparseRow {
        self.weigh(&count_terms(&self.analyzer, document))
    }

    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    pub fn vocabulary(&self) -> &HashMap<String, u32> {
        &self.vocabulary
    }

    /// Term for a column index
    pub fn term(&self, column: u32) -> Option<&str> {
        self.terms.get(column as usize).map(String::as_str)
    }

    /// IDF weight of a term, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f32> {
        self.vocabulary
            .get(term)
            .map(|&idx| self.idf[idx as usize])
    }

    /// Per-document term counts, in document order
    fn count_documents<S: AsRef<str> + Sync>(&self, documents: &[S]) -> Vec<HashMap<String, u32>> {
        documents
            .par_iter()
            .map(|d| count_terms(&self.analyzer, d.as_ref()))
            .collect()
    }

    /// Select the vocabulary and compute idf from per-document counts
    fn fit_counts(&mut self, counts: &[HashMap<String, u32>]) {
        let n_docs = counts.len();
        let mut corpus_freq: HashMap<&str, u64> = HashMap::new();
        let mut doc_freq: HashMap<&str, u32> = HashMap::new();

        for doc in counts {
            for (term, &count) in doc {
                *corpus_freq.entry(term.as_str()).or_insert(0) += count as u64;
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let distinct = corpus_freq.len();

        let mut ranked: Vec<(&str, u64)> = corpus_freq.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(max) = self.max_features {
            ranked.truncate(max);
        }

        let mut kept: Vec<&str> = ranked.into_iter().map(|(term, _)| term).collect();
        kept.sort_unstable();

        self.idf = kept
            .iter()
            .map(|term| smooth_idf(n_docs, doc_freq.get(term).copied().unwrap_or(0)))
            .collect();
        self.vocabulary = kept
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.to_string(), idx as u32))
            .collect();
        self.terms = kept.into_iter().map(str::to_string).collect();

        debug!(
            "Vocabulary: kept {} of {} distinct terms over {} documents",
            self.terms.len(),
            distinct,
            n_docs
        );
    }

    /// TF-IDF weights for one document's counts, normalized
    fn weigh(&self, counts: &HashMap<String, u32>) -> SparseRow {
        let pairs: Vec<(u32, f32)> = counts
            .iter()
            .filter_map(|(term, &tf)| {
                let idx = *self.vocabulary.get(term)?;
                Some((idx, tf as f32 * self.idf[idx as usize]))
            })
            .collect();

        let mut row = SparseRow::from_pairs(pairs);
        row.normalize();
        row
    }
}

impl Default for TfidfVectorizer {
    fn default() -> Self {
        Self::new(Analyzer::default())
    }
}

fn count_terms(analyzer: &Analyzer, document: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for term in analyzer.analyze(document) {
        *counts.entry(term).or_insert(0) += 1;
    }
    counts
}

/// `ln((1 + n) / (1 + df)) + 1`
pub fn smooth_idf(n_docs: usize, df: u32) -> f32 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() as f32 + 1.0
}
