//! # Similarity Crate
//!
//! Content-based "more like this" recommendations over the movie catalog.
//!
//! ## Components
//!
//! - **tokenizer** / **stopwords**: signature text → unigram and bigram terms
//! - **vectorizer**: TF-IDF weighting into L2-normalized sparse rows
//! - **matrix**: precomputed N×N cosine similarities
//! - **index**: the read-only `SimilarityIndex` and its `query` operation
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use similarity::{IndexConfig, SimilarityIndex};
//! use std::sync::Arc;
//!
//! let catalog = Catalog::load_from_file(Path::new("final_data.csv"))?;
//! let index = Arc::new(SimilarityIndex::build(catalog, IndexConfig::default()));
//!
//! for rec in index.query("avatar", 5) {
//!     println!("{} ({:.3})", rec.title, rec.score);
//! }
//! ```
//!
//! ## Cost
//!
//! Build is O(total tokens) for vectorization plus O(N² · nnz) for the
//! matrix, paid once. A query is one row scan plus a top-k selection.

pub mod stopwords;
pub mod tokenizer;
pub mod vectorizer;
pub mod matrix;
pub mod types;
pub mod index;

// Re-export commonly used types
pub use index::{SimilarityIndex, normalize_query};
pub use matrix::SimilarityMatrix;
pub use stopwords::StopWords;
pub use tokenizer::Analyzer;
pub use types::{IndexConfig, IndexStats, Recommendation};
pub use vectorizer::{FeatureMatrix, SparseRow, TfidfVectorizer};
