//! # Data Loader Crate
//!
//! This crate loads the movie metadata dataset into an ordered, immutable
//! catalog.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Movie, MovieId, MatchMode, Catalog)
//! - **parser**: Parse the CSV dataset into rows
//! - **catalog**: Assign ordinals and derive signatures
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::Catalog;
//! use std::path::Path;
//!
//! let catalog = Catalog::load_from_file(Path::new("final_data.csv"))?;
//!
//! let avatar = catalog.find_exact("Avatar").unwrap();
//! println!("{} -> {}", avatar.title, avatar.signature);
//! ```

// Public modules
pub mod error;
pub mod types;
pub mod parser;
pub mod catalog;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use parser::MovieRecord;
pub use types::{Catalog, MatchMode, Movie, MovieId, build_signature, normalize_title};
