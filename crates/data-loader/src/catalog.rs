//! Catalog construction.
//!
//! Turns parsed rows into the ordered `Catalog`. Row order in the source is
//! the ordinal order used by every downstream matrix.

use crate::error::Result;
use crate::parser::{self, MovieRecord};
use crate::types::*;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

impl Catalog {
    /// Load the catalog from a CSV dataset file
    ///
    /// This is the main entry point, called once at startup.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading movie catalog from {:?}", path);

        let records = parser::parse_movies(path)?;
        let catalog = Self::from_records(records);

        info!("Loaded {} movies", catalog.len());
        Ok(catalog)
    }

    /// Load the catalog from any CSV reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let records = parser::parse_movies_from_reader(reader)?;
        Ok(Self::from_records(records))
    }

    /// Build a catalog from already-parsed rows, preserving their order
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let movies: Vec<Movie> = records
            .into_iter()
            .enumerate()
            .map(|(id, r)| Movie::new(id, &r.title, r.director, r.actors, r.genres))
            .collect();

        let untitled = movies.iter().filter(|m| m.title.is_empty()).count();
        if untitled > 0 {
            debug!("{} catalog rows have an empty title", untitled);
        }

        Self { movies }
    }

    /// Number of distinct titles, for diagnostics
    pub fn distinct_titles(&self) -> usize {
        let titles: std::collections::HashSet<&str> =
            self.movies.iter().map(|m| m.title.as_str()).collect();
        titles.len()
    }
}
