//! Core domain types for the movie catalog.
//!
//! This module defines the data structures shared by every other crate:
//! - `MovieId`: the stable catalog ordinal
//! - `Movie`: one immutable catalog row with its derived signature
//! - `MatchMode`: how a free-text title is matched against the catalog
//! - `Catalog`: the ordered, read-only movie list

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Type Aliases
// =============================================================================

/// Position of a movie in the catalog (0-based).
///
/// The ordinal doubles as the row index into the feature and similarity
/// matrices, so it never changes once the catalog is loaded.
pub type MovieId = usize;

// =============================================================================
// Movie
// =============================================================================

/// A single catalog row
///
/// Credit fields keep `None` for cells that were empty in the source; the
/// `signature` substitutes an empty string for them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    /// Lower-cased, trimmed title used for matching and display
    pub title: String,
    pub director: Option<String>,
    /// Up to three lead actors in billing order
    pub actors: [Option<String>; 3],
    /// Genre tags as they appear in the dataset
    pub genres: Option<String>,
    /// `director actor1 actor2 actor3 genres`, built once at load
    pub signature: String,
}

impl Movie {
    /// Build a movie from raw column values.
    ///
    /// The title is normalized and the signature derived here; neither is
    /// recomputed afterwards.
    pub fn new(
        id: MovieId,
        title: &str,
        director: Option<String>,
        actors: [Option<String>; 3],
        genres: Option<String>,
    ) -> Self {
        let signature = build_signature(&director, &actors, &genres);
        Self {
            id,
            title: normalize_title(title),
            director,
            actors,
            genres,
            signature,
        }
    }
}

/// Lower-case and trim a title so lookups are case-insensitive.
///
/// `str::trim` also strips the non-breaking spaces some dataset exports leave
/// at the end of titles.
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Concatenate the credit fields in column order, single-space separated.
///
/// Missing fields contribute an empty string, so the separator count is
/// always four.
pub fn build_signature(
    director: &Option<String>,
    actors: &[Option<String>; 3],
    genres: &Option<String>,
) -> String {
    let fields = [director, &actors[0], &actors[1], &actors[2], genres];
    fields
        .iter()
        .map(|f| f.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Title Matching
// =============================================================================

/// Title matching policy used to pick the anchor movie of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Query equals a catalog title after lower-casing
    Exact,
    /// Query is contained in a catalog title
    #[default]
    Substring,
}

impl MatchMode {
    /// Check a normalized query against a normalized catalog title
    pub fn matches(self, query: &str, title: &str) -> bool {
        match self {
            MatchMode::Exact => title == query,
            MatchMode::Substring => title.contains(query),
        }
    }
}

impl fmt::Display for MatchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMode::Exact => write!(f, "exact"),
            MatchMode::Substring => write!(f, "substring"),
        }
    }
}

impl FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "substring" => Ok(MatchMode::Substring),
            other => Err(format!("unknown match mode: {}", other)),
        }
    }
}

// =============================================================================
// Catalog - The Ordered Movie List
// =============================================================================

/// Ordered, immutable list of movies.
///
/// Built once at startup by the loader; every downstream component indexes
/// into it by `MovieId`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub(crate) movies: Vec<Movie>,
}

impl Catalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self { movies: Vec::new() }
    }

    /// Get a movie by ordinal
    pub fn get(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(id)
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Iterate movies in ordinal order
    pub fn iter(&self) -> impl Iterator<Item = &Movie> {
        self.movies.iter()
    }

    /// All movies as a slice, in ordinal order
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Signatures in ordinal order, ready for vectorization
    pub fn signatures(&self) -> Vec<&str> {
        self.movies.iter().map(|m| m.signature.as_str()).collect()
    }

    /// First movie (lowest ordinal) whose title equals `title`
    pub fn find_exact(&self, title: &str) -> Option<&Movie> {
        self.find_first(title, MatchMode::Exact)
    }

    /// First movie (lowest ordinal) whose title contains `title`
    pub fn find_substring(&self, title: &str) -> Option<&Movie> {
        self.find_first(title, MatchMode::Substring)
    }

    /// First match by ordinal under the given policy.
    ///
    /// Returns `None` for blank input instead of matching every title.
    pub fn find_first(&self, title: &str, mode: MatchMode) -> Option<&Movie> {
        let query = normalize_title(title);
        if query.is_empty() {
            return None;
        }
        self.movies.iter().find(|m| mode.matches(&query, &m.title))
    }

    /// Every match under the given policy, in ordinal order
    pub fn find_all(&self, title: &str, mode: MatchMode) -> Vec<&Movie> {
        let query = normalize_title(title);
        if query.is_empty() {
            return Vec::new();
        }
        self.movies
            .iter()
            .filter(|m| mode.matches(&query, &m.title))
            .collect()
    }

    /// Append a movie, assigning the next ordinal.
    ///
    /// Only the loader and test fixtures grow a catalog; once it is handed to
    /// the index it is never mutated again.
    pub fn push(
        &mut self,
        title: &str,
        director: Option<String>,
        actors: [Option<String>; 3],
        genres: Option<String>,
    ) -> MovieId {
        let id = self.movies.len();
        self.movies
            .push(Movie::new(id, title, director, actors, genres));
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(s: &str) -> Option<String> {
        Some(s.to_string())
    }

    #[test]
    fn test_signature_column_order() {
        let movie = Movie::new(
            0,
            "Avatar",
            some("James Cameron"),
            [some("Sam Worthington"), some("Zoe Saldana"), some("Sigourney Weaver")],
            some("Action Adventure Fantasy Sci-Fi"),
        );
        assert_eq!(
            movie.signature,
            "James Cameron Sam Worthington Zoe Saldana Sigourney Weaver Action Adventure Fantasy Sci-Fi"
        );
    }

    #[test]
    fn test_signature_missing_fields() {
        let movie = Movie::new(0, "x", None, [some("a"), None, some("c")], None);
        // Empty strings still get their separators
        assert_eq!(movie.signature, " a  c ");
    }

    #[test]
    fn test_title_normalized() {
        let movie = Movie::new(0, "  The Dark Knight\u{a0}", None, [None, None, None], None);
        assert_eq!(movie.title, "the dark knight");
    }

    #[test]
    fn test_match_mode_parse() {
        assert_eq!("EXACT".parse::<MatchMode>().unwrap(), MatchMode::Exact);
        assert_eq!("substring".parse::<MatchMode>().unwrap(), MatchMode::Substring);
        assert!("fuzzy".parse::<MatchMode>().is_err());
        assert_eq!(MatchMode::default(), MatchMode::Substring);
    }

    #[test]
    fn test_find_first_prefers_lowest_ordinal() {
        let mut catalog = Catalog::new();
        catalog.push("Clone", some("a"), [None, None, None], None);
        catalog.push("Clone", some("b"), [None, None, None], None);

        let anchor = catalog.find_exact("CLONE").unwrap();
        assert_eq!(anchor.id, 0);
        assert_eq!(anchor.director.as_deref(), Some("a"));
    }

    #[test]
    fn test_find_substring_and_blank_query() {
        let mut catalog = Catalog::new();
        catalog.push("The Matrix", None, [None, None, None], None);
        catalog.push("The Matrix Reloaded", None, [None, None, None], None);

        assert_eq!(catalog.find_substring("matrix").unwrap().id, 0);
        assert!(catalog.find_exact("matrix").is_none());
        assert_eq!(catalog.find_all("MATRIX", MatchMode::Substring).len(), 2);
        assert!(catalog.find_first("   ", MatchMode::Substring).is_none());
        assert!(catalog.find_all("", MatchMode::Substring).is_empty());
    }
}
