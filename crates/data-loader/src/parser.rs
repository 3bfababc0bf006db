//! Parser for the movie metadata CSV.
//!
//! Expected header (any order, extra columns ignored):
//! `movie_title, director_name, actor_1_name, actor_2_name, actor_3_name, genres`
//!
//! Any cell may be empty. Empty cells become `None` on the parsed row and an
//! empty string in the signature.

use crate::error::{DataLoadError, Result};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const TITLE_COLUMN: &str = "movie_title";
pub const DIRECTOR_COLUMN: &str = "director_name";
pub const ACTOR_COLUMNS: [&str; 3] = ["actor_1_name", "actor_2_name", "actor_3_name"];
pub const GENRES_COLUMN: &str = "genres";

/// One parsed dataset row, before ordinals are assigned
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieRecord {
    pub title: String,
    pub director: Option<String>,
    pub actors: [Option<String>; 3],
    pub genres: Option<String>,
}

/// Positions of the required columns within a header row
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    title: usize,
    director: usize,
    actors: [usize; 3],
    genres: usize,
}

impl ColumnLayout {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| DataLoadError::MissingColumn {
                    column: name.to_string(),
                    found: headers.iter().collect::<Vec<_>>().join(", "),
                })
        };

        Ok(Self {
            title: find(TITLE_COLUMN)?,
            director: find(DIRECTOR_COLUMN)?,
            actors: [
                find(ACTOR_COLUMNS[0])?,
                find(ACTOR_COLUMNS[1])?,
                find(ACTOR_COLUMNS[2])?,
            ],
            genres: find(GENRES_COLUMN)?,
        })
    }

    fn record(&self, row: &StringRecord) -> MovieRecord {
        MovieRecord {
            title: row.get(self.title).unwrap_or("").to_string(),
            director: cell(row, self.director),
            actors: [
                cell(row, self.actors[0]),
                cell(row, self.actors[1]),
                cell(row, self.actors[2]),
            ],
            genres: cell(row, self.genres),
        }
    }
}

/// Read a cell, mapping missing or blank values to `None`
fn cell(row: &StringRecord, idx: usize) -> Option<String> {
    row.get(idx)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse the dataset file at `path`
pub fn parse_movies(path: &Path) -> Result<Vec<MovieRecord>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    parse_movies_from_reader(file)
}

/// Parse CSV from any reader (file, in-memory buffer, ...)
///
/// Rows keep their source order. `flexible` lets short rows through; their
/// missing trailing cells read as empty.
pub fn parse_movies_from_reader<R: Read>(reader: R) -> Result<Vec<MovieRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let layout = ColumnLayout::from_headers(&headers)?;

    let mut records = Vec::new();
    for result in csv_reader.records() {
        let row = result?;
        records.push(layout.record(&row));
    }

    Ok(records)
}
