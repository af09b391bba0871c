//! Initial movie sequence.
//!
//! The bundled dataset is compiled into the binary. An alternate JSON file
//! can be supplied at startup; either way every record is run through full
//! validation and must carry a unique id before the service starts.

use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::error::SeedError;
use crate::movie::Movie;
use crate::validator::validate_movie;

const BUNDLED_MOVIES: &str = include_str!("../data/movies.json");

/// Parse and check the bundled dataset.
pub fn bundled_movies() -> Result<Vec<Movie>, SeedError> {
    parse_movies(BUNDLED_MOVIES)
}

/// Read, parse and check a dataset file.
pub fn load_movies(path: &Path) -> Result<Vec<Movie>, SeedError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let movies = parse_movies(&raw)?;
    info!(path = %path.display(), count = movies.len(), "Seed file loaded");
    Ok(movies)
}

/// Bundled dataset unless `path` is given.
pub fn initial_movies(path: Option<&Path>) -> Result<Vec<Movie>, SeedError> {
    match path {
        Some(p) => load_movies(p),
        None => bundled_movies(),
    }
}

fn parse_movies(raw: &str) -> Result<Vec<Movie>, SeedError> {
    let records: Vec<Value> = serde_json::from_str(raw)?;
    let mut seen = HashSet::new();
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let id = record
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty() && seen.insert(id.to_string()))
                .ok_or(SeedError::BadId { index })?;
            let new = validate_movie(record)
                .map_err(|errors| SeedError::InvalidMovie { index, errors })?;
            Ok(Movie::from_new(id.to_string(), new))
        })
        .collect()
}
