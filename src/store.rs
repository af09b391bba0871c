//! In-memory movie store.
//!
//! The store is the system of record for the process lifetime. It is owned by
//! the service and handed to handlers as an `Arc<dyn MovieStore>`; nothing
//! reaches it through global state.
//!
//! `may_minihttp` serves connections on concurrent coroutines, so the whole
//! sequence sits behind one [`RwLock`]: reads share the lock, every
//! find-and-mutate step holds the write lock from lookup to mutation.

use parking_lot::RwLock;
use tracing::debug;

use crate::movie::{Movie, MoviePatch};

/// Read/mutate primitives over the ordered movie sequence.
pub trait MovieStore: Send + Sync {
    /// Every record, in insertion order.
    fn list(&self) -> Vec<Movie>;

    /// Record with exactly this id.
    fn find_by_id(&self, id: &str) -> Option<Movie>;

    /// Records tagged with `genre`, compared case-insensitively.
    fn filter_by_genre(&self, genre: &str) -> Vec<Movie>;

    /// Records whose director contains `needle`, compared case-insensitively.
    fn filter_by_director(&self, needle: &str) -> Vec<Movie>;

    /// Add a record at the end; returns the stored record.
    fn append(&self, movie: Movie) -> Movie;

    /// Merge `patch` over the record with this id; returns the merged record.
    fn replace_at(&self, id: &str, patch: MoviePatch) -> Option<Movie>;

    /// Remove the first record with this id. Returns `false` when absent.
    fn remove_by_id(&self, id: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// [`MovieStore`] backed by a `Vec` under a single lock. Lookups are linear scans.
#[derive(Debug, Default)]
pub struct InMemoryMovieStore {
    movies: RwLock<Vec<Movie>>,
}

impl InMemoryMovieStore {
    #[must_use]
    pub fn new(seed: Vec<Movie>) -> Self {
        Self {
            movies: RwLock::new(seed),
        }
    }

    fn filter<F>(&self, pred: F) -> Vec<Movie>
    where
        F: Fn(&Movie) -> bool,
    {
        self.movies
            .read()
            .iter()
            .filter(|m| pred(m))
            .cloned()
            .collect()
    }
}

impl MovieStore for InMemoryMovieStore {
    fn list(&self) -> Vec<Movie> {
        self.movies.read().clone()
    }

    fn find_by_id(&self, id: &str) -> Option<Movie> {
        self.movies.read().iter().find(|m| m.id == id).cloned()
    }

    fn filter_by_genre(&self, genre: &str) -> Vec<Movie> {
        self.filter(|m| m.has_genre(genre))
    }

    fn filter_by_director(&self, needle: &str) -> Vec<Movie> {
        self.filter(|m| m.directed_by(needle))
    }

    fn append(&self, movie: Movie) -> Movie {
        let mut movies = self.movies.write();
        movies.push(movie.clone());
        debug!(movie_id = %movie.id, total = movies.len(), "Movie appended");
        movie
    }

    fn replace_at(&self, id: &str, patch: MoviePatch) -> Option<Movie> {
        let mut movies = self.movies.write();
        let movie = movies.iter_mut().find(|m| m.id == id)?;
        movie.apply(patch);
        debug!(movie_id = %id, "Movie updated");
        Some(movie.clone())
    }

    fn remove_by_id(&self, id: &str) -> bool {
        let mut movies = self.movies.write();
        match movies.iter().position(|m| m.id == id) {
            Some(idx) => {
                movies.remove(idx);
                debug!(movie_id = %id, total = movies.len(), "Movie removed");
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.movies.read().len()
    }
}
