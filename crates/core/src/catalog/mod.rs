//! The read-only movie catalog.

/// Catalog and curated-list loading from JSON files.
pub mod loader;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{
    models::{Movie, MovieId},
    text,
};

pub use loader::load_curated_ids;

/// Default number of results returned by [`Catalog::search`].
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Immutable, ordered movie list with an identity index.
///
/// Built once per process and shared behind an `Arc`; nothing mutates it
/// after construction.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    movies: Vec<Movie>,
    index: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Build a catalog preserving source order. The first movie with a given
    /// identity wins lookups.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let mut index = HashMap::with_capacity(movies.len());
        for (position, movie) in movies.iter().enumerate() {
            index.entry(movie.id.clone()).or_insert(position);
        }
        Self { movies, index }
    }

    /// All movies in source order.
    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the catalog holds no movies.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Look a movie up by identity.
    pub fn get(&self, id: &MovieId) -> Option<&Movie> {
        self.position(id).and_then(|position| self.movies.get(position))
    }

    /// Source position of the movie a lookup by `id` returns.
    pub fn position(&self, id: &MovieId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Look a movie up by a raw identity string.
    pub fn get_str(&self, id: &str) -> Option<&Movie> {
        self.get(&MovieId::new(id))
    }

    /// Resolve identities in order, silently dropping the unknown ones.
    pub fn resolve<'a>(&'a self, ids: &[MovieId]) -> Vec<&'a Movie> {
        ids.iter().filter_map(|id| self.get(id)).collect()
    }

    /// Like [`Catalog::resolve`], but yields source positions.
    pub fn resolve_positions(&self, ids: &[MovieId]) -> Vec<usize> {
        ids.iter().filter_map(|id| self.position(id)).collect()
    }

    /// Accent- and case-insensitive substring search over both titles.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        let needle = text::fold(query.trim());
        if needle.is_empty() {
            return Vec::new();
        }

        self.movies
            .iter()
            .filter(|movie| {
                text::fold(&movie.title).contains(&needle)
                    || movie
                        .title_pt
                        .as_ref()
                        .map(|value| text::fold(value).contains(&needle))
                        .unwrap_or(false)
            })
            .take(limit)
            .map(SearchHit::from)
            .collect()
    }

    /// Summary counts over the catalog.
    pub fn stats(&self) -> CatalogStats {
        let with_localized_title = self
            .movies
            .iter()
            .filter(|movie| {
                movie
                    .title_pt
                    .as_deref()
                    .map(|value| !value.trim().is_empty())
                    .unwrap_or(false)
            })
            .count();
        CatalogStats {
            total: self.movies.len(),
            with_localized_title,
        }
    }
}

/// A search result. Carries only what a picker needs to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Identity to submit as a guess.
    pub id: MovieId,
    /// Localized title when available, otherwise the original title.
    pub title: String,
    /// Original title.
    pub orig: String,
    /// Release year, if known.
    pub year: Option<i32>,
}

impl From<&Movie> for SearchHit {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id.clone(),
            title: movie.display_title().to_string(),
            orig: movie.title.clone(),
            year: movie.release_year,
        }
    }
}

/// Catalog coverage counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogStats {
    /// Number of movies.
    pub total: usize,
    /// Movies that carry a non-blank localized title.
    #[serde(rename = "com_title_pt")]
    pub with_localized_title: usize,
}
