//! Request-shaped operations over one catalog and one daily selector.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    catalog::{self, Catalog, CatalogStats, SearchHit},
    config::AppConfig,
    daily::{DailySelector, DayBoundary, DaySpec, SelectError},
    guess::{compare_guess, GuessResult},
    masked::MaskedCredits,
    models::{Movie, MovieId},
};

/// A guess could not be scored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuessError {
    /// The guessed identity is not in the catalog.
    #[error("unknown movie id {0}")]
    UnknownMovie(MovieId),
    /// No secret could be chosen for the day.
    #[error(transparent)]
    Select(#[from] SelectError),
}

/// The daily game: catalog, selector, and the operations clients call.
#[derive(Debug)]
pub struct DailyGame {
    selector: DailySelector,
}

impl DailyGame {
    /// Wrap an already configured selector.
    pub fn new(selector: DailySelector) -> Self {
        Self { selector }
    }

    /// Load the catalog and curated list named in `config` and build the game.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let catalog = Arc::new(Catalog::load(&config.catalog_path)?);
        let curated = config
            .curated_path
            .as_ref()
            .map(catalog::load_curated_ids)
            .unwrap_or_default();
        let boundary = config.day_boundary().context("invalid day boundary")?;
        let override_id = config
            .override_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(MovieId::new);

        info!(
            "daily game ready: {} movies, {} curated ids, salt {:?}",
            catalog.len(),
            curated.len(),
            config.salt
        );
        let selector = DailySelector::new(catalog)
            .with_curated(curated)
            .with_override(override_id)
            .with_salt(config.salt.clone())
            .with_boundary(boundary);
        Ok(Self::new(selector))
    }

    /// The shared catalog.
    pub fn catalog(&self) -> &Catalog {
        self.selector.catalog()
    }

    /// Calendar day that `now` belongs to.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.selector.day_of(now)
    }

    /// Calendar day a caller asked for, or the current one when unspecified.
    /// Instants go through the same boundary the selector uses.
    pub fn resolve_day(&self, spec: Option<DaySpec>, now: DateTime<Utc>) -> NaiveDate {
        match spec {
            Some(spec) => spec.resolve(&self.selector.boundary()),
            None => self.today(now),
        }
    }

    /// The secret for `day`. Never hand this to a client directly.
    pub fn secret(&self, day: NaiveDate) -> Result<&Movie, SelectError> {
        self.selector.select(day)
    }

    /// Score a guess by identity against the secret of `day`.
    ///
    /// An identity that is not in the catalog is rejected before any
    /// comparison, so callers can tell it apart from a guess that simply
    /// shares nothing with the secret.
    pub fn guess(&self, guess_id: &MovieId, day: NaiveDate) -> Result<GuessResult, GuessError> {
        let guess = self
            .catalog()
            .get(guess_id)
            .ok_or_else(|| GuessError::UnknownMovie(guess_id.clone()))?;
        let secret = self.secret(day)?;
        let result = compare_guess(guess, secret);
        debug!(
            "guess {} for {day}: correct={} relation={:?}",
            guess_id, result.is_correct, result.year_relation
        );
        Ok(result)
    }

    /// Shape-only credits of the secret for `day`.
    pub fn masked_credits(&self, day: NaiveDate) -> Result<MaskedCredits, SelectError> {
        self.secret(day).map(MaskedCredits::of)
    }

    /// Title search for guess pickers.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchHit> {
        self.catalog().search(query, limit)
    }

    /// Catalog coverage counters.
    pub fn stats(&self) -> CatalogStats {
        self.catalog().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::tempdir;

    fn movie(id: &str, year: i32, genres: &[&str]) -> Movie {
        let mut movie = Movie::new(id, format!("Title {id}"));
        movie.release_year = Some(year);
        movie.genres = genres.iter().map(|g| g.to_string()).collect();
        movie
    }

    fn game_with_override(secret: &str) -> DailyGame {
        let catalog = Arc::new(Catalog::from_movies(vec![
            movie("a", 1990, &["Drama"]),
            movie("b", 2000, &["Drama", "War"]),
            movie("c", 2010, &["Comedy"]),
        ]));
        DailyGame::new(DailySelector::new(catalog).with_override(Some(MovieId::new(secret))))
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid day")
    }

    #[test]
    fn unknown_guess_is_distinct_from_no_overlap() {
        let game = game_with_override("b");
        let err = game.guess(&MovieId::new("zzz"), day()).unwrap_err();
        assert_eq!(err, GuessError::UnknownMovie(MovieId::new("zzz")));

        let result = game.guess(&MovieId::new("c"), day()).unwrap();
        assert!(!result.is_correct);
        assert!(result.overlap.genres.is_empty());
    }

    #[test]
    fn guess_scores_against_the_daily_secret() {
        let game = game_with_override("b");
        let result = game.guess(&MovieId::new("a"), day()).unwrap();
        assert_eq!(result.overlap.genres, vec!["Drama".to_string()]);
        assert!(result.film.is_none());

        let result = game.guess(&MovieId::new("b"), day()).unwrap();
        assert!(result.is_correct);
        assert_eq!(result.film.map(|m| m.id), Some(MovieId::new("b")));
    }

    #[test]
    fn empty_catalog_surfaces_select_error() {
        let game = DailyGame::new(DailySelector::new(Arc::new(Catalog::default())));
        assert_eq!(game.masked_credits(day()).unwrap_err(), SelectError::EmptyPool);
    }

    #[test]
    fn resolve_day_uses_the_configured_boundary() {
        let catalog = Arc::new(Catalog::from_movies(vec![movie("a", 1990, &[])]));
        let boundary = DayBoundary::from_minutes(120).expect("valid offset");
        let game = DailyGame::new(DailySelector::new(catalog).with_boundary(boundary));
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap();

        assert_eq!(game.resolve_day(None, now), day() + chrono::Duration::days(1));
        let instant: DaySpec = "2024-01-14T22:30:00Z".parse().unwrap();
        assert_eq!(game.resolve_day(Some(instant), now), day());
        let calendar: DaySpec = "2023-12-31".parse().unwrap();
        assert_eq!(
            game.resolve_day(Some(calendar), now),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        );
    }

    #[test]
    fn builds_from_config_files() -> Result<()> {
        let dir = tempdir()?;
        let catalog_path = dir.path().join("movies.json");
        let curated_path = dir.path().join("curated.json");
        fs::write(
            &catalog_path,
            r#"[{"id": 1, "title": "One"}, {"id": 2, "title": "Two"}, {"id": 3, "title": "Three"}]"#,
        )?;
        fs::write(&curated_path, r#"[3]"#)?;

        let config = AppConfig {
            catalog_path,
            curated_path: Some(curated_path),
            ..AppConfig::default()
        };
        let game = DailyGame::from_config(&config)?;
        assert_eq!(game.stats().total, 3);
        assert_eq!(game.secret(day())?.id.as_str(), "3");
        assert_eq!(game.search("thr", 20).len(), 1);
        Ok(())
    }

    #[test]
    fn blank_override_is_ignored() -> Result<()> {
        let dir = tempdir()?;
        let catalog_path = dir.path().join("movies.json");
        fs::write(&catalog_path, r#"[{"id": "x", "title": "X"}]"#)?;
        let config = AppConfig {
            catalog_path,
            override_id: Some("   ".to_string()),
            ..AppConfig::default()
        };
        let game = DailyGame::from_config(&config)?;
        assert_eq!(game.secret(day())?.id.as_str(), "x");
        Ok(())
    }
}
