#![warn(clippy::all, missing_docs)]

//! Core domain logic for the daily movie-guessing game.
//!
//! This crate hosts the movie catalog, the deterministic daily selection,
//! the guess comparison that discloses only overlapping attributes, and the
//! configuration used by the command-line front end.

pub mod catalog;
pub mod config;
pub mod daily;
pub mod game;
pub mod guess;
pub mod masked;
pub mod models;
pub mod text;

pub use catalog::{Catalog, CatalogStats, SearchHit};
pub use crate::config::AppConfig;
pub use daily::{
    select_daily, select_position, DailySelector, DayBoundary, DayKey, DaySpec, SelectError,
};
pub use game::{DailyGame, GuessError};
pub use guess::{compare_guess, GuessResult, Overlap, YearRelation};
pub use masked::{MaskItem, MaskedCredits};
pub use models::{Attribute, Movie, MovieId};
