//! Shape-only view of the secret movie's credits.
//!
//! Every credit of the secret is published as a slug key plus a mask that
//! keeps punctuation and spacing but hides each letter as `X`/`x`. Clients
//! use the key to line up a revealed overlap value with its masked slot.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{
    models::{Attribute, Movie},
    text,
};

static UPPER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-ZÀ-ÖØ-Ý]").expect("invalid uppercase regex"));
static LOWER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[a-zà-öø-ÿ]").expect("invalid lowercase regex"));
static SLUG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("invalid slug regex"));

/// One masked credit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskItem {
    /// Stable slug matching the value once it is revealed.
    pub key: String,
    /// The value with every letter replaced.
    pub mask: String,
}

impl MaskItem {
    /// Mask a single credit value.
    pub fn of(value: &str) -> Self {
        Self {
            key: keyify(value),
            mask: mask_text(value),
        }
    }
}

/// Masked credits of a movie, one list per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct MaskedCredits {
    pub stars: Vec<MaskItem>,
    pub directors: Vec<MaskItem>,
    pub writers: Vec<MaskItem>,
    pub production_companies: Vec<MaskItem>,
    pub countries_origin: Vec<MaskItem>,
    pub filming_locations: Vec<MaskItem>,
    pub genres: Vec<MaskItem>,
    pub languages: Vec<MaskItem>,
}

impl MaskedCredits {
    /// Mask every list attribute of `movie`. Title, year and id are not included.
    pub fn of(movie: &Movie) -> Self {
        let mut credits = Self::default();
        for attribute in Attribute::ALL {
            *credits.items_mut(attribute) = movie
                .attribute(attribute)
                .iter()
                .map(|value| MaskItem::of(value))
                .collect();
        }
        credits
    }

    /// Masked items for one category.
    pub fn items(&self, attribute: Attribute) -> &[MaskItem] {
        match attribute {
            Attribute::Stars => &self.stars,
            Attribute::Directors => &self.directors,
            Attribute::Writers => &self.writers,
            Attribute::ProductionCompanies => &self.production_companies,
            Attribute::CountriesOrigin => &self.countries_origin,
            Attribute::FilmingLocations => &self.filming_locations,
            Attribute::Genres => &self.genres,
            Attribute::Languages => &self.languages,
        }
    }

    fn items_mut(&mut self, attribute: Attribute) -> &mut Vec<MaskItem> {
        match attribute {
            Attribute::Stars => &mut self.stars,
            Attribute::Directors => &mut self.directors,
            Attribute::Writers => &mut self.writers,
            Attribute::ProductionCompanies => &mut self.production_companies,
            Attribute::CountriesOrigin => &mut self.countries_origin,
            Attribute::FilmingLocations => &mut self.filming_locations,
            Attribute::Genres => &mut self.genres,
            Attribute::Languages => &mut self.languages,
        }
    }
}

/// Replace uppercase letters with `X` and lowercase letters with `x`.
pub fn mask_text(text: &str) -> String {
    let upper = UPPER_RE.replace_all(text, "X");
    LOWER_RE.replace_all(&upper, "x").into_owned()
}

/// Stable slug: accents folded, lowercased, non-alphanumeric runs become `-`.
pub fn keyify(text: &str) -> String {
    let folded = text::fold(text);
    SLUG_SEPARATOR_RE
        .split(&folded)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
