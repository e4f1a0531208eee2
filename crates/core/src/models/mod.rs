//! Shared domain models.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Stable identity of a movie, always compared as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    /// Wrap an identity string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identity as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MovieId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl<'de> Deserialize<'de> for MovieId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Self(text),
            RawId::Number(number) => Self(number.to_string()),
        })
    }
}

/// A catalog entry. All list fields are always present once deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identity.
    pub id: MovieId,
    /// Original title.
    pub title: String,
    /// Localized (Portuguese) title, when the source has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_pt: Option<String>,
    /// Release year; non-integer source values are treated as missing.
    #[serde(default, deserialize_with = "lenient_year")]
    pub release_year: Option<i32>,
    /// Cast members.
    #[serde(default, deserialize_with = "lenient_list")]
    pub stars: Vec<String>,
    /// Directors.
    #[serde(default, deserialize_with = "lenient_list")]
    pub directors: Vec<String>,
    /// Writers.
    #[serde(default, deserialize_with = "lenient_list")]
    pub writers: Vec<String>,
    /// Production companies.
    #[serde(default, deserialize_with = "lenient_list")]
    pub production_companies: Vec<String>,
    /// Countries of origin.
    #[serde(default, deserialize_with = "lenient_list")]
    pub countries_origin: Vec<String>,
    /// Filming locations.
    #[serde(default, deserialize_with = "lenient_list")]
    pub filming_locations: Vec<String>,
    /// Genres.
    #[serde(default, deserialize_with = "lenient_list")]
    pub genres: Vec<String>,
    /// Spoken languages.
    #[serde(default, deserialize_with = "lenient_list")]
    pub languages: Vec<String>,
}

impl Movie {
    /// Build a movie with the given identity and title and no other data.
    pub fn new(id: impl Into<MovieId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            title_pt: None,
            release_year: None,
            stars: Vec::new(),
            directors: Vec::new(),
            writers: Vec::new(),
            production_companies: Vec::new(),
            countries_origin: Vec::new(),
            filming_locations: Vec::new(),
            genres: Vec::new(),
            languages: Vec::new(),
        }
    }

    /// Returns the localized title when present, otherwise the original title.
    pub fn display_title(&self) -> &str {
        match self.title_pt.as_deref().map(str::trim) {
            Some(localized) if !localized.is_empty() => localized,
            _ => &self.title,
        }
    }

    /// Borrow the values stored for a list attribute.
    pub fn attribute(&self, attribute: Attribute) -> &[String] {
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

    /// Mutable access to a list attribute.
    pub fn attribute_mut(&mut self, attribute: Attribute) -> &mut Vec<String> {
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

/// The eight multi-valued categories a guess is compared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum Attribute {
    Stars,
    Directors,
    Writers,
    ProductionCompanies,
    CountriesOrigin,
    FilmingLocations,
    Genres,
    Languages,
}

impl Attribute {
    /// Every category, in response order.
    pub const ALL: [Attribute; 8] = [
        Attribute::Stars,
        Attribute::Directors,
        Attribute::Writers,
        Attribute::ProductionCompanies,
        Attribute::CountriesOrigin,
        Attribute::FilmingLocations,
        Attribute::Genres,
        Attribute::Languages,
    ];

    /// Key used for this category on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Attribute::Stars => "stars",
            Attribute::Directors => "directors",
            Attribute::Writers => "writers",
            Attribute::ProductionCompanies => "production_companies",
            Attribute::CountriesOrigin => "countries_origin",
            Attribute::FilmingLocations => "filming_locations",
            Attribute::Genres => "genres",
            Attribute::Languages => "languages",
        }
    }
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_i64().and_then(|year| i32::try_from(year).ok()))
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text),
            Value::Number(number) => Some(number.to_string()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        })
        .collect())
}
