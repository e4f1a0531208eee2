//! Comparing a guess against the secret movie.
//!
//! The result carries only what the guess already knows: per-category
//! values that appear in both movies (taken from the guess's own lists), a
//! coarse year relation, and the guess's own year. The secret record is
//! attached only when the guess is the secret.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::{Attribute, Movie};

/// Where the guessed year sits relative to the secret's year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YearRelation {
    /// The guess was released before the secret.
    Lt,
    /// The guess was released after the secret.
    Gt,
    /// Same release year.
    Eq,
}

impl YearRelation {
    /// Relation of `guess` to `secret`, or `None` when either is unknown.
    pub fn between(guess: Option<i32>, secret: Option<i32>) -> Option<Self> {
        let (guess, secret) = (guess?, secret?);
        Some(match guess.cmp(&secret) {
            std::cmp::Ordering::Less => YearRelation::Lt,
            std::cmp::Ordering::Greater => YearRelation::Gt,
            std::cmp::Ordering::Equal => YearRelation::Eq,
        })
    }
}

/// Values shared between the guess and the secret. Empty categories are
/// omitted on the wire, as is `release_year` unless the years are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Overlap {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stars: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directors: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub writers: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub production_companies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub countries_origin: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filming_locations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub languages: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<i32>,
}

impl Overlap {
    /// Shared values for one category.
    pub fn values(&self, attribute: Attribute) -> &[String] {
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

    /// Mutable access to one category.
    pub fn values_mut(&mut self, attribute: Attribute) -> &mut Vec<String> {
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

    /// True when nothing overlaps.
    pub fn is_empty(&self) -> bool {
        self.release_year.is_none()
            && Attribute::ALL
                .iter()
                .all(|&attribute| self.values(attribute).is_empty())
    }
}

/// Response to a single guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessResult {
    /// Whether the guess is the secret.
    pub is_correct: bool,
    /// Shared values.
    pub overlap: Overlap,
    /// Guess year relative to the secret year; `null` when either is unknown.
    pub year_relation: Option<YearRelation>,
    /// The guess's own release year.
    pub guess_year: Option<i32>,
    /// The full secret, present only on a correct guess.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub film: Option<Movie>,
}

/// Compare `guess` with `secret`.
pub fn compare_guess(guess: &Movie, secret: &Movie) -> GuessResult {
    let is_correct = guess.id == secret.id;

    let mut overlap = Overlap::default();
    for attribute in Attribute::ALL {
        *overlap.values_mut(attribute) =
            intersect(guess.attribute(attribute), secret.attribute(attribute));
    }

    let year_relation = YearRelation::between(guess.release_year, secret.release_year);
    if year_relation == Some(YearRelation::Eq) {
        overlap.release_year = guess.release_year;
    }

    GuessResult {
        is_correct,
        overlap,
        year_relation,
        guess_year: guess.release_year,
        film: is_correct.then(|| secret.clone()),
    }
}

/// Elements of `guess` that also appear in `secret`, in `guess` order,
/// duplicates kept. Exact, case-sensitive comparison.
fn intersect(guess: &[String], secret: &[String]) -> Vec<String> {
    if guess.is_empty() || secret.is_empty() {
        return Vec::new();
    }
    let secret: HashSet<&str> = secret.iter().map(String::as_str).collect();
    guess
        .iter()
        .filter(|value| secret.contains(value.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn movie(id: &str, title: &str, year: Option<i32>) -> Movie {
        let mut movie = Movie::new(id, title);
        movie.release_year = year;
        movie
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn intersection_follows_guess_order_and_case() {
        let mut guess = movie("g", "Guess", None);
        let mut secret = movie("s", "Secret", None);
        guess.genres = strings(&["Drama", "Action"]);
        secret.genres = strings(&["Action", "Thriller"]);
        guess.languages = strings(&["english", "Portuguese", "Portuguese"]);
        secret.languages = strings(&["English", "Portuguese"]);

        let result = compare_guess(&guess, &secret);
        assert_eq!(result.overlap.genres, strings(&["Action"]));
        assert_eq!(result.overlap.languages, strings(&["Portuguese", "Portuguese"]));
        assert!(result.overlap.stars.is_empty());
    }

    #[test]
    fn earlier_guess_year_is_lt_without_revealing() {
        let result = compare_guess(&movie("g", "G", Some(1990)), &movie("s", "S", Some(2000)));
        assert_eq!(result.year_relation, Some(YearRelation::Lt));
        assert_eq!(result.guess_year, Some(1990));
        assert_eq!(result.overlap.release_year, None);

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["yearRelation"], json!("lt"));
        assert!(value["overlap"].get("release_year").is_none());
        assert!(!value.to_string().contains("2000"));
    }

    #[test]
    fn later_guess_year_is_gt() {
        let result = compare_guess(&movie("g", "G", Some(2010)), &movie("s", "S", Some(2000)));
        assert_eq!(result.year_relation, Some(YearRelation::Gt));
        assert_eq!(result.overlap.release_year, None);
    }

    #[test]
    fn equal_year_is_revealed() {
        let result = compare_guess(&movie("g", "G", Some(2000)), &movie("s", "S", Some(2000)));
        assert_eq!(result.year_relation, Some(YearRelation::Eq));
        assert_eq!(result.overlap.release_year, Some(2000));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["overlap"]["release_year"], json!(2000));
        assert_eq!(value["yearRelation"], json!("eq"));
    }

    #[test]
    fn missing_year_gives_null_relation() {
        for (guess, secret) in [(None, Some(2000)), (Some(2000), None), (None, None)] {
            let result = compare_guess(&movie("g", "G", guess), &movie("s", "S", secret));
            assert_eq!(result.year_relation, None);
            let value = serde_json::to_value(&result).unwrap();
            assert!(value["yearRelation"].is_null());
            assert!(value["overlap"].get("release_year").is_none());
        }
    }

    #[test]
    fn incorrect_guess_never_leaks_the_secret() {
        let mut guess = movie("g1", "Guess Title", Some(1999));
        guess.stars = strings(&["Shared Star", "Only Guess"]);
        guess.directors = strings(&["Guess Director"]);
        let mut secret = movie("secret-id", "Secret Title", Some(2004));
        secret.title_pt = Some("Título Secreto".to_string());
        secret.stars = strings(&["Hidden Star", "Shared Star"]);
        secret.directors = strings(&["Hidden Director"]);
        secret.genres = strings(&["Hidden Genre"]);

        let result = compare_guess(&guess, &secret);
        assert!(!result.is_correct);
        assert!(result.film.is_none());
        for attribute in Attribute::ALL {
            for value in result.overlap.values(attribute) {
                assert!(guess.attribute(attribute).contains(value));
            }
        }

        let serialized = serde_json::to_string(&result).unwrap();
        for secret_only in [
            "secret-id",
            "Secret Title",
            "Título Secreto",
            "Hidden Star",
            "Hidden Director",
            "Hidden Genre",
            "2004",
        ] {
            assert!(!serialized.contains(secret_only), "leaked {secret_only}");
        }
        let value: serde_json::Value = serde_json::from_str(&serialized).unwrap();
        assert!(value.get("film").is_none());
        assert_eq!(value["overlap"], json!({"stars": ["Shared Star"]}));
    }

    #[test]
    fn correct_guess_reveals_full_record() {
        let mut secret = movie("42", "The Secret", Some(2001));
        secret.genres = strings(&["Drama"]);
        let result = compare_guess(&secret.clone(), &secret);
        assert!(result.is_correct);
        assert_eq!(result.film.as_ref(), Some(&secret));
        assert_eq!(result.year_relation, Some(YearRelation::Eq));
        assert_eq!(result.overlap.genres, strings(&["Drama"]));

        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isCorrect"], json!(true));
        assert_eq!(value["film"]["title"], json!("The Secret"));
    }

    #[test]
    fn nothing_in_common_yields_empty_overlap() {
        let mut guess = movie("a", "A", None);
        guess.genres = strings(&["Comedy"]);
        let mut secret = movie("b", "B", None);
        secret.genres = strings(&["Horror"]);
        let result = compare_guess(&guess, &secret);
        assert!(result.overlap.is_empty());
        assert_eq!(serde_json::to_value(&result.overlap).unwrap(), json!({}));
    }
}
