//! Interactive guessing loop and the client-side view it accumulates.

use std::fmt;

use anyhow::Result;
use chrono::NaiveDate;
use filmle_core::{
    catalog::DEFAULT_SEARCH_LIMIT, Attribute, DailyGame, GuessError, GuessResult, Movie, MovieId,
    Overlap, YearRelation,
};
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// What the player has learned about the secret's release year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YearBracket {
    lower: Option<i32>,
    upper: Option<i32>,
    exact: Option<i32>,
}

impl YearBracket {
    /// Narrow the bracket using one guess's year and its relation.
    pub fn narrow(&mut self, guess_year: Option<i32>, relation: Option<YearRelation>) {
        let (Some(year), Some(relation)) = (guess_year, relation) else {
            return;
        };
        match relation {
            YearRelation::Eq => self.exact = Some(year),
            YearRelation::Lt => {
                let bound = year.saturating_add(1);
                self.lower = Some(self.lower.map_or(bound, |lower| lower.max(bound)));
            }
            YearRelation::Gt => {
                let bound = year.saturating_sub(1);
                self.upper = Some(self.upper.map_or(bound, |upper| upper.min(bound)));
            }
        }
    }

    /// The exact year, once a guess has matched it.
    pub fn exact(&self) -> Option<i32> {
        self.exact
    }
}

impl fmt::Display for YearBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(year) = self.exact {
            return write!(f, "{year}");
        }
        let show = |bound: Option<i32>| bound.map_or_else(|| "?".to_string(), |y| y.to_string());
        write!(f, "{} to {}", show(self.lower), show(self.upper))
    }
}

/// Running state of one player's day.
#[derive(Debug, Clone)]
pub struct PlaySession {
    day: NaiveDate,
    guesses: Vec<MovieId>,
    known: Overlap,
    years: YearBracket,
    solved: Option<Movie>,
}

impl PlaySession {
    /// Fresh session for `day`.
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            guesses: Vec::new(),
            known: Overlap::default(),
            years: YearBracket::default(),
            solved: None,
        }
    }

    /// Fold a scored guess into the session.
    pub fn record(&mut self, guess_id: MovieId, result: &GuessResult) {
        self.guesses.push(guess_id);
        for attribute in Attribute::ALL {
            let known = self.known.values_mut(attribute);
            for value in result.overlap.values(attribute) {
                if !known.contains(value) {
                    known.push(value.clone());
                }
            }
        }
        self.years.narrow(result.guess_year, result.year_relation);
        if self.years.exact().is_some() {
            self.known.release_year = self.years.exact();
        }
        if result.is_correct {
            self.solved = result.film.clone();
        }
    }

    /// Credits revealed so far, across all guesses.
    pub fn known(&self) -> &Overlap {
        &self.known
    }

    /// Year knowledge so far.
    pub fn years(&self) -> YearBracket {
        self.years
    }

    /// Number of scored guesses.
    pub fn attempts(&self) -> usize {
        self.guesses.len()
    }

    /// Whether `id` was already guessed.
    pub fn already_guessed(&self, id: &MovieId) -> bool {
        self.guesses.contains(id)
    }

    /// The revealed secret, once solved.
    pub fn solved(&self) -> Option<&Movie> {
        self.solved.as_ref()
    }
}

/// Read commands from stdin until the movie is found or input ends.
///
/// `?text` searches titles, `quit` leaves, anything else is a movie id.
pub async fn run(game: &DailyGame, day: NaiveDate) -> Result<()> {
    let mut session = PlaySession::new(day);
    let mut lines = BufReader::new(io::stdin()).lines();

    println!("Movie of {day}. Type ?title to search, a movie id to guess, quit to leave.");
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("quit") {
            break;
        }
        if let Some(query) = input.strip_prefix('?') {
            for hit in game.search(query, DEFAULT_SEARCH_LIMIT) {
                let year = hit.year.map_or_else(|| "----".to_string(), |y| y.to_string());
                println!("  {:>10}  {year}  {}", hit.id, hit.title);
            }
            continue;
        }

        let id = MovieId::new(input);
        if session.already_guessed(&id) {
            println!("Already guessed {id}.");
            continue;
        }
        match game.guess(&id, session.day) {
            Ok(result) => {
                session.record(id, &result);
                print_progress(&session, &result);
                if let Some(movie) = session.solved() {
                    println!(
                        "Correct! {} ({}) in {} guesses.",
                        movie.display_title(),
                        movie
                            .release_year
                            .map_or_else(|| "?".to_string(), |y| y.to_string()),
                        session.attempts()
                    );
                    break;
                }
            }
            Err(GuessError::UnknownMovie(id)) => println!("No movie with id {id}."),
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn print_progress(session: &PlaySession, result: &GuessResult) {
    if result.overlap.is_empty() {
        println!("Nothing in common.");
    }
    for attribute in Attribute::ALL {
        let known = session.known().values(attribute);
        if !known.is_empty() {
            println!("  {:<20} {}", attribute.key(), known.join(", "));
        }
    }
    println!("  {:<20} {}", "release_year", session.years());
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmle_core::compare_guess;

    fn movie(id: &str, year: Option<i32>, genres: &[&str]) -> Movie {
        let mut movie = Movie::new(id, format!("Title {id}"));
        movie.release_year = year;
        movie.genres = genres.iter().map(|g| g.to_string()).collect();
        movie
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid day")
    }

    #[test]
    fn bracket_narrows_from_both_sides() {
        let mut bracket = YearBracket::default();
        assert_eq!(bracket.to_string(), "? to ?");
        bracket.narrow(Some(1990), Some(YearRelation::Lt));
        bracket.narrow(Some(1985), Some(YearRelation::Lt));
        bracket.narrow(Some(2010), Some(YearRelation::Gt));
        bracket.narrow(Some(2015), Some(YearRelation::Gt));
        bracket.narrow(None, Some(YearRelation::Gt));
        assert_eq!(bracket.to_string(), "1991 to 2009");
        bracket.narrow(Some(2001), Some(YearRelation::Eq));
        assert_eq!(bracket.to_string(), "2001");
    }

    #[test]
    fn session_accumulates_overlaps() {
        let secret = movie("s", Some(2000), &["Drama", "War", "History"]);
        let first = movie("a", Some(1990), &["War", "Drama"]);
        let second = movie("b", Some(2005), &["Drama", "History"]);

        let mut session = PlaySession::new(day());
        session.record(first.id.clone(), &compare_guess(&first, &secret));
        session.record(second.id.clone(), &compare_guess(&second, &secret));

        assert_eq!(session.attempts(), 2);
        assert_eq!(
            session.known().genres,
            vec!["War".to_string(), "Drama".to_string(), "History".to_string()]
        );
        assert_eq!(session.years().to_string(), "1991 to 2004");
        assert!(session.solved().is_none());
        assert!(session.already_guessed(&MovieId::new("a")));

        session.record(secret.id.clone(), &compare_guess(&secret, &secret));
        assert_eq!(session.solved().map(|m| m.id.as_str()), Some("s"));
        assert_eq!(session.known().release_year, Some(2000));
    }
}
