//! Deterministic selection of the movie of the day.
//!
//! The secret is never stored. It is recomputed from the calendar day, the
//! catalog, the curated pool and an optional override, so every replica
//! with the same inputs agrees on the same movie without coordination.
//!
//! The day is turned into a key (`YYYY-MM-DD|salt`), the key is hashed with
//! a 31-multiplier rolling hash over 32-bit unsigned arithmetic, and the hash
//! indexes the candidate pool. Changing the salt reshuffles the mapping from
//! days to movies without touching date semantics.

use std::{fmt, str::FromStr, sync::Arc};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    catalog::Catalog,
    models::{Movie, MovieId},
};

/// Default day-key salt.
pub const DEFAULT_SALT: &str = "v1";

/// Default day boundary: UTC−03:00, no daylight saving.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Selection failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
    /// Neither the curated pool nor the catalog holds any movie.
    #[error("no movies available for daily selection")]
    EmptyPool,
}

/// A caller-supplied day string could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognised date {input:?}; expected YYYY-MM-DD or an RFC 3339 timestamp")]
pub struct DayParseError {
    input: String,
}

/// Offset at which one calendar day rolls over to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    offset: FixedOffset,
}

impl DayBoundary {
    /// Boundary at a fixed offset from UTC, in minutes (east positive).
    /// Returns `None` when the offset is a day or more away from UTC.
    pub fn from_minutes(minutes: i32) -> Option<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
    }

    /// The underlying offset.
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Calendar day of `instant` as seen at this boundary's offset.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset).date_naive()
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::from_minutes(DEFAULT_UTC_OFFSET_MINUTES).expect("default offset is in range")
    }
}

/// A day as requested by a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySpec {
    /// A plain calendar day, used as is.
    Calendar(NaiveDate),
    /// A point in time, mapped to a day through a [`DayBoundary`].
    Instant(DateTime<Utc>),
}

impl DaySpec {
    /// Resolve to a calendar day.
    pub fn resolve(&self, boundary: &DayBoundary) -> NaiveDate {
        match self {
            DaySpec::Calendar(day) => *day,
            DaySpec::Instant(instant) => boundary.day_of(*instant),
        }
    }
}

impl FromStr for DaySpec {
    type Err = DayParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(day) = NaiveDate::parse_from_str(trimmed, DAY_FORMAT) {
            return Ok(DaySpec::Calendar(day));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|instant| DaySpec::Instant(instant.with_timezone(&Utc)))
            .map_err(|_| DayParseError {
                input: s.to_string(),
            })
    }
}

/// The salted string a day is hashed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DayKey(String);

impl DayKey {
    /// `YYYY-MM-DD|salt`, or the bare date when `salt` is empty.
    pub fn new(day: NaiveDate, salt: &str) -> Self {
        let date = day.format(DAY_FORMAT);
        if salt.is_empty() {
            Self(date.to_string())
        } else {
            Self(format!("{date}|{salt}"))
        }
    }

    /// The key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rolling hash of the key.
    pub fn hash(&self) -> u32 {
        rolling_hash(&self.0)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `hash = hash * 31 + unit (mod 2^32)` over the UTF-16 code units of `input`,
/// starting from zero.
pub fn rolling_hash(input: &str) -> u32 {
    input
        .encode_utf16()
        .fold(0u32, |hash, unit| {
            hash.wrapping_mul(31).wrapping_add(u32::from(unit))
        })
}

/// Pick the secret movie for `day`.
///
/// An override that resolves in the catalog wins outright. Otherwise the
/// curated ids that resolve form the pool, falling back to the whole catalog
/// when none do, and the day key's hash indexes into it.
pub fn select_daily<'a>(
    day: NaiveDate,
    catalog: &'a Catalog,
    curated: &[MovieId],
    override_id: Option<&MovieId>,
    salt: &str,
) -> Result<&'a Movie, SelectError> {
    let position = select_position(day, catalog, curated, override_id, salt)?;
    catalog
        .movies()
        .get(position)
        .ok_or(SelectError::EmptyPool)
}

/// Catalog position of the secret for `day`, under the rules of [`select_daily`].
///
/// Positions stay unambiguous when the catalog repeats an identity.
pub fn select_position(
    day: NaiveDate,
    catalog: &Catalog,
    curated: &[MovieId],
    override_id: Option<&MovieId>,
    salt: &str,
) -> Result<usize, SelectError> {
    if let Some(position) = override_id.and_then(|id| catalog.position(id)) {
        debug!("daily override in effect for {day}");
        return Ok(position);
    }

    let key = DayKey::new(day, salt);
    let hash = key.hash();
    let curated_pool = catalog.resolve_positions(curated);

    let position = if curated_pool.is_empty() {
        pick(catalog.len(), hash)
    } else {
        pick(curated_pool.len(), hash).map(|index| curated_pool[index])
    };
    debug!(
        "selected daily movie for {key} (hash {hash}, curated pool {})",
        curated_pool.len()
    );
    position.ok_or(SelectError::EmptyPool)
}

fn pick(len: usize, hash: u32) -> Option<usize> {
    // u32 always fits in u64, and the remainder is below len.
    (len > 0).then(|| (u64::from(hash) % len as u64) as usize)
}

/// Bundles the selection inputs and memoizes the most recent day's secret.
#[derive(Debug)]
pub struct DailySelector {
    catalog: Arc<Catalog>,
    curated: Vec<MovieId>,
    override_id: Option<MovieId>,
    salt: String,
    boundary: DayBoundary,
    last: RwLock<Option<(NaiveDate, usize)>>,
}

impl DailySelector {
    /// Selector over the full catalog with default salt and boundary.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            curated: Vec::new(),
            override_id: None,
            salt: DEFAULT_SALT.to_string(),
            boundary: DayBoundary::default(),
            last: RwLock::new(None),
        }
    }

    /// Restrict selection to a curated list.
    pub fn with_curated(mut self, curated: Vec<MovieId>) -> Self {
        let resolved = self.catalog.resolve(&curated).len();
        if resolved < curated.len() {
            warn!(
                "{} of {} curated ids are not in the catalog",
                curated.len() - resolved,
                curated.len()
            );
        }
        self.curated = curated;
        self.reset();
        self
    }

    /// Force a specific movie. Ignored, with a warning, when it does not resolve.
    pub fn with_override(mut self, override_id: Option<MovieId>) -> Self {
        if let Some(id) = &override_id {
            if self.catalog.get(id).is_none() {
                warn!("daily override {id} is not in the catalog; ignoring it");
            }
        }
        self.override_id = override_id;
        self.reset();
        self
    }

    /// Change the day-key salt.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self.reset();
        self
    }

    /// Change the day boundary.
    pub fn with_boundary(mut self, boundary: DayBoundary) -> Self {
        self.boundary = boundary;
        self
    }

    /// Shared catalog.
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Configured day boundary.
    pub fn boundary(&self) -> DayBoundary {
        self.boundary
    }

    /// Calendar day of `instant` at the configured boundary.
    pub fn day_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.boundary.day_of(instant)
    }

    /// Secret movie for `day`.
    pub fn select(&self, day: NaiveDate) -> Result<&Movie, SelectError> {
        let cached = match *self.last.read() {
            Some((cached_day, position)) if cached_day == day => Some(position),
            _ => None,
        };
        let position = match cached {
            Some(position) => position,
            None => {
                let position = select_position(
                    day,
                    &self.catalog,
                    &self.curated,
                    self.override_id.as_ref(),
                    &self.salt,
                )?;
                *self.last.write() = Some((day, position));
                position
            }
        };
        self.catalog
            .movies()
            .get(position)
            .ok_or(SelectError::EmptyPool)
    }

    /// Secret movie for the day containing `instant`.
    pub fn select_at(&self, instant: DateTime<Utc>) -> Result<&Movie, SelectError> {
        self.select(self.day_of(instant))
    }

    fn reset(&mut self) {
        *self.last.get_mut() = None;
    }
}
