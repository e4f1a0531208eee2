//! Layered application configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `FILMLE_*` environment variables (for example `FILMLE_OVERRIDE_ID`).

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::daily::{DayBoundary, DEFAULT_SALT, DEFAULT_UTC_OFFSET_MINUTES};

/// Directory under the user's config dir holding `config.toml`.
pub const CONFIG_DIR: &str = "filmle";

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FILMLE";

const DEFAULT_CONFIG: &str = r#"# Movie catalog: a JSON array of movies.
catalog_path = "movies.json"

# Optional JSON array of movie ids to draw the daily movie from.
# curated_path = "curated.json"

# Force a specific daily movie (also settable with FILMLE_OVERRIDE_ID).
# override_id = "123"

# Changing the salt reshuffles which movie lands on which day.
salt = "v1"

# Day boundary as a fixed offset from UTC in minutes (-180 is UTC-03:00).
utc_offset_minutes = -180
"#;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Catalog JSON file.
    pub catalog_path: PathBuf,
    /// Optional curated id list.
    pub curated_path: Option<PathBuf>,
    /// Manual daily override.
    pub override_id: Option<String>,
    /// Day-key salt; empty means unsalted keys.
    pub salt: String,
    /// Day boundary offset from UTC, in minutes.
    pub utc_offset_minutes: i32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("movies.json"),
            curated_path: None,
            override_id: None,
            salt: DEFAULT_SALT.to_string(),
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
        }
    }
}

impl AppConfig {
    /// Load from the default config file location plus the environment.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` (which may be absent) plus the environment.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Self::load_layers(path.as_ref(), Environment::with_prefix(ENV_PREFIX))
    }

    // Environment values stay strings so ids such as `0042` keep their text;
    // the numeric keys are parsed during deserialization.
    fn load_layers(path: &Path, environment: Environment) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(environment)
            .build()
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = settings
            .try_deserialize()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    /// Day boundary derived from `utc_offset_minutes`.
    pub fn day_boundary(&self) -> Result<DayBoundary> {
        DayBoundary::from_minutes(self.utc_offset_minutes).ok_or_else(|| {
            anyhow!(
                "utc_offset_minutes {} is not within one day of UTC",
                self.utc_offset_minutes
            )
        })
    }
}

/// Default config file path.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR)
        .join("config.toml")
}

/// Write a commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<()> {
    write_default_config(config_path())
}

fn write_default_config(path: PathBuf) -> Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create config directory {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write config {}", path.display()))?;
    info!("wrote default config to {}", path.display());
    Ok(())
}
