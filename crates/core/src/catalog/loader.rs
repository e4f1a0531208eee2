use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::Catalog;
use crate::models::{Movie, MovieId};

impl Catalog {
    /// Read a JSON array of movies from `path`, normalizing every list field.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog {}", path.display()))?;
        let catalog = Self::from_json(&contents)
            .with_context(|| format!("failed to parse catalog {}", path.display()))?;
        info!("loaded {} movies from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse a catalog from a JSON document.
    pub fn from_json(contents: &str) -> Result<Self> {
        let movies: Vec<Movie> =
            serde_json::from_str(contents).context("catalog is not a JSON array of movies")?;
        Ok(Self::from_movies(movies))
    }
}

/// Load the curated identity list, returning an empty list on any failure.
///
/// A missing curated list is normal; an unreadable one is logged and treated
/// the same way so selection falls back to the full catalog.
pub fn load_curated_ids(path: impl AsRef<Path>) -> Vec<MovieId> {
    let path = path.as_ref();
    match read_curated_ids(path) {
        Ok(ids) => {
            info!("loaded {} curated ids from {}", ids.len(), path.display());
            ids
        }
        Err(err) => {
            warn!("ignoring curated list {}: {err:#}", path.display());
            Vec::new()
        }
    }
}

fn read_curated_ids(path: &Path) -> Result<Vec<MovieId>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let ids = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn loads_and_normalizes_catalog() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("movies.json");
        fs::write(
            &path,
            r#"[
                {"id": 1, "title": "Bacurau", "release_year": 2019, "genres": ["Western"]},
                {"id": "tt2", "title": "Aquarius", "stars": null}
            ]"#,
        )?;

        let catalog = Catalog::load(&path)?;
        assert_eq!(catalog.len(), 2);
        let first = catalog.get_str("1").expect("numeric id should be stringified");
        assert_eq!(first.genres, vec!["Western".to_string()]);
        assert!(first.stars.is_empty());
        let second = catalog.get_str("tt2").expect("string id");
        assert_eq!(second.release_year, None);
        assert!(second.stars.is_empty());
        Ok(())
    }

    #[test]
    fn bundled_sample_catalog_parses() -> Result<()> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data/movies.json");
        let catalog = Catalog::load(path)?;
        assert_eq!(catalog.len(), 5);
        let diaries = catalog.get_str("tt0367975").expect("string id present");
        assert!(diaries.production_companies.is_empty());
        assert_eq!(catalog.stats().with_localized_title, 4);
        Ok(())
    }

    #[test]
    fn missing_catalog_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let err = Catalog::load(dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read catalog"));
    }

    #[test]
    fn malformed_catalog_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("movies.json");
        fs::write(&path, r#"{"not": "an array"}"#)?;
        assert!(Catalog::load(&path).is_err());
        Ok(())
    }

    #[test]
    fn curated_ids_accept_strings_and_numbers() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("curated.json");
        fs::write(&path, r#"["tt2", 7]"#)?;
        let ids = load_curated_ids(&path);
        assert_eq!(ids, vec![MovieId::new("tt2"), MovieId::new("7")]);
        Ok(())
    }

    #[test]
    fn curated_failures_degrade_to_empty() -> Result<()> {
        let dir = tempdir()?;
        assert!(load_curated_ids(dir.path().join("absent.json")).is_empty());

        let path = dir.path().join("broken.json");
        fs::write(&path, "not json")?;
        assert!(load_curated_ids(&path).is_empty());
        Ok(())
    }
}
