//! Manual poster table loaded from a TOML data file.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PosterOverrides {
    #[serde(default)]
    posters: HashMap<String, String>,
}

impl PosterOverrides {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse poster overrides")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read poster overrides: {}", path.display()))?;
        let overrides = Self::parse(&content)?;
        info!(
            "Loaded {} poster overrides from {}",
            overrides.len(),
            path.display()
        );
        Ok(overrides)
    }

    /// Loads the table, or an empty one when the file is missing or broken.
    #[must_use]
    pub fn load_or_empty(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            warn!("Ignoring poster overrides: {e:#}");
            Self::default()
        })
    }

    #[must_use]
    pub fn get(&self, anime_id: i64) -> Option<&str> {
        self.posters
            .get(&anime_id.to_string())
            .map(String::as_str)
            .filter(|url| !url.trim().is_empty())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.posters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posters.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let overrides = PosterOverrides::parse(
            r#"
            [posters]
            4224 = "https://example.org/4224.webp"
            1 = ""
            "#,
        )
        .unwrap();

        assert_eq!(overrides.get(4224), Some("https://example.org/4224.webp"));
        assert_eq!(overrides.get(1), None);
        assert_eq!(overrides.get(2), None);
    }

    #[test]
    fn test_bundled_table_parses() {
        let content = include_str!("../data/poster_overrides.toml");
        let overrides = PosterOverrides::parse(content).unwrap();
        assert_eq!(overrides.len(), 9);
        assert!(overrides.get(59986).is_none());
        assert!(overrides.get(56907).is_some());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let overrides = PosterOverrides::load_or_empty(Path::new("/nonexistent/overrides.toml"));
        assert!(overrides.is_empty());
    }
}
