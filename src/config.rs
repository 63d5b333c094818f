use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub tracker: TrackerConfig,

    pub sheets: SheetsConfig,

    pub cache: CacheConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// TOML file with manual per-id poster URLs.
    pub overrides_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub database_path: String,

    pub log_level: String,

    /// Number of tokio worker threads (default: 2)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,

    pub max_db_connections: u32,

    pub min_db_connections: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            database_path: "sqlite:data/mediashelf.db".to_string(),
            log_level: "info".to_string(),
            worker_threads: 2,
            max_db_connections: 5,
            min_db_connections: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Site root; REST lives under `/api`, images are relative to it.
    pub base_url: String,

    pub graphql_url: String,

    /// Sent with every request, the tracker rejects anonymous clients.
    pub user_agent: String,

    /// Owner of the rating list.
    pub nickname: String,

    pub status: String,

    /// Records per list page (the tracker caps this at 500).
    pub page_size: usize,

    pub request_timeout_seconds: u64,
}

impl TrackerConfig {
    /// Cache key of the owner's rating list.
    #[must_use]
    pub fn rates_cache_key(&self) -> String {
        format!("anime_list_{}_{}", self.nickname, self.status)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://shikimori.one".to_string(),
            graphql_url: "https://shikimori.one/api/graphql".to_string(),
            user_agent: "AnimeLibrary/1.0".to_string(),
            nickname: "BcA9HuK".to_string(),
            status: "completed".to_string(),
            page_size: 500,
            request_timeout_seconds: 30,
        }
    }
}

const SHEET_BASE: &str = "https://docs.google.com/spreadsheets/d/e/2PACX-1vQZIa3uuVG-3ZjUWMPJLhnZ6xf0fMs0TabxYE3QRe2Thksz5ILHDv31A3qqJLIl4bZyYKYz5JJZfeK2/pub";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    /// Personal notes and poster overrides keyed by tracker id.
    pub anime_notes_url: String,

    pub manga_url: String,

    pub movies_url: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            anime_notes_url: format!("{SHEET_BASE}?gid=788506476&single=true&output=csv"),
            manga_url: format!("{SHEET_BASE}?gid=326412417&single=true&output=csv"),
            movies_url: format!("{SHEET_BASE}?gid=1861671541&single=true&output=csv"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_seconds: 3600 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,

    pub cors_allowed_origins: Vec<String>,

    /// Idle minutes after which a saved filter selection is forgotten.
    pub session_idle_minutes: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 6790,
            cors_allowed_origins: vec![
                "http://localhost:6790".to_string(),
                "http://127.0.0.1:6790".to_string(),
            ],
            session_idle_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub metrics_enabled: bool,

    pub loki_enabled: bool,

    pub loki_url: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: true,
            loki_enabled: false,
            loki_url: "http://localhost:3100".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            tracker: TrackerConfig::default(),
            sheets: SheetsConfig::default(),
            cache: CacheConfig::default(),
            server: ServerConfig::default(),
            observability: ObservabilityConfig::default(),
            overrides_path: "data/poster_overrides.toml".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("config.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("mediashelf").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".mediashelf").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tracker.nickname.trim().is_empty() {
            anyhow::bail!("tracker.nickname cannot be empty");
        }

        if self.tracker.page_size == 0 {
            anyhow::bail!("tracker.page_size must be > 0");
        }

        if self.cache.ttl_seconds == 0 {
            anyhow::bail!("cache.ttl_seconds must be > 0");
        }

        url::Url::parse(&self.tracker.base_url).context("Invalid tracker.base_url")?;
        url::Url::parse(&self.tracker.graphql_url).context("Invalid tracker.graphql_url")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tracker.page_size, 500);
        assert_eq!(config.cache.ttl_seconds, 3600);
        assert_eq!(config.tracker.status, "completed");
        assert!(config.sheets.manga_url.contains("gid=326412417"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[tracker]"));
        assert!(toml_str.contains("[sheets]"));
        assert!(toml_str.contains("[cache]"));
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
            [general]
            log_level = "debug"

            [tracker]
            nickname = "someone"

            [cache]
            ttl_seconds = 60
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.tracker.nickname, "someone");
        assert_eq!(config.cache.ttl_seconds, 60);

        assert_eq!(config.tracker.page_size, 500);
        assert_eq!(config.tracker.rates_cache_key(), "anime_list_someone_completed");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.tracker.page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.tracker.nickname = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cache.ttl_seconds = 0;
        assert!(config.validate().is_err());
    }
}
