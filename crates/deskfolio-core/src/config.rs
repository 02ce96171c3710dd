use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::answer::DEFAULT_ENDPOINT;

pub const ENDPOINT_ENV: &str = "DESKFOLIO_ENDPOINT";
pub const DEFAULT_COMPACT_WIDTH: u16 = 100;

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub endpoint: Option<String>,
    /// Terminal width (columns) at or below which the compact layout is used
    pub compact_width: Option<u16>,
    pub log_filter: Option<String>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Environment beats the config file; both beat the built-in default.
    pub fn endpoint(&self) -> String {
        std::env::var(ENDPOINT_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    pub fn compact_width(&self) -> u16 {
        self.compact_width.unwrap_or(DEFAULT_COMPACT_WIDTH)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("deskfolio").join("config.json"))
    }

    pub fn get_log_path() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow!("Could not determine cache directory"))?;

        Ok(cache_dir.join("deskfolio").join("deskfolio.log"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::new());
        assert_eq!(config.compact_width(), DEFAULT_COMPACT_WIDTH);
        assert_eq!(config.log_filter(), "info");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            endpoint: Some("http://example.test/ask".to_string()),
            compact_width: Some(72),
            log_filter: Some("debug".to_string()),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "compact_width": 60 }"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.compact_width(), 60);
        assert_eq!(config.endpoint, None);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
