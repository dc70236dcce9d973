//! TOML configuration for the `lexis` binary.
//!
//! Every section and field has a default, so an empty or missing file is a
//! valid configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub segmentation: SegmentationConfig,
    pub morphology: MorphologyConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationConfig {
    pub store_results: bool,
    pub include_punctuation: bool,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            store_results: true,
            include_punctuation: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphologyConfig {
    pub store_results: bool,
    /// Compiled table archive to use instead of the built-in tables.
    pub tables: Option<PathBuf>,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            store_results: true,
            tables: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// JSON snapshot backing the in-memory store.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<Option<LevelFilter>> {
        self.level
            .as_deref()
            .map(|level| {
                level
                    .parse::<LevelFilter>()
                    .with_context(|| format!("Invalid log level '{level}'"))
            })
            .transpose()
    }
}

impl Config {
    /// Reads `path`, or returns the defaults when there is no file.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.segmentation.store_results);
        assert!(config.segmentation.include_punctuation);
        assert!(config.morphology.store_results);
        assert!(config.storage.path.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [segmentation]
            include_punctuation = false

            [storage]
            path = "lexis.json"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert!(!config.segmentation.include_punctuation);
        assert!(config.segmentation.store_results);
        assert_eq!(config.storage.path, Some(PathBuf::from("lexis.json")));
        assert_eq!(config.logging.level_filter().unwrap(), Some(LevelFilter::Debug));
    }

    #[test]
    fn test_bad_level() {
        let config = Config::from_toml("[logging]\nlevel = \"chatty\"").unwrap();
        assert!(config.logging.level_filter().is_err());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.toml").as_path())).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(Config::load(None).unwrap(), Config::default());
    }

    #[test]
    fn test_load_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexis.toml");
        std::fs::write(&path, "[morphology]\nstore_results = false\ntables = \"tables.bin\"\n").unwrap();

        let config = Config::load(Some(path.as_path())).unwrap();
        assert!(!config.morphology.store_results);
        assert_eq!(config.morphology.tables, Some(PathBuf::from("tables.bin")));
    }
}
