//! Extraction configuration.
//!
//! Defines the YAML-serializable settings that control where the pipeline
//! looks for build tables and how batches are run. Every field has a default
//! matching the wiki's current layout, so an empty file is a valid config.
//!
//! # Example YAML
//!
//! ```yaml
//! anchors:
//!   primary_index: hl_2
//!   secondary_index: hl_3
//!   section_prefix: hm_
//! batch:
//!   jobs: 4
//!   extension: html
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Anchor ids used by the locator strategies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorConfig {
    /// Heading id preceding the index table on most pages.
    pub primary_index: String,
    /// Heading id preceding the index table on the remaining pages.
    pub secondary_index: String,
    /// Numbered section ids are `<section_prefix><n>`, starting at 1.
    pub section_prefix: String,
}

impl Default for AnchorConfig {
    fn default() -> Self {
        Self {
            primary_index: "hl_2".to_string(),
            secondary_index: "hl_3".to_string(),
            section_prefix: "hm_".to_string(),
        }
    }
}

/// Settings for directory batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Parallel extraction jobs (`None` = adaptive default).
    pub jobs: Option<usize>,
    /// File extension of page files, without the dot.
    pub extension: String,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            jobs: None,
            extension: "html".to_string(),
        }
    }
}

/// Top-level extraction configuration.
///
/// # Examples
///
/// ```
/// use dex_builds_extract::config::ExtractConfig;
///
/// let config: ExtractConfig = serde_yaml::from_str("anchors:\n  section_prefix: section_\n").unwrap();
/// assert_eq!(config.anchors.section_prefix, "section_");
/// assert_eq!(config.anchors.primary_index, "hl_2");
/// assert_eq!(config.batch.extension, "html");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub anchors: AnchorConfig,
    pub batch: BatchSettings,
}

impl ExtractConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ExtractError::Io) if the file cannot be read, or
    /// [`Yaml`](crate::ExtractError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::ExtractError::Io) if the file cannot be written,
    /// or [`Yaml`](crate::ExtractError::Yaml) if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extract.yml");

        let mut config = ExtractConfig::default();
        config.anchors.secondary_index = "hl_4".to_string();
        config.batch.jobs = Some(2);
        config.save(&path).unwrap();

        assert_eq!(ExtractConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_config_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ExtractConfig::load(dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, crate::ExtractError::Io(_)));
    }
}
