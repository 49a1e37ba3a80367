//! Build record type definitions.
//!
//! This module defines the data model produced by page extraction. The types
//! are designed for serialization with [`serde`] and round-trip through the
//! JSON bundle format consumed downstream.

use serde::{Deserialize, Serialize};

use crate::EvSpread;

/// One recommended configuration for a subject.
///
/// Records are assembled field by field while scanning a build table. Name
/// and recommendation are only known when the page has an index table
/// pointing at the build; they are omitted from JSON when absent.
///
/// # Examples
///
/// ```
/// use dex_builds_core::{BuildRecord, StatKey};
///
/// let mut record = BuildRecord::new();
/// assert!(!record.is_valid());
///
/// record.moveset = vec!["Protect".into(), "Uturn".into()];
/// record.evs.set(StatKey::Spe, 252);
/// assert!(record.is_valid());
///
/// let json = serde_json::to_value(&record).unwrap();
/// assert_eq!(json["evs"]["SPE"], 252);
/// assert!(json.get("name").is_none());
/// assert_eq!(json["teraType"], "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
    /// Build title from the page index (e.g. "Physical Sweeper")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-text rationale from the page index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Nature token (e.g. "Jolly")
    #[serde(default)]
    pub nature: String,
    /// Effort-point spread
    #[serde(default)]
    pub evs: EvSpread,
    #[serde(default)]
    pub ability: String,
    #[serde(default)]
    pub tera_type: String,
    #[serde(default)]
    pub held_item: String,
    /// Move names in table order
    #[serde(default)]
    pub moveset: Vec<String>,
}

impl BuildRecord {
    /// Creates an empty record with every field at its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// A record is valid once it carries at least one move.
    pub fn is_valid(&self) -> bool {
        !self.moveset.is_empty()
    }

    /// Sets the index-table name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the index-table recommendation.
    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }
}

/// All builds extracted from one page.
///
/// The subject is derived from the source file name, so it is unique within a
/// batch as long as file stems are.
///
/// # Examples
///
/// ```
/// use dex_builds_core::{BuildRecord, PageResult};
///
/// let page = PageResult::new("Garchomp", vec![BuildRecord::new()]);
/// assert_eq!(page.subject, "Garchomp");
/// assert_eq!(page.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// Subject identifier (file stem of the source page)
    pub subject: String,
    /// Builds in page order
    pub builds: Vec<BuildRecord>,
}

impl PageResult {
    pub fn new(subject: impl Into<String>, builds: Vec<BuildRecord>) -> Self {
        Self {
            subject: subject.into(),
            builds,
        }
    }

    pub fn len(&self) -> usize {
        self.builds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StatKey;

    #[test]
    fn test_record_json_field_names() {
        let mut record = BuildRecord::new()
            .with_name("Physical Sweeper")
            .with_recommendation("Great in singles");
        record.nature = "Jolly".to_string();
        record.evs.set(StatKey::Atk, 252);
        record.ability = "RoughSkin".to_string();
        record.tera_type = "Steel".to_string();
        record.held_item = "Life Orb".to_string();
        record.moveset = vec!["Earthquake".to_string()];

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Physical Sweeper");
        assert_eq!(json["recommendation"], "Great in singles");
        assert_eq!(json["nature"], "Jolly");
        assert_eq!(json["evs"]["ATK"], 252);
        assert_eq!(json["ability"], "RoughSkin");
        assert_eq!(json["teraType"], "Steel");
        assert_eq!(json["heldItem"], "Life Orb");
        assert_eq!(json["moveset"][0], "Earthquake");
    }

    #[test]
    fn test_record_deserializes_sparse_json() {
        let record: BuildRecord =
            serde_json::from_str(r#"{"moveset":["Protect"],"evs":{"HP":4}}"#).unwrap();
        assert!(record.is_valid());
        assert_eq!(record.name, None);
        assert_eq!(record.evs.get(StatKey::Hp), 4);
        assert!(record.nature.is_empty());
    }
}
