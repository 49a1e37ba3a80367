use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{BuildRecord, PageResult, ValidationError};

/// Output collection keyed by subject.
///
/// Pages are kept sorted by subject so serialized bundles are deterministic.
/// The bundle serializes transparently as `{ "<subject>": [builds...] }`.
///
/// # Examples
///
/// ```
/// use dex_builds_core::*;
///
/// let mut bundle = DexBundle::new();
/// bundle.insert_page(PageResult::new("Dragonite", Vec::new())).unwrap();
/// bundle.insert_page(PageResult::new("Amoonguss", Vec::new())).unwrap();
///
/// assert_eq!(bundle.subjects().collect::<Vec<_>>(), vec!["Amoonguss", "Dragonite"]);
///
/// // Subjects are unique within a bundle.
/// let err = bundle.insert_page(PageResult::new("Dragonite", Vec::new())).unwrap_err();
/// assert_eq!(err, ValidationError::DuplicateSubject("Dragonite".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DexBundle {
    pages: BTreeMap<String, Vec<BuildRecord>>,
}

impl DexBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bundle from page results, rejecting duplicate subjects.
    pub fn from_pages(
        pages: impl IntoIterator<Item = PageResult>,
    ) -> Result<Self, ValidationError> {
        let mut bundle = Self::new();
        for page in pages {
            bundle.insert_page(page)?;
        }
        Ok(bundle)
    }

    /// Adds one page's builds under its subject.
    ///
    /// # Errors
    ///
    /// [`ValidationError::EmptySubject`] for a blank subject and
    /// [`ValidationError::DuplicateSubject`] if the subject is already present.
    pub fn insert_page(&mut self, page: PageResult) -> Result<(), ValidationError> {
        if page.subject.trim().is_empty() {
            return Err(ValidationError::EmptySubject);
        }
        if self.pages.contains_key(&page.subject) {
            return Err(ValidationError::DuplicateSubject(page.subject));
        }
        self.pages.insert(page.subject, page.builds);
        Ok(())
    }

    /// Builds recorded for `subject`, if any.
    pub fn get(&self, subject: &str) -> Option<&[BuildRecord]> {
        self.pages.get(subject).map(Vec::as_slice)
    }

    pub fn subjects(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    /// Iterates `(subject, builds)` in subject order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[BuildRecord])> {
        self.pages
            .iter()
            .map(|(subject, builds)| (subject.as_str(), builds.as_slice()))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Total number of builds across all pages.
    pub fn build_count(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn into_pages(self) -> Vec<PageResult> {
        self.pages
            .into_iter()
            .map(|(subject, builds)| PageResult { subject, builds })
            .collect()
    }

    pub(crate) fn entry_mut(&mut self, subject: String) -> &mut Vec<BuildRecord> {
        self.pages.entry(subject).or_default()
    }

    pub(crate) fn contains(&self, subject: &str) -> bool {
        self.pages.contains_key(subject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_serializes_as_subject_map() {
        let mut record = BuildRecord::new();
        record.moveset = vec!["Protect".to_string()];
        let bundle = DexBundle::from_pages([
            PageResult::new("Pikachu", vec![record]),
            PageResult::new("Eevee", Vec::new()),
        ])
        .unwrap();

        let json = serde_json::to_value(&bundle).unwrap();
        assert!(json["Eevee"].as_array().unwrap().is_empty());
        assert_eq!(json["Pikachu"][0]["moveset"][0], "Protect");
        assert_eq!(bundle.build_count(), 1);
    }

    #[test]
    fn test_bundle_rejects_blank_subject() {
        let mut bundle = DexBundle::new();
        assert_eq!(
            bundle.insert_page(PageResult::new("  ", Vec::new())),
            Err(ValidationError::EmptySubject)
        );
    }

    #[test]
    fn test_into_pages_keeps_subject_order() {
        let bundle = DexBundle::from_pages([
            PageResult::new("b", Vec::new()),
            PageResult::new("a", Vec::new()),
        ])
        .unwrap();
        let subjects: Vec<String> = bundle.into_pages().into_iter().map(|p| p.subject).collect();
        assert_eq!(subjects, vec!["a", "b"]);
    }
}
