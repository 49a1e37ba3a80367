//! Numbered-section fallback strategy.
//!
//! Pages without an index table still number their build sections
//! (`hm_1`, `hm_2`, ...). Sections are contiguous from 1, so the scan stops at
//! the first missing number.

use dex_builds_core::BuildRecord;
use tracing::debug;

use super::LocatorStrategy;
use crate::document::{Anchor, Page};
use crate::record::extract_record;

pub struct SequentialSectionStrategy {
    prefix: String,
}

impl SequentialSectionStrategy {
    /// `prefix` is the anchor id before the section number (e.g. `"hm_"`).
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_start_matches('#').to_string(),
        }
    }

    pub fn section_anchor(&self, index: usize) -> Anchor {
        Anchor::new(format!("{}{index}", self.prefix))
    }
}

impl LocatorStrategy for SequentialSectionStrategy {
    fn name(&self) -> &'static str {
        "sequential-sections"
    }

    fn locate(&self, page: &Page) -> Vec<BuildRecord> {
        let mut records = Vec::new();

        for index in 1.. {
            let anchor = self.section_anchor(index);
            if !page.has_anchor(&anchor) {
                debug!(subject = page.subject(), sections = index - 1, "Section scan finished");
                break;
            }
            if let Some(record) = extract_record(page, &anchor) {
                records.push(record);
            }
        }

        records
    }
}
