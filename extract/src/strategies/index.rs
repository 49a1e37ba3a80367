//! Index-table strategy.
//!
//! Most pages open with a summary table: one row per build, the first cell
//! linking to the build's detail section and the second holding a short
//! recommendation.

use std::sync::LazyLock;

use dex_builds_core::BuildRecord;
use scraper::{ElementRef, Selector};
use tracing::debug;

use super::LocatorStrategy;
use crate::document::{Anchor, Page, element_text};
use crate::record::extract_record;

static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("static selector must parse"));
static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector must parse"));

pub struct IndexStrategy {
    name: &'static str,
    anchor: Anchor,
}

impl IndexStrategy {
    /// Index table at the usual anchor.
    pub fn primary(anchor: Anchor) -> Self {
        Self {
            name: "primary-index",
            anchor,
        }
    }

    /// Index table at the alternate anchor some pages use.
    pub fn secondary(anchor: Anchor) -> Self {
        Self {
            name: "secondary-index",
            anchor,
        }
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    fn extract_entry(&self, page: &Page, row: ElementRef<'_>) -> Option<BuildRecord> {
        let cells: Vec<ElementRef<'_>> = row.select(&CELL_SELECTOR).collect();
        let Some(first) = cells.first() else {
            debug!(
                subject = page.subject(),
                strategy = self.name,
                "Skipping index row without cells"
            );
            return None;
        };

        let href = first
            .select(&LINK_SELECTOR)
            .next()
            .and_then(|link| link.value().attr("href"));
        let Some(detail) = href.and_then(Anchor::from_href) else {
            debug!(
                subject = page.subject(),
                strategy = self.name,
                href = ?href,
                "Skipping index row without build link"
            );
            return None;
        };

        let mut record = extract_record(page, &detail)?;

        let name = element_text(*first).trim().to_string();
        record.name = (!name.is_empty()).then_some(name);
        record.recommendation = cells
            .get(1)
            .map(|cell| element_text(*cell).trim().to_string())
            .filter(|text| !text.is_empty());

        Some(record)
    }
}

impl LocatorStrategy for IndexStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    fn locate(&self, page: &Page) -> Vec<BuildRecord> {
        page.table_rows_after(&self.anchor)
            .into_iter()
            .skip(1)
            .filter_map(|row| self.extract_entry(page, row))
            .collect()
    }
}
