//! Record extraction from the build table following an anchor.

use std::sync::LazyLock;

use dex_builds_core::BuildRecord;
use scraper::Selector;
use tracing::debug;

use crate::document::{Anchor, Page, element_text};
use crate::fields::{FieldLabel, apply_field};

static HEADER_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("th").expect("static selector must parse"));
static VALUE_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td").expect("static selector must parse"));

/// Assembles one build from the table directly after `anchor`.
///
/// Every row with both a header (`th`) and a value (`td`) cell is dispatched
/// by its label; other rows are spacers and are skipped. Returns `None` when
/// the anchor or table is missing, or when no moveset was parsed. This is a
/// pure read of the page.
pub fn extract_record(page: &Page, anchor: &Anchor) -> Option<BuildRecord> {
    let rows = page.table_rows_after(anchor);
    if rows.is_empty() {
        debug!(subject = page.subject(), %anchor, "No build table after anchor");
        return None;
    }

    let mut record = BuildRecord::new();
    for row in rows {
        let header = row.select(&HEADER_CELL_SELECTOR).next();
        let value = row.select(&VALUE_CELL_SELECTOR).next();
        let (Some(header), Some(value)) = (header, value) else {
            continue;
        };

        let label = element_text(header);
        let Some(field) = FieldLabel::from_label(label.trim()) else {
            continue;
        };
        apply_field(&mut record, field, value);
    }

    if !record.is_valid() {
        debug!(subject = page.subject(), %anchor, "Table after anchor has no moveset");
        return None;
    }

    Some(record)
}
