//! Parsed page handle and anchor-scoped table access.
//!
//! Build tables on the wiki always sit immediately after a heading that
//! carries an `id` (the anchor). Everything the pipeline reads goes through
//! [`Page::table_rows_after`], which mirrors the CSS query
//! `#anchor + table tr` without interpolating page-controlled ids into a
//! selector string.

use std::fmt;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::error::ExtractError;

static ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("static selector must parse"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("static selector must parse"));
static BODY_CONTENT_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("body *").expect("static selector must parse"));

/// Named location within a page (an element `id`).
///
/// Accepts both `"hm_1"` and `"#hm_1"`; the leading `#` is stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Anchor(String);

impl Anchor {
    pub fn new(id: impl AsRef<str>) -> Self {
        let id = id.as_ref().trim();
        Self(id.strip_prefix('#').unwrap_or(id).to_string())
    }

    /// Extracts the fragment of an `href` (everything after its last `#`).
    ///
    /// Returns `None` when the link has no fragment or the fragment is empty.
    pub fn from_href(href: &str) -> Option<Self> {
        let (_, fragment) = href.rsplit_once('#')?;
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return None;
        }
        Some(Self(fragment.to_string()))
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One parsed HTML document, tagged with the subject it was loaded for.
///
/// The page is read-only once parsed; the underlying DOM is released when the
/// `Page` is dropped.
pub struct Page {
    subject: String,
    html: Html,
}

impl Page {
    /// Parses `source` into a page.
    ///
    /// HTML parsing itself is lenient, so the only hard failures are inputs
    /// with no usable content: blank sources and documents whose `<body>`
    /// holds no elements at all.
    ///
    /// # Errors
    ///
    /// [`ExtractError::MalformedDocument`] naming `subject`.
    pub fn parse(subject: &str, source: &str) -> Result<Self, ExtractError> {
        if source.trim().is_empty() {
            return Err(ExtractError::malformed(subject, "document is empty"));
        }

        let html = Html::parse_document(source);
        if html.select(&BODY_CONTENT_SELECTOR).next().is_none() {
            return Err(ExtractError::malformed(
                subject,
                "document has no elements under <body>",
            ));
        }

        Ok(Self {
            subject: subject.to_string(),
            html,
        })
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// First element whose `id` equals the anchor.
    pub fn find_anchor(&self, anchor: &Anchor) -> Option<ElementRef<'_>> {
        self.html
            .select(&ID_SELECTOR)
            .find(|element| element.value().id() == Some(anchor.id()))
    }

    pub fn has_anchor(&self, anchor: &Anchor) -> bool {
        self.find_anchor(anchor).is_some()
    }

    /// Rows of the table that directly follows the anchor element.
    ///
    /// Only the anchor's next element sibling is considered, and only if it is
    /// a `<table>`. Rows are returned in document order, nested tables
    /// included. Returns an empty list when the anchor or table is missing.
    pub fn table_rows_after(&self, anchor: &Anchor) -> Vec<ElementRef<'_>> {
        let Some(table) = self.table_after(anchor) else {
            return Vec::new();
        };
        table.select(&ROW_SELECTOR).collect()
    }

    fn table_after(&self, anchor: &Anchor) -> Option<ElementRef<'_>> {
        let element = self.find_anchor(anchor)?;
        let sibling = element.next_siblings().find_map(ElementRef::wrap)?;
        (sibling.value().name() == "table").then_some(sibling)
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}

/// Concatenated text content of an element and its descendants.
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
