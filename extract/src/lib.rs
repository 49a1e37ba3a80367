//! Build-record extraction from wiki HTML pages.
//!
//! This crate turns one wiki page per subject into a list of
//! [`BuildRecord`]s. Pages come in three layouts, each handled by a
//! [`LocatorStrategy`](strategies::LocatorStrategy):
//!
//! 1. an index table after the primary anchor (`#hl_2` by default), whose
//!    rows link to per-build tables;
//! 2. the same index after a secondary anchor (`#hl_3`);
//! 3. numbered sections (`#hm_1`, `#hm_2`, ...) with no index at all.
//!
//! The [`PagePipeline`](pipeline::PagePipeline) tries them in that order and
//! keeps the first non-empty result. Cell parsing is lenient: unknown rows,
//! unparsable stat segments and missing icons fall back to defaults, and
//! over-budget EV spreads are repaired with [`EvSpread::normalize`].
//!
//! # Main entry points
//!
//! - [`extract_builds`]: extract one page with the default anchors.
//! - [`extract_builds_with_report`]: same, with configurable anchors and an
//!   [`ExtractionReport`](report::ExtractionReport).
//! - [`batch::extract_directory`]: extract a directory of pages in parallel
//!   into a [`DexBundle`].
//! - [`output::format_bundle`]: render a bundle as JSON, YAML, Markdown or a
//!   plain table.
//!
//! # Example
//!
//! ```
//! use dex_builds_extract::extract_builds;
//!
//! let html = r#"<html><body>
//!   <h3 id="hm_1">Bulky Setup</h3>
//!   <table>
//!     <tr><th>Nature</th><td>Impish (+Def, -SpA)</td></tr>
//!     <tr><th>EV Spread</th><td>252 HP / 252 Def / 4 SpD</td></tr>
//!     <tr><th>Ability</th><td>Rough Skin</td></tr>
//!     <tr><th>Moveset</th><td><a>Swords Dance</a><a>Earthquake</a></td></tr>
//!   </table>
//! </body></html>"#;
//!
//! let page = extract_builds("Garchomp", html).unwrap();
//! assert_eq!(page.builds.len(), 1);
//! assert_eq!(page.builds[0].nature, "Impish");
//! assert_eq!(page.builds[0].ability, "RoughSkin");
//! assert_eq!(page.builds[0].moveset, vec!["SwordsDance", "Earthquake"]);
//! ```
//!
//! [`BuildRecord`]: dex_builds_core::BuildRecord
//! [`EvSpread::normalize`]: dex_builds_core::EvSpread::normalize
//! [`DexBundle`]: dex_builds_core::DexBundle

pub mod batch;
pub mod config;
pub mod document;
mod error;
pub mod fields;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod strategies;

use dex_builds_core::PageResult;

pub use error::{ExtractError, Result};

use config::ExtractConfig;
use pipeline::{ExtractionRun, PagePipeline};

/// Extracts the builds on one page using the default anchors.
///
/// A page with no recognizable layout yields an empty [`PageResult`], not an
/// error.
///
/// # Errors
///
/// [`ExtractError::MalformedDocument`] if `html` has no usable content.
pub fn extract_builds(subject: &str, html: &str) -> Result<PageResult> {
    PagePipeline::default()
        .run_document(subject, html)
        .map(|run| run.page)
}

/// Extracts the builds on one page with the given configuration and reports
/// which strategy produced them.
///
/// # Examples
///
/// ```
/// use dex_builds_extract::config::ExtractConfig;
/// use dex_builds_extract::extract_builds_with_report;
///
/// let mut config = ExtractConfig::default();
/// config.anchors.section_prefix = "section_".into();
///
/// let html = r#"<html><body>
///   <h3 id="section_1">Lead</h3>
///   <table><tr><th>Moveset</th><td><a>Fake Out</a></td></tr></table>
/// </body></html>"#;
///
/// let run = extract_builds_with_report("Incineroar", html, &config).unwrap();
/// assert_eq!(run.page.builds.len(), 1);
/// assert_eq!(run.report.strategy.as_deref(), Some("sequential-sections"));
/// ```
///
/// # Errors
///
/// [`ExtractError::MalformedDocument`] if `html` has no usable content.
pub fn extract_builds_with_report(
    subject: &str,
    html: &str,
    config: &ExtractConfig,
) -> Result<ExtractionRun> {
    PagePipeline::new(config).run_document(subject, html)
}
