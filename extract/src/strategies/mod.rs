//! Locator strategies for the different page layouts.

pub mod index;
pub mod sections;

use dex_builds_core::BuildRecord;

use crate::config::AnchorConfig;
use crate::document::{Anchor, Page};

pub use index::IndexStrategy;
pub use sections::SequentialSectionStrategy;

/// Pluggable strategy for locating the build records on a page.
///
/// Each strategy targets one page layout (index table at a known anchor, or
/// numbered sections). [`PagePipeline`](crate::pipeline::PagePipeline) runs
/// them in the order returned by [`default_strategies`] and keeps the first
/// non-empty result.
pub trait LocatorStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn locate(&self, page: &Page) -> Vec<BuildRecord>;
}

/// Strategies in priority order: primary index, secondary index, then the
/// numbered-section fallback.
pub fn default_strategies(anchors: &AnchorConfig) -> Vec<Box<dyn LocatorStrategy>> {
    vec![
        Box::new(IndexStrategy::primary(Anchor::new(&anchors.primary_index))),
        Box::new(IndexStrategy::secondary(Anchor::new(&anchors.secondary_index))),
        Box::new(SequentialSectionStrategy::new(&anchors.section_prefix)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_strategies_follow_configured_anchors() {
        let anchors = AnchorConfig {
            primary_index: "#builds".to_string(),
            secondary_index: "alt-builds".to_string(),
            section_prefix: "set-".to_string(),
        };
        let primary = IndexStrategy::primary(Anchor::new(&anchors.primary_index));
        assert_eq!(primary.anchor().id(), "builds");

        let strategies = default_strategies(&anchors);
        let names: Vec<_> = strategies.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec!["primary-index", "secondary-index", "sequential-sections"]
        );

        let page = Page::parse(
            "Dondozo",
            r##"<html><body>
              <h2 id="alt-builds">Builds</h2>
              <table>
                <tr><th>Build</th></tr>
                <tr><td><a href="#set-1">Commander</a></td></tr>
              </table>
              <h3 id="set-1">Commander</h3>
              <table><tr><th>Moveset</th><td><a>Wave Crash</a></td></tr></table>
            </body></html>"##,
        )
        .unwrap();
        assert!(strategies[0].locate(&page).is_empty());
        assert_eq!(strategies[1].locate(&page).len(), 1);
        assert_eq!(strategies[2].locate(&page).len(), 1);
    }
}
