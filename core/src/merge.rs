//! Bundle merging with configurable conflict resolution.
//!
//! Separate extraction runs (for example one per wiki section) each produce a
//! [`DexBundle`]. [`merge_bundles`] combines them into one bundle, using a
//! [`MergeStrategy`] to decide what happens when both sides carry the same
//! subject.
//!
//! # Example
//!
//! ```
//! use dex_builds_core::*;
//!
//! let base = DexBundle::from_pages([PageResult::new("Garchomp", Vec::new())]).unwrap();
//! let overlay = DexBundle::from_pages([PageResult::new("Kingambit", Vec::new())]).unwrap();
//!
//! let merged = merge_bundles(&base, &overlay, MergeStrategy::Append);
//! assert_eq!(merged.page_count(), 2);
//! ```

use crate::DexBundle;

/// Bundle merge behavior.
///
/// Only matters for subjects present in both bundles; every other subject is
/// copied over unchanged.
///
/// # Examples
///
/// ```
/// use dex_builds_core::*;
///
/// let mut a = BuildRecord::new();
/// a.moveset = vec!["Protect".into()];
/// let mut b = BuildRecord::new();
/// b.moveset = vec!["Uturn".into()];
///
/// let base = DexBundle::from_pages([PageResult::new("Rillaboom", vec![a])]).unwrap();
/// let overlay = DexBundle::from_pages([PageResult::new("Rillaboom", vec![b])]).unwrap();
///
/// let kept = merge_bundles(&base, &overlay, MergeStrategy::PreferBase);
/// assert_eq!(kept.get("Rillaboom").unwrap()[0].moveset, vec!["Protect"]);
///
/// let replaced = merge_bundles(&base, &overlay, MergeStrategy::PreferOverlay);
/// assert_eq!(replaced.get("Rillaboom").unwrap()[0].moveset, vec!["Uturn"]);
///
/// let both = merge_bundles(&base, &overlay, MergeStrategy::Append);
/// assert_eq!(both.get("Rillaboom").unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Keep the base builds for a shared subject.
    PreferBase,
    /// Replace the base builds with the overlay's.
    PreferOverlay,
    /// Keep both, base builds first.
    Append,
}

/// Merges two bundles into a new bundle.
pub fn merge_bundles(base: &DexBundle, overlay: &DexBundle, strategy: MergeStrategy) -> DexBundle {
    let mut merged = base.clone();

    for (subject, builds) in overlay.iter() {
        if !merged.contains(subject) {
            merged.entry_mut(subject.to_string()).extend_from_slice(builds);
            continue;
        }

        match strategy {
            MergeStrategy::PreferBase => {}
            MergeStrategy::PreferOverlay => {
                *merged.entry_mut(subject.to_string()) = builds.to_vec();
            }
            MergeStrategy::Append => {
                merged.entry_mut(subject.to_string()).extend_from_slice(builds);
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuildRecord, PageResult};

    fn record(mv: &str) -> BuildRecord {
        let mut record = BuildRecord::new();
        record.moveset = vec![mv.to_string()];
        record
    }

    #[test]
    fn test_merge_copies_disjoint_subjects() {
        let base = DexBundle::from_pages([PageResult::new("a", vec![record("x")])]).unwrap();
        let overlay = DexBundle::from_pages([PageResult::new("b", vec![record("y")])]).unwrap();

        for strategy in [
            MergeStrategy::PreferBase,
            MergeStrategy::PreferOverlay,
            MergeStrategy::Append,
        ] {
            let merged = merge_bundles(&base, &overlay, strategy);
            assert_eq!(merged.page_count(), 2);
            assert_eq!(merged.build_count(), 2);
        }
    }

    #[test]
    fn test_merge_append_keeps_base_first() {
        let base = DexBundle::from_pages([PageResult::new("a", vec![record("x")])]).unwrap();
        let overlay = DexBundle::from_pages([PageResult::new("a", vec![record("y")])]).unwrap();

        let merged = merge_bundles(&base, &overlay, MergeStrategy::Append);
        let moves: Vec<&str> = merged
            .get("a")
            .unwrap()
            .iter()
            .map(|r| r.moveset[0].as_str())
            .collect();
        assert_eq!(moves, vec!["x", "y"]);
    }

    #[test]
    fn test_merge_prefer_overlay_replaces_empty_base_page() {
        let base = DexBundle::from_pages([PageResult::new("a", Vec::new())]).unwrap();
        let overlay = DexBundle::from_pages([PageResult::new("a", vec![record("y")])]).unwrap();

        let merged = merge_bundles(&base, &overlay, MergeStrategy::PreferOverlay);
        assert_eq!(merged.get("a").unwrap().len(), 1);
    }
}
