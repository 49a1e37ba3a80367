//! Core build-record types and shared bundle primitives.
//!
//! This crate defines the foundational types for modeling recommended
//! character builds scraped from wiki pages:
//!
//! - [`BuildRecord`]: one build (nature, EV spread, ability, tera type, held
//!   item, moveset, plus optional index-table name and recommendation).
//! - [`EvSpread`] and [`StatKey`]: the six-stat effort-point allocation and
//!   its fixed key set.
//! - [`PageResult`]: all builds extracted from one page.
//! - [`DexBundle`]: the output collection, keyed by subject.
//!
//! [`EvSpread::normalize`] repairs spreads whose total exceeds
//! [`EV_TOTAL_LIMIT`]. Validation ([`validate_record`], [`validate_bundle`])
//! re-checks the record invariants on bundles loaded from disk, and
//! [`budget_warnings`] lists spreads still over budget. Merging
//! ([`merge_bundles`]) combines bundles from separate runs using a
//! [`MergeStrategy`].
//!
//! # Example
//!
//! ```
//! use dex_builds_core::*;
//!
//! let mut record = BuildRecord::new().with_name("Bulky Pivot");
//! record.nature = "Careful".into();
//! record.evs = EvSpread::new().with(StatKey::Hp, 252).with(StatKey::SpD, 252).with(StatKey::Def, 10);
//! record.moveset = vec!["FakeOut".into(), "PartingShot".into()];
//!
//! // 514 points: four too many, trimmed from the tightest-fitting stat.
//! assert_eq!(record.evs.normalize(), NormalizeOutcome::Corrected { key: StatKey::Def, amount: 4 });
//!
//! let bundle = DexBundle::from_pages([PageResult::new("Incineroar", vec![record])]).unwrap();
//! assert!(validate_bundle(&bundle).is_empty());
//! ```

mod bundle;
mod merge;
mod stats;
mod types;
mod validate;

pub use bundle::DexBundle;
pub use merge::{MergeStrategy, merge_bundles};
pub use stats::{EV_TOTAL_LIMIT, EvSpread, NormalizeOutcome, StatKey};
pub use types::*;
pub use validate::{
    BudgetWarning, ValidationError, budget_warnings, validate_bundle, validate_record,
};
