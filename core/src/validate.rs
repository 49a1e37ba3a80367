//! Record and bundle validation.
//!
//! Extraction only ever emits records that pass these checks, but bundles are
//! also loaded back from disk (and may have been edited by hand), so the same
//! invariants are re-checked on load.
//!
//! An EV total over [`EV_TOTAL_LIMIT`] is not an error: extraction keeps
//! spreads the normalizer could not repair. Those surface as
//! [`BudgetWarning`]s instead.
//!
//! # Examples
//!
//! ```
//! use dex_builds_core::*;
//!
//! let mut record = BuildRecord::new();
//! record.moveset = vec!["Protect".into()];
//! assert!(validate_record("Incineroar", 0, &record).is_empty());
//!
//! // Over the 510-point budget: still valid, but flagged
//! record.evs = EvSpread::new().with(StatKey::Hp, 252).with(StatKey::Atk, 252).with(StatKey::Spe, 252);
//! assert!(validate_record("Incineroar", 0, &record).is_empty());
//!
//! let bundle = DexBundle::from_pages([PageResult::new("Incineroar", vec![record])]).unwrap();
//! assert_eq!(budget_warnings(&bundle).len(), 1);
//! ```

use std::fmt;

use thiserror::Error;

use crate::{BuildRecord, DexBundle, EV_TOTAL_LIMIT};

/// Record/bundle validation errors.
///
/// Each variant describes a specific problem found during validation. The
/// `Display` impl provides a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Subject identifier is empty or whitespace-only.
    #[error("subject cannot be empty")]
    EmptySubject,
    /// Two pages in the same bundle share a subject.
    #[error("duplicate subject in bundle: {0}")]
    DuplicateSubject(String),
    /// A record carries no moves.
    #[error("{subject}[{index}]: moveset is empty")]
    EmptyMoveset { subject: String, index: usize },
    /// A record carries a blank move name.
    #[error("{subject}[{index}]: moveset contains a blank entry")]
    BlankMove { subject: String, index: usize },
}

/// A record whose EV total is still over [`EV_TOTAL_LIMIT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetWarning {
    pub subject: String,
    pub index: usize,
    pub total: u32,
}

impl fmt::Display for BudgetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: EV total {} exceeds {EV_TOTAL_LIMIT}",
            self.subject, self.index, self.total
        )
    }
}

/// Validates one record; `index` is its position within the subject's builds.
pub fn validate_record(subject: &str, index: usize, record: &BuildRecord) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if !record.is_valid() {
        errors.push(ValidationError::EmptyMoveset {
            subject: subject.to_string(),
            index,
        });
    } else if record.moveset.iter().any(|mv| mv.trim().is_empty()) {
        errors.push(ValidationError::BlankMove {
            subject: subject.to_string(),
            index,
        });
    }

    errors
}

/// Validates every record of every page in a bundle.
///
/// Unlike [`DexBundle::insert_page`], this does not stop at the first
/// problem; all errors are returned in subject order.
pub fn validate_bundle(bundle: &DexBundle) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (subject, builds) in bundle.iter() {
        if subject.trim().is_empty() {
            errors.push(ValidationError::EmptySubject);
            continue;
        }
        for (index, record) in builds.iter().enumerate() {
            errors.extend(validate_record(subject, index, record));
        }
    }

    errors
}

/// Lists every record in `bundle` whose spread is over budget.
pub fn budget_warnings(bundle: &DexBundle) -> Vec<BudgetWarning> {
    bundle
        .iter()
        .flat_map(|(subject, builds)| {
            builds
                .iter()
                .enumerate()
                .filter(|(_, record)| !record.evs.is_within_budget())
                .map(move |(index, record)| BudgetWarning {
                    subject: subject.to_string(),
                    index,
                    total: record.evs.total(),
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EvSpread, PageResult, StatKey};

    fn valid_record() -> BuildRecord {
        let mut record = BuildRecord::new();
        record.moveset = vec!["Protect".to_string(), "FakeOut".to_string()];
        record.evs = EvSpread::new().with(StatKey::Hp, 252).with(StatKey::Def, 4);
        record
    }

    fn spread_over_budget() -> EvSpread {
        StatKey::ALL
            .into_iter()
            .fold(EvSpread::new(), |spread, key| spread.with(key, 150))
    }

    #[test]
    fn test_validate_record_accepts_valid_record() {
        assert!(validate_record("Incineroar", 0, &valid_record()).is_empty());
    }

    #[test]
    fn test_validate_record_rejects_empty_moveset() {
        let mut record = valid_record();
        record.moveset.clear();
        assert_eq!(
            validate_record("Incineroar", 2, &record),
            vec![ValidationError::EmptyMoveset {
                subject: "Incineroar".to_string(),
                index: 2
            }]
        );
    }

    #[test]
    fn test_validate_record_rejects_blank_move() {
        let mut record = valid_record();
        record.moveset.push("  ".to_string());
        let errors = validate_record("Incineroar", 0, &record);
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::BlankMove { .. }]
        ));
    }

    #[test]
    fn test_over_budget_spread_is_not_an_error() {
        let mut record = valid_record();
        record.evs = spread_over_budget();
        assert!(validate_record("Smeargle", 0, &record).is_empty());
    }

    #[test]
    fn test_validate_bundle_collects_all_errors() {
        let mut blank = valid_record();
        blank.moveset.push(String::new());
        let mut empty = valid_record();
        empty.moveset.clear();

        let bundle = DexBundle::from_pages([
            PageResult::new("a", vec![valid_record(), blank]),
            PageResult::new("b", vec![empty]),
        ])
        .unwrap();

        let errors = validate_bundle(&bundle);
        assert_eq!(
            errors,
            vec![
                ValidationError::BlankMove {
                    subject: "a".to_string(),
                    index: 1
                },
                ValidationError::EmptyMoveset {
                    subject: "b".to_string(),
                    index: 0
                },
            ]
        );
    }

    #[test]
    fn test_budget_warnings_name_each_record() {
        let mut over = valid_record();
        over.evs = spread_over_budget();

        let bundle = DexBundle::from_pages([
            PageResult::new("a", vec![valid_record(), over]),
            PageResult::new("b", vec![valid_record()]),
        ])
        .unwrap();

        let warnings = budget_warnings(&bundle);
        assert_eq!(
            warnings,
            vec![BudgetWarning {
                subject: "a".to_string(),
                index: 1,
                total: 900
            }]
        );
        assert!(validate_bundle(&bundle).is_empty());
        assert_eq!(warnings[0].to_string(), "a[1]: EV total 900 exceeds 510");
    }
}
