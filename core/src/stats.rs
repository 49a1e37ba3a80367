//! Stat keys, EV spreads and the total-points normalizer.
//!
//! A spread allocates effort points across six fixed stats. The game caps the
//! sum at [`EV_TOTAL_LIMIT`]; wiki tables occasionally over-count, so
//! [`EvSpread::normalize`] trims the excess from a single stat instead of
//! throwing the whole record away.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum number of effort points a spread may hold in total.
pub const EV_TOTAL_LIMIT: u32 = 510;

/// One of the six stats an EV spread allocates points to.
///
/// Variants are declared in canonical order (`HP, ATK, DEF, SPE, SPA, SPD`);
/// that order drives serialization and the normalizer's tie-break.
///
/// # Examples
///
/// ```
/// use dex_builds_core::StatKey;
///
/// assert_eq!(StatKey::from_label("Sp.Atk"), Some(StatKey::SpA));
/// assert_eq!(StatKey::from_label("SpD"), Some(StatKey::SpD));
/// assert_eq!(StatKey::from_label("Speed"), None);
/// assert_eq!(StatKey::Spe.as_str(), "SPE");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatKey {
    Hp,
    Atk,
    Def,
    Spe,
    SpA,
    SpD,
}

/// Wiki stat abbreviations and the key each one maps to.
const STAT_LABELS: [(&str, StatKey); 8] = [
    ("HP", StatKey::Hp),
    ("Atk", StatKey::Atk),
    ("Def", StatKey::Def),
    ("Spe", StatKey::Spe),
    ("Sp.Atk", StatKey::SpA),
    ("Sp.Def", StatKey::SpD),
    ("SpA", StatKey::SpA),
    ("SpD", StatKey::SpD),
];

impl StatKey {
    /// All keys in canonical order.
    pub const ALL: [StatKey; 6] = [
        StatKey::Hp,
        StatKey::Atk,
        StatKey::Def,
        StatKey::Spe,
        StatKey::SpA,
        StatKey::SpD,
    ];

    /// Canonical upper-case name, matching the keys [`EvSpread`] serializes.
    pub const fn as_str(self) -> &'static str {
        match self {
            StatKey::Hp => "HP",
            StatKey::Atk => "ATK",
            StatKey::Def => "DEF",
            StatKey::Spe => "SPE",
            StatKey::SpA => "SPA",
            StatKey::SpD => "SPD",
        }
    }

    /// Resolves a wiki abbreviation (`Atk`, `Sp.Def`, ...) to a key.
    ///
    /// Matching is exact and case-sensitive; callers strip whitespace first.
    pub fn from_label(label: &str) -> Option<Self> {
        STAT_LABELS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, key)| *key)
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running [`EvSpread::normalize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizeOutcome {
    /// The spread was already within [`EV_TOTAL_LIMIT`].
    Unchanged,
    /// `amount` points were removed from `key`.
    Corrected { key: StatKey, amount: u16 },
    /// No single stat could absorb the excess; the spread is left as-is.
    NoCandidate { excess: u32 },
}

/// Effort-point allocation across the six [`StatKey`]s.
///
/// Serializes as an object keyed `HP, ATK, DEF, SPE, SPA, SPD`; missing keys
/// deserialize as zero.
///
/// # Examples
///
/// ```
/// use dex_builds_core::{EvSpread, StatKey};
///
/// let spread = EvSpread::new()
///     .with(StatKey::Hp, 252)
///     .with(StatKey::Def, 4)
///     .with(StatKey::SpA, 252);
///
/// assert_eq!(spread.get(StatKey::Hp), 252);
/// assert_eq!(spread.get(StatKey::Atk), 0);
/// assert_eq!(spread.total(), 508);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EvSpreadRepr", into = "EvSpreadRepr")]
pub struct EvSpread {
    values: [u16; 6],
}

impl EvSpread {
    /// Creates an all-zero spread.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy with `key` set to `value`.
    pub fn with(mut self, key: StatKey, value: u16) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: StatKey) -> u16 {
        self.values[key.index()]
    }

    pub fn set(&mut self, key: StatKey, value: u16) {
        self.values[key.index()] = value;
    }

    /// Sum of all six stats.
    pub fn total(&self) -> u32 {
        self.values.iter().map(|v| u32::from(*v)).sum()
    }

    /// Returns `true` when the total does not exceed [`EV_TOTAL_LIMIT`].
    pub fn is_within_budget(&self) -> bool {
        self.total() <= EV_TOTAL_LIMIT
    }

    /// Iterates `(key, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (StatKey, u16)> + '_ {
        StatKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }

    /// Brings an over-budget spread back to [`EV_TOTAL_LIMIT`].
    ///
    /// The excess is subtracted from the stat whose value is the smallest one
    /// still able to absorb it. Ties go to the earliest key in canonical
    /// order. When no stat is large enough, nothing changes and
    /// [`NormalizeOutcome::NoCandidate`] is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use dex_builds_core::{EvSpread, NormalizeOutcome, StatKey};
    ///
    /// let mut spread = EvSpread::new()
    ///     .with(StatKey::Hp, 252)
    ///     .with(StatKey::Atk, 252)
    ///     .with(StatKey::Spe, 252)
    ///     .with(StatKey::Def, 4);
    ///
    /// let outcome = spread.normalize();
    /// assert_eq!(outcome, NormalizeOutcome::Corrected { key: StatKey::Hp, amount: 250 });
    /// assert_eq!(spread.get(StatKey::Hp), 2);
    /// assert_eq!(spread.total(), 510);
    /// ```
    pub fn normalize(&mut self) -> NormalizeOutcome {
        let total = self.total();
        if total <= EV_TOTAL_LIMIT {
            return NormalizeOutcome::Unchanged;
        }

        let excess = total - EV_TOTAL_LIMIT;
        let Ok(amount) = u16::try_from(excess) else {
            return NormalizeOutcome::NoCandidate { excess };
        };

        // min_by_key keeps the first minimum, which pins ties to canonical order.
        let candidate = StatKey::ALL
            .into_iter()
            .filter(|key| self.get(*key) >= amount)
            .min_by_key(|key| self.get(*key) - amount);

        match candidate {
            Some(key) => {
                self.set(key, self.get(key) - amount);
                NormalizeOutcome::Corrected { key, amount }
            }
            None => NormalizeOutcome::NoCandidate { excess },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
struct EvSpreadRepr {
    #[serde(rename = "HP")]
    hp: u16,
    #[serde(rename = "ATK")]
    atk: u16,
    #[serde(rename = "DEF")]
    def: u16,
    #[serde(rename = "SPE")]
    spe: u16,
    #[serde(rename = "SPA")]
    spa: u16,
    #[serde(rename = "SPD")]
    spd: u16,
}

impl From<EvSpreadRepr> for EvSpread {
    fn from(repr: EvSpreadRepr) -> Self {
        Self {
            values: [repr.hp, repr.atk, repr.def, repr.spe, repr.spa, repr.spd],
        }
    }
}

impl From<EvSpread> for EvSpreadRepr {
    fn from(spread: EvSpread) -> Self {
        let [hp, atk, def, spe, spa, spd] = spread.values;
        Self {
            hp,
            atk,
            def,
            spe,
            spa,
            spd,
        }
    }
}
