//! Field parsers for build-table rows.
//!
//! Each row of a build table pairs a header cell (the label) with a value
//! cell. [`FieldLabel`] is the closed set of labels we understand; every other
//! label is ignored so extra rows on the wiki don't break extraction.
//!
//! The `parse_*` functions are lenient: they return `None` (or skip a
//! segment) instead of failing, and [`apply_field`] only overwrites a record
//! field when its parser produced a value.

use std::sync::LazyLock;

use dex_builds_core::{BuildRecord, EvSpread, NormalizeOutcome, StatKey};
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

use crate::document::element_text;

static EV_SEGMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^0-9]*)([0-9]+)([^0-9]*)$").expect("static regex must compile")
});
static TERA_ALT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Pokemon (.*) Type Icon").expect("static regex must compile"));

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a").expect("static selector must parse"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("static selector must parse"));

/// Row labels recognized in build tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLabel {
    Nature,
    EvSpread,
    Ability,
    TeraType,
    HeldItem,
    Moveset,
}

impl FieldLabel {
    pub const ALL: [FieldLabel; 6] = [
        FieldLabel::Nature,
        FieldLabel::EvSpread,
        FieldLabel::Ability,
        FieldLabel::TeraType,
        FieldLabel::HeldItem,
        FieldLabel::Moveset,
    ];

    /// Header text as it appears on the wiki.
    pub const fn as_str(self) -> &'static str {
        match self {
            FieldLabel::Nature => "Nature",
            FieldLabel::EvSpread => "EV Spread",
            FieldLabel::Ability => "Ability",
            FieldLabel::TeraType => "Tera Type",
            FieldLabel::HeldItem => "Held Item",
            FieldLabel::Moveset => "Moveset",
        }
    }

    /// Exact match against a trimmed header cell.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == label)
    }
}

/// First whitespace-delimited token, e.g. `"Jolly (+Spe, -SpA)"` → `"Jolly"`.
pub fn parse_nature(text: &str) -> Option<String> {
    text.split_whitespace().next().map(str::to_string)
}

/// Parses `"252 HP / 4 Def / 252 SpA"`-style text without normalizing.
///
/// The stat name may come before or after the number. Segments that don't
/// match, name an unknown stat, or overflow are skipped.
pub fn parse_ev_segments(text: &str) -> EvSpread {
    let mut spread = EvSpread::new();

    for segment in text.split('/') {
        let segment = segment.trim();
        let Some(caps) = EV_SEGMENT_RE.captures(segment) else {
            debug!(segment, "Skipping unparsable EV segment");
            continue;
        };

        let prefix = caps.get(1).map_or("", |m| m.as_str());
        let suffix = caps.get(3).map_or("", |m| m.as_str());
        let raw_name = if prefix.trim().is_empty() { suffix } else { prefix };
        let name = strip_whitespace(raw_name);

        let Some(key) = StatKey::from_label(&name) else {
            debug!(segment, stat = %name, "Skipping EV segment with unknown stat");
            continue;
        };
        let Ok(value) = caps[2].parse::<u16>() else {
            debug!(segment, "Skipping EV segment with out-of-range value");
            continue;
        };
        spread.set(key, value);
    }

    spread
}

/// Parses an EV cell and brings the result within the 510-point budget.
pub fn parse_ev_spread(text: &str) -> EvSpread {
    let mut spread = parse_ev_segments(text);
    match spread.normalize() {
        NormalizeOutcome::Unchanged => {}
        NormalizeOutcome::Corrected { key, amount } => {
            debug!(stat = %key, amount, "Trimmed over-budget EV spread");
        }
        NormalizeOutcome::NoCandidate { excess } => {
            warn!(
                spread = text,
                excess, "EV spread exceeds budget and no stat can absorb the excess"
            );
        }
    }
    spread
}

/// Ability name with all whitespace removed (`"Rough Skin"` → `"RoughSkin"`).
pub fn parse_ability(text: &str) -> Option<String> {
    let ability = strip_whitespace(text);
    (!ability.is_empty()).then_some(ability)
}

/// Tera type from a type-icon `alt` text (`"Pokemon Steel Type Icon"` → `"Steel"`).
pub fn parse_tera_type(alt: Option<&str>) -> Option<String> {
    let caps = TERA_ALT_RE.captures(alt?)?;
    Some(caps[1].to_string())
}

/// First line of the cell; some cells append an item description below.
pub fn parse_held_item(text: &str) -> Option<String> {
    let first_line = text.trim().lines().next()?.trim();
    (!first_line.is_empty()).then(|| first_line.to_string())
}

/// Move names from link texts with whitespace and hyphens stripped.
///
/// `["Flame- Charge", "U-turn", ""]` → `["FlameCharge", "Uturn"]`.
pub fn parse_moveset<'a>(link_texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    link_texts
        .into_iter()
        .map(|text| {
            text.chars()
                .filter(|ch| !ch.is_whitespace() && *ch != '-')
                .collect::<String>()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

/// Applies one value cell to the record under construction.
pub fn apply_field(record: &mut BuildRecord, field: FieldLabel, cell: ElementRef<'_>) {
    let text = element_text(cell);
    let text = text.trim();

    match field {
        FieldLabel::Nature => {
            if let Some(nature) = parse_nature(text) {
                record.nature = nature;
            }
        }
        FieldLabel::EvSpread => record.evs = parse_ev_spread(text),
        FieldLabel::Ability => {
            if let Some(ability) = parse_ability(text) {
                record.ability = ability;
            }
        }
        FieldLabel::TeraType => {
            let alt = cell
                .select(&IMAGE_SELECTOR)
                .next()
                .and_then(|img| img.value().attr("alt"));
            match parse_tera_type(alt) {
                Some(tera_type) => record.tera_type = tera_type,
                None => debug!(alt = ?alt, "No tera type icon in cell"),
            }
        }
        FieldLabel::HeldItem => {
            if let Some(item) = parse_held_item(text) {
                record.held_item = item;
            }
        }
        FieldLabel::Moveset => {
            let links: Vec<String> = cell.select(&LINK_SELECTOR).map(element_text).collect();
            record.moveset = parse_moveset(links.iter().map(String::as_str));
        }
    }
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn spread(values: [(StatKey, u16); 6]) -> EvSpread {
        values
            .into_iter()
            .fold(EvSpread::new(), |acc, (key, value)| acc.with(key, value))
    }

    #[test]
    fn test_field_label_exact_match() {
        assert_eq!(FieldLabel::from_label("EV Spread"), Some(FieldLabel::EvSpread));
        assert_eq!(FieldLabel::from_label("Tera Type"), Some(FieldLabel::TeraType));
        assert_eq!(FieldLabel::from_label("ev spread"), None);
        assert_eq!(FieldLabel::from_label("Role"), None);
    }

    #[test]
    fn test_parse_nature_takes_first_token() {
        assert_eq!(parse_nature("Jolly (+Spe, -SpA)").as_deref(), Some("Jolly"));
        assert_eq!(parse_nature("  Modest\nor Timid").as_deref(), Some("Modest"));
        assert_eq!(parse_nature("   "), None);
    }

    #[test]
    fn test_parse_ev_spread_suffix_names() {
        let evs = parse_ev_spread("252 HP / 4 Def / 252 SpA");
        assert_eq!(
            evs,
            spread([
                (StatKey::Hp, 252),
                (StatKey::Atk, 0),
                (StatKey::Def, 4),
                (StatKey::Spe, 0),
                (StatKey::SpA, 252),
                (StatKey::SpD, 0),
            ])
        );
        assert_eq!(evs.total(), 508);
    }

    #[test]
    fn test_parse_ev_spread_prefix_names() {
        let evs = parse_ev_spread("HP 4 / Sp. Atk 252 / Spe 252");
        assert_eq!(evs.get(StatKey::Hp), 4);
        assert_eq!(evs.get(StatKey::SpA), 252);
        assert_eq!(evs.get(StatKey::Spe), 252);
    }

    #[test]
    fn test_parse_ev_spread_corrects_over_budget() {
        let evs = parse_ev_spread("252 HP / 252 Atk / 252 Spe / 4 Def");
        assert_eq!(evs.total(), 510);
        assert_eq!(evs.get(StatKey::Hp), 2);
        assert_eq!(evs.get(StatKey::Atk), 252);
        assert_eq!(evs.get(StatKey::Spe), 252);
        assert_eq!(evs.get(StatKey::Def), 4);
    }

    #[test]
    fn test_parse_ev_segments_skips_garbage() {
        let evs = parse_ev_segments("252 HP / / none / 4 Foo / 99999 Atk / 1 2 Def / 252 Spe");
        assert_eq!(evs.get(StatKey::Hp), 252);
        assert_eq!(evs.get(StatKey::Spe), 252);
        assert_eq!(evs.total(), 504);
    }

    #[test]
    fn test_parse_ability_strips_whitespace() {
        assert_eq!(parse_ability("Rough Skin").as_deref(), Some("RoughSkin"));
        assert_eq!(parse_ability(" \n "), None);
    }

    #[test]
    fn test_parse_tera_type_from_alt() {
        assert_eq!(
            parse_tera_type(Some("Pokemon Steel Type Icon")).as_deref(),
            Some("Steel")
        );
        assert_eq!(parse_tera_type(Some("Steel")), None);
        assert_eq!(parse_tera_type(None), None);
    }

    #[test]
    fn test_parse_held_item_keeps_first_line() {
        assert_eq!(
            parse_held_item("Choice Scarf\nBoosts Speed but locks moves").as_deref(),
            Some("Choice Scarf")
        );
        assert_eq!(parse_held_item("  Leftovers  ").as_deref(), Some("Leftovers"));
    }

    #[test]
    fn test_parse_moveset_strips_and_drops_empty() {
        assert_eq!(
            parse_moveset(["Flame- Charge", "U-turn", "Protect", ""]),
            vec!["FlameCharge", "Uturn", "Protect"]
        );
        assert_eq!(parse_moveset([" - "]), Vec::<String>::new());
    }

    #[test]
    fn test_apply_field_reads_cell_markup() {
        let html = Html::parse_fragment(
            r#"<table><tr>
                <td id="tera"><img src="x.png" alt="Pokemon Fairy Type Icon"> Fairy</td>
                <td id="moves"><a>Flame- Charge</a><a>U-turn</a><a>Protect</a><a></a></td>
                <td id="empty">Fairy</td>
            </tr></table>"#,
        );
        let cell = |id: &str| {
            let selector = Selector::parse(&format!("#{id}")).unwrap();
            html.select(&selector).next().unwrap()
        };

        let mut record = BuildRecord::new();
        apply_field(&mut record, FieldLabel::TeraType, cell("tera"));
        apply_field(&mut record, FieldLabel::Moveset, cell("moves"));
        assert_eq!(record.tera_type, "Fairy");
        assert_eq!(record.moveset, vec!["FlameCharge", "Uturn", "Protect"]);

        let mut record = BuildRecord::new();
        apply_field(&mut record, FieldLabel::TeraType, cell("empty"));
        assert!(record.tera_type.is_empty());
    }
}
