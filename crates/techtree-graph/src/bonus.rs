//! Bonus card classification.
//!
//! A technology flagged as a bonus candidate is shown as a card rather than
//! a node of the main tree, unless its id carries a victory or event marker.
//! Each card gets a short label and an effect string. Both come from the
//! first entry of [`BONUS_RULES`] whose patterns match the uppercased tech
//! id, so rule order matters: several patterns are substrings of others
//! (`BORDERS` contains `ORDERS`, `HORSE_ARCHER` contains `ARCHER`).

use std::collections::HashMap;

use techtree_data::schema::{BonusRecord, int_or, non_empty};

use crate::TechNode;
use crate::names::title_case;

// ---------------------------------------------------------------------------
// Bonus values
// ---------------------------------------------------------------------------

/// Prefix of the bonus entry matching a tech: `BONUS_<tech id>`.
pub const BONUS_PREFIX: &str = "BONUS_";

/// bonus id → yield name (lowercase, without `YIELD_`) → amount.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BonusValueTable {
    by_bonus: HashMap<String, HashMap<String, i64>>,
}

impl BonusValueTable {
    pub fn from_records(records: &[BonusRecord]) -> Self {
        let mut by_bonus = HashMap::new();
        for record in records {
            let Some(id) = non_empty(record.id.as_ref()) else {
                continue;
            };
            let mut yields = HashMap::new();
            for pair in &record.global_yields {
                let Some(kind) = non_empty(pair.yield_type.as_ref()) else {
                    continue;
                };
                let name = kind.strip_prefix("YIELD_").unwrap_or(kind).to_lowercase();
                yields.insert(name, int_or(pair.value.as_ref(), 0));
            }
            by_bonus.insert(id.to_string(), yields);
        }
        Self { by_bonus }
    }

    /// Yields of one bonus entry.
    pub fn yields(&self, bonus_id: &str) -> Option<&HashMap<String, i64>> {
        self.by_bonus.get(bonus_id)
    }

    /// The positive amount of `yield_name` in the `BONUS_<id>` entry of `node`.
    pub fn value_for(&self, node: &TechNode, yield_name: &str) -> Option<i64> {
        self.yields(&format!("{BONUS_PREFIX}{}", node.id))?
            .get(yield_name)
            .copied()
            .filter(|&value| value > 0)
    }

    pub fn len(&self) -> usize {
        self.by_bonus.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_bonus.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// How a rule produces the card's effect string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    Fixed(&'static str),
    /// `+<amount> <display>` from the bonus values, or `fallback`.
    Yield {
        yield_name: &'static str,
        display: &'static str,
        fallback: &'static str,
    },
    /// `+<count> <unit>`.
    Units { count: u8, unit: &'static str },
    /// Like `Units`, with the count chosen by whether the id contains `marker`.
    TieredUnits {
        unit: &'static str,
        marker: &'static str,
        marked: u8,
        unmarked: u8,
    },
    /// The luxury resource name derived from the id.
    Luxury,
}

/// How a rule produces the card's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Fixed(&'static str),
    /// `Free <unit>`, for unit-granting effects.
    FreeUnit,
    SameAsEffect,
}

/// One entry of the ordered rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BonusRule {
    pub pattern: &'static str,
    /// Further substrings that must all be present.
    pub requires: &'static [&'static str],
    /// Substrings that disqualify the rule.
    pub excludes: &'static [&'static str],
    pub effect: Effect,
    pub label: Label,
}

impl BonusRule {
    const fn new(pattern: &'static str, effect: Effect, label: Label) -> Self {
        Self {
            pattern,
            requires: &[],
            excludes: &[],
            effect,
            label,
        }
    }

    const fn fixed(pattern: &'static str, effect: &'static str, label: &'static str) -> Self {
        Self::new(pattern, Effect::Fixed(effect), Label::Fixed(label))
    }

    const fn yields(
        pattern: &'static str,
        yield_name: &'static str,
        display: &'static str,
        fallback: &'static str,
        label: &'static str,
    ) -> Self {
        Self::new(
            pattern,
            Effect::Yield {
                yield_name,
                display,
                fallback,
            },
            Label::Fixed(label),
        )
    }

    const fn units(pattern: &'static str, count: u8, unit: &'static str) -> Self {
        Self::new(pattern, Effect::Units { count, unit }, Label::FreeUnit)
    }

    const fn requiring(mut self, substrings: &'static [&'static str]) -> Self {
        self.requires = substrings;
        self
    }

    const fn excluding(mut self, substrings: &'static [&'static str]) -> Self {
        self.excludes = substrings;
        self
    }

    /// Whether the rule applies to an uppercased tech id.
    pub fn matches(&self, upper_id: &str) -> bool {
        upper_id.contains(self.pattern)
            && self.requires.iter().all(|s| upper_id.contains(s))
            && !self.excludes.iter().any(|s| upper_id.contains(s))
    }

    /// Produce the card text for `node`.
    pub fn apply(&self, node: &TechNode, values: &BonusValueTable) -> BonusLabel {
        let (effect, unit) = match self.effect {
            Effect::Fixed(text) => (text.to_string(), None),
            Effect::Yield {
                yield_name,
                display,
                fallback,
            } => match values.value_for(node, yield_name) {
                Some(amount) => (format!("+{amount} {display}"), None),
                None => (fallback.to_string(), None),
            },
            Effect::Units { count, unit } => (format!("+{count} {unit}"), Some(unit)),
            Effect::TieredUnits {
                unit,
                marker,
                marked,
                unmarked,
            } => {
                let count = if node.id.to_uppercase().contains(marker) {
                    marked
                } else {
                    unmarked
                };
                (format!("+{count} {unit}"), Some(unit))
            }
            Effect::Luxury => (luxury_name(&node.id), None),
        };

        let label = match (self.label, unit) {
            (Label::Fixed(text), _) => text.to_string(),
            (Label::FreeUnit, Some(unit)) => format!("Free {unit}"),
            (Label::FreeUnit, None) | (Label::SameAsEffect, _) => effect.clone(),
        };

        BonusLabel { label, effect }
    }
}

/// The classification rules, first match wins.
pub const BONUS_RULES: &[BonusRule] = &[
    // Economy
    BonusRule::yields("STONE", "stone", "Stone", "+200 Stone", "Stone Boost").requiring(&["STONECUTTING"]),
    BonusRule::fixed("WORKER", "+1 Worker", "Free Worker"),
    BonusRule::yields("FOOD", "food", "Food", "+200 Food", "Food Boost"),
    BonusRule::fixed("SETTLER", "+1 Settler", "Free Settler"),
    BonusRule::fixed("BORDERS", "Border Growth", "Border Boost"),
    BonusRule::yields("ORDERS", "orders", "Orders", "+20 Orders", "Orders Boost"),
    BonusRule::yields("MONEY", "money", "Money", "+200 Money", "Money Boost"),
    BonusRule::fixed("MINISTER", "+1 Minister", "Free Minister"),
    BonusRule::fixed("SCIENTIST", "Free Scientist", "Free Scientist"),
    BonusRule::yields("CIVICS", "civics", "Civics", "Civic Points", "Civics Boost"),
    BonusRule::yields("TRAINING", "training", "Training", "Unit Training", "Training Boost"),
    BonusRule::fixed("HAPPINESS", "Happiness Boost", "Happiness Boost"),
    BonusRule::fixed("GOODS", "Luxury Goods", "Goods Bonus"),
    BonusRule::fixed("MERCHANT", "Free Merchant", "Free Merchant"),
    BonusRule::fixed("SOLDIER", "Free Court Soldier", "Free Court Soldier"),
    // Luxuries
    BonusRule::new("RESOURCE_", Effect::Luxury, Label::SameAsEffect),
    // Units
    BonusRule::units("BIREME", 1, "Bireme"),
    BonusRule::units("CHARIOT", 1, "Chariot").excluding(&["LIGHT", "HITTITE"]),
    BonusRule::units("MACEMAN", 1, "Maceman"),
    BonusRule::units("ONAGER", 1, "Onager"),
    BonusRule::units("ARCHER", 1, "Archer").excluding(&[
        "CAMEL",
        "HORSE",
        "AKKADIAN",
        "CIMMERIAN",
        "MEDJAY",
        "BEJA",
        "CATAPHRACT",
    ]),
    BonusRule::units("HORSEMAN", 1, "Horseman").excluding(&["HORSE_ARCHER"]),
    BonusRule::units("HORSE_ARCHER", 1, "Horse Archer"),
    BonusRule::units("CAMEL_ARCHER", 1, "Camel Archer"),
    BonusRule::units("WAR_ELEPHANT", 1, "War Elephant"),
    BonusRule::units("BALLISTA", 1, "Ballista"),
    BonusRule::units("LONGBOWMAN", 2, "Longbowman"),
    BonusRule::units("CROSSBOWMAN", 2, "Crossbowman"),
    // Nation units
    BonusRule::units("BATTERING_RAM", 1, "Battering Ram"),
    BonusRule::units("SIEGE_TOWER", 2, "Siege Tower"),
    BonusRule::units("AKKADIAN", 1, "Akkadian Archer"),
    BonusRule::units("CIMMERIAN", 2, "Cimmerian Archer"),
    BonusRule::units("AFRICAN_ELEPHANT", 1, "African Elephant"),
    BonusRule::units("TURRETED_ELEPHANT", 2, "Turreted Elephant"),
    BonusRule::units("LIGHT_CHARIOT", 1, "Light Chariot"),
    BonusRule::units("MOUNTED_LANCER", 2, "Mounted Lancer"),
    BonusRule::units("HOPLITE", 1, "Hoplite"),
    BonusRule::units("PHALANGITE", 2, "Phalangite"),
    BonusRule::new(
        "HITTITE_CHARIOT",
        Effect::TieredUnits {
            unit: "Hittite Chariot",
            marker: "1",
            marked: 1,
            unmarked: 2,
        },
        Label::FreeUnit,
    ),
    BonusRule::units("MEDJAY", 1, "Medjay"),
    BonusRule::units("BEJA", 2, "Beja Archer"),
    BonusRule::units("PALTON", 1, "Palton Cavalry"),
    BonusRule::units("CATAPHRACT", 2, "Cataphract Archer"),
    BonusRule::units("HASTATUS", 1, "Hastatus"),
    BonusRule::units("LEGIONARY", 2, "Legionary"),
    BonusRule::units("DMT", 1, "Dmt Warrior"),
    BonusRule::units("SHOTELAI", 2, "Shotelai"),
];

/// Markers of victory and event techs, which always stay in the main tree.
pub const VICTORY_MARKERS: &[&str] = &[
    "ECONOMIC_REFORM",
    "MILITARY_PRESTIGE",
    "INDUSTRIAL_PROGRESS",
    "EVENT_",
];

/// Curated display names for luxury resources, keyed by the derived name.
pub const LUXURY_NAMES: &[(&str, &str)] = &[
    ("Silk", "Silk"),
    ("Porcelain", "Porcelain"),
    ("Exotic Fur", "Exotic Furs"),
    ("Perfume", "Perfume"),
    ("Exotic Leather", "Exotic Leather"),
    ("Ebony", "Ebony"),
    ("Ivory", "Ivory"),
    ("Lavender", "Lavender"),
    ("Spices", "Spices"),
    ("Wine", "Wine"),
    ("Incense", "Incense"),
    ("Gems", "Gems"),
    ("Pearl", "Pearls"),
    ("Olive", "Olives"),
    ("Dye", "Dye"),
    ("Fur", "Furs"),
    ("Honey", "Honey"),
    ("Salt", "Salt"),
];

/// Luxury name of a resource tech: `TECH_RESOURCE_EXOTIC_FUR_BONUS` →
/// `Exotic Furs`. Unknown resources keep the derived name.
pub fn luxury_name(tech_id: &str) -> String {
    let bare = tech_id
        .to_uppercase()
        .replace("TECH_RESOURCE_", "")
        .replace("_BONUS", "");
    let derived = title_case(&bare.replace('_', " "));
    LUXURY_NAMES
        .iter()
        .find(|(key, _)| *key == derived)
        .map_or(derived, |(_, curated)| curated.to_string())
}

pub fn is_victory_or_event(tech_id: &str) -> bool {
    let upper = tech_id.to_uppercase();
    VICTORY_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// The first rule matching `tech_id`, if any.
pub fn rule_for(tech_id: &str) -> Option<&'static BonusRule> {
    let upper = tech_id.to_uppercase();
    BONUS_RULES.iter().find(|rule| rule.matches(&upper))
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Text shown on a bonus card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusLabel {
    pub label: String,
    pub effect: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Main,
    Bonus(BonusLabel),
}

/// Card text for a bonus tech. Never empty: without a matching rule both
/// label and effect are the tech's resolved name.
///
/// A luxury id that also names a unit keeps the luxury effect but takes the
/// unit's label, since resources are the last label choice.
pub fn bonus_label(node: &TechNode, values: &BonusValueTable) -> BonusLabel {
    if let Some(rule) = rule_for(&node.id) {
        let mut card = rule.apply(node, values);
        if rule.effect == Effect::Luxury {
            let upper = node.id.to_uppercase();
            if let Some(unit_rule) = BONUS_RULES
                .iter()
                .find(|r| r.effect != Effect::Luxury && r.matches(&upper))
            {
                card.label = unit_rule.apply(node, values).label;
            }
        }
        return card;
    }
    let name = if node.name.is_empty() {
        "Bonus".to_string()
    } else {
        node.name.clone()
    };
    BonusLabel {
        label: name.clone(),
        effect: name,
    }
}

/// Decide whether `node` belongs to the main tree or is a bonus card.
pub fn classify(node: &TechNode, values: &BonusValueTable) -> Classification {
    if !node.is_bonus_candidate || is_victory_or_event(&node.id) {
        Classification::Main
    } else {
        Classification::Bonus(bonus_label(node, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Unlocks;
    use techtree_data::schema::{FieldValue, YieldPair};

    fn candidate(id: &str) -> TechNode {
        TechNode {
            id: id.to_string(),
            name: String::new(),
            description: String::new(),
            cost: 0,
            row: 0,
            column: 0,
            prereq_ids: Vec::new(),
            unlocks: Unlocks::default(),
            is_bonus_candidate: true,
            bonus_discover_ref: None,
            nation_restriction: Vec::new(),
        }
    }

    fn values(bonus_id: &str, yields: &[(&str, i64)]) -> BonusValueTable {
        BonusValueTable::from_records(&[BonusRecord {
            id: Some(bonus_id.to_string()),
            global_yields: yields
                .iter()
                .map(|(kind, value)| YieldPair {
                    yield_type: Some(kind.to_string()),
                    value: Some(FieldValue::Text(value.to_string())),
                })
                .collect(),
        }])
    }

    fn card(id: &str) -> (String, String) {
        let label = bonus_label(&candidate(id), &BonusValueTable::default());
        (label.label, label.effect)
    }

    // -----------------------------------------------------------------------
    // Routing
    // -----------------------------------------------------------------------

    #[test]
    fn non_candidates_are_main() {
        let mut node = candidate("TECH_BONUS_WORKER");
        node.is_bonus_candidate = false;
        assert_eq!(classify(&node, &BonusValueTable::default()), Classification::Main);
    }

    #[test]
    fn victory_and_event_markers_force_main() {
        for id in [
            "TECH_ECONOMIC_REFORM",
            "TECH_MILITARY_PRESTIGE_1",
            "TECH_INDUSTRIAL_PROGRESS",
            "TECH_EVENT_WORKER",
            "tech_event_money",
        ] {
            assert_eq!(
                classify(&candidate(id), &BonusValueTable::default()),
                Classification::Main,
                "{id}"
            );
        }
    }

    #[test]
    fn worker_bonus_without_values() {
        let result = classify(&candidate("TECH_BONUS_WORKER"), &BonusValueTable::default());
        assert_eq!(
            result,
            Classification::Bonus(BonusLabel {
                label: "Free Worker".to_string(),
                effect: "+1 Worker".to_string(),
            })
        );
    }

    // -----------------------------------------------------------------------
    // Rule order
    // -----------------------------------------------------------------------

    #[test]
    fn borders_is_checked_before_orders() {
        assert_eq!(card("TECH_BONUS_BORDERS"), ("Border Boost".into(), "Border Growth".into()));
        assert_eq!(card("TECH_BONUS_ORDERS"), ("Orders Boost".into(), "+20 Orders".into()));
    }

    #[test]
    fn stone_needs_stonecutting() {
        assert_eq!(
            card("TECH_STONECUTTING_BONUS_STONE"),
            ("Stone Boost".into(), "+200 Stone".into())
        );
        // STONE alone matches nothing and falls through to the name.
        assert_eq!(card("TECH_STONE_AGE"), ("Bonus".into(), "Bonus".into()));
    }

    #[test]
    fn archer_variants_are_guarded() {
        assert_eq!(card("TECH_BONUS_ARCHER"), ("Free Archer".into(), "+1 Archer".into()));
        assert_eq!(
            card("TECH_BONUS_HORSE_ARCHER"),
            ("Free Horse Archer".into(), "+1 Horse Archer".into())
        );
        assert_eq!(
            card("TECH_BONUS_CAMEL_ARCHER"),
            ("Free Camel Archer".into(), "+1 Camel Archer".into())
        );
        assert_eq!(
            card("TECH_BONUS_AKKADIAN_ARCHER"),
            ("Free Akkadian Archer".into(), "+1 Akkadian Archer".into())
        );
        assert_eq!(
            card("TECH_BONUS_CATAPHRACT_ARCHER"),
            ("Free Cataphract Archer".into(), "+2 Cataphract Archer".into())
        );
    }

    #[test]
    fn chariot_variants_are_guarded() {
        assert_eq!(card("TECH_BONUS_CHARIOT"), ("Free Chariot".into(), "+1 Chariot".into()));
        assert_eq!(
            card("TECH_BONUS_LIGHT_CHARIOT"),
            ("Free Light Chariot".into(), "+1 Light Chariot".into())
        );
        assert_eq!(
            card("TECH_BONUS_HITTITE_CHARIOT_1"),
            ("Free Hittite Chariot".into(), "+1 Hittite Chariot".into())
        );
        assert_eq!(
            card("TECH_BONUS_HITTITE_CHARIOT_2"),
            ("Free Hittite Chariot".into(), "+2 Hittite Chariot".into())
        );
    }

    #[test]
    fn matching_ignores_case() {
        assert_eq!(card("tech_bonus_longbowman"), ("Free Longbowman".into(), "+2 Longbowman".into()));
    }

    // -----------------------------------------------------------------------
    // Values
    // -----------------------------------------------------------------------

    #[test]
    fn yield_values_fill_the_effect() {
        let table = values("BONUS_TECH_BONUS_FOOD", &[("YIELD_FOOD", 300), ("YIELD_MONEY", 5)]);
        let label = bonus_label(&candidate("TECH_BONUS_FOOD"), &table);
        assert_eq!(label.effect, "+300 Food");
        assert_eq!(label.label, "Food Boost");

        let civics = values("BONUS_TECH_BONUS_CIVICS", &[("YIELD_CIVICS", 150)]);
        assert_eq!(
            bonus_label(&candidate("TECH_BONUS_CIVICS"), &civics).effect,
            "+150 Civics"
        );
    }

    #[test]
    fn non_positive_values_use_the_fallback() {
        let table = values("BONUS_TECH_BONUS_MONEY", &[("YIELD_MONEY", 0)]);
        assert_eq!(
            bonus_label(&candidate("TECH_BONUS_MONEY"), &table).effect,
            "+200 Money"
        );
        let table = values("BONUS_TECH_BONUS_TRAINING", &[("YIELD_TRAINING", -10)]);
        assert_eq!(
            bonus_label(&candidate("TECH_BONUS_TRAINING"), &table).effect,
            "Unit Training"
        );
    }

    #[test]
    fn discover_reference_is_not_a_value_source() {
        let table = values("BONUS_FREE_ORDERS", &[("YIELD_ORDERS", 40)]);
        let mut node = candidate("TECH_BONUS_ORDERS");
        node.bonus_discover_ref = Some("BONUS_FREE_ORDERS".to_string());
        assert_eq!(bonus_label(&node, &table).effect, "+20 Orders");
    }

    // -----------------------------------------------------------------------
    // Luxuries and fallback
    // -----------------------------------------------------------------------

    #[test]
    fn luxury_names_are_curated() {
        assert_eq!(luxury_name("TECH_RESOURCE_EXOTIC_FUR_BONUS"), "Exotic Furs");
        assert_eq!(luxury_name("TECH_RESOURCE_PEARL"), "Pearls");
        assert_eq!(luxury_name("TECH_RESOURCE_SILK_BONUS"), "Silk");
        assert_eq!(luxury_name("TECH_RESOURCE_AMBER_BONUS"), "Amber");
        assert_eq!(card("TECH_RESOURCE_OLIVE_BONUS"), ("Olives".into(), "Olives".into()));
    }

    #[test]
    fn luxury_names_ignore_case() {
        assert_eq!(luxury_name("tech_resource_silk"), "Silk");
        assert_eq!(luxury_name("Tech_Resource_Exotic_Fur_Bonus"), "Exotic Furs");
        assert_eq!(card("tech_resource_pearl_bonus"), ("Pearls".into(), "Pearls".into()));
    }

    #[test]
    fn unit_labels_outrank_luxuries() {
        assert_eq!(
            card("TECH_RESOURCE_HOPLITE_BONUS"),
            ("Free Hoplite".into(), "Hoplite".into())
        );
        // Economy rules still come first for both texts.
        assert_eq!(
            card("TECH_RESOURCE_WORKER_BONUS"),
            ("Free Worker".into(), "+1 Worker".into())
        );
        for (key, _) in LUXURY_NAMES {
            let id = format!("TECH_RESOURCE_{}_BONUS", key.to_uppercase().replace(' ', "_"));
            let (label, effect) = card(&id);
            assert_eq!(label, effect, "{id}");
        }
    }

    #[test]
    fn unmatched_candidates_use_their_name() {
        let mut node = candidate("TECH_BONUS_MYSTERY");
        node.name = "Mystery Cult".to_string();
        assert_eq!(
            bonus_label(&node, &BonusValueTable::default()),
            BonusLabel {
                label: "Mystery Cult".to_string(),
                effect: "Mystery Cult".to_string(),
            }
        );
    }

    #[test]
    fn every_rule_produces_text() {
        for rule in BONUS_RULES {
            let id = format!("TECH_{}_{}", rule.pattern, rule.requires.join("_"));
            let label = rule.apply(&candidate(&id), &BonusValueTable::default());
            assert!(!label.label.is_empty(), "{}", rule.pattern);
            assert!(!label.effect.is_empty(), "{}", rule.pattern);
        }
    }

    #[test]
    fn yield_names_are_lowercased() {
        let table = values("BONUS_X", &[("YIELD_STONE", 100), ("", 5)]);
        let yields = table.yields("BONUS_X").unwrap();
        assert_eq!(yields.get("stone"), Some(&100));
        assert_eq!(yields.len(), 1);
    }
}
