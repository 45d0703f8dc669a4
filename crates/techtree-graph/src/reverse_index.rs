//! Reverse indexes: tech id → names of what it unlocks.
//!
//! Entities declare the tech that unlocks them; the tech graph needs the
//! opposite view. Each [`CategoryIndex`] inverts one [`ForwardTable`] once,
//! up front, and is immutable afterwards. The law and improvement indexes
//! additionally take the curated overrides, which replace (never merge with)
//! the computed entry for a tech.

use std::collections::HashMap;

use techtree_data::overrides::OverrideMap;
use techtree_data::schema::{EffectPlayerRecord, EntityRecord, non_empty};
use techtree_data::{TableSet, UnlockOverrides};
use tracing::debug;

use crate::forward::ForwardTable;
use crate::{Category, Unlocks, push_unique};

// ---------------------------------------------------------------------------
// Per-category index
// ---------------------------------------------------------------------------

/// tech id → unlocked display names for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryIndex {
    category: Category,
    by_tech: HashMap<String, Vec<String>>,
}

impl CategoryIndex {
    /// Invert a forward table. Names keep the table's declaration order;
    /// a name repeated for the same tech (collapsed project tiers) is kept
    /// once.
    pub fn build(table: &ForwardTable) -> Self {
        let mut by_tech: HashMap<String, Vec<String>> = HashMap::new();
        for entry in &table.entries {
            let names = by_tech.entry(entry.tech_id.clone()).or_default();
            push_unique(names, &entry.display_name);
        }
        Self {
            category: table.category,
            by_tech,
        }
    }

    /// Layer a curated override map on top: each overridden tech's entry is
    /// replaced outright.
    pub fn with_overrides(mut self, overrides: &OverrideMap) -> Self {
        for (tech_id, names) in overrides {
            self.by_tech.insert(tech_id.clone(), names.clone());
        }
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// The names unlocked by `tech_id`, if it unlocks anything here.
    pub fn get(&self, tech_id: &str) -> Option<&[String]> {
        self.by_tech.get(tech_id).map(Vec::as_slice)
    }

    /// Number of techs with an entry.
    pub fn len(&self) -> usize {
        self.by_tech.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_tech.is_empty()
    }
}

// ---------------------------------------------------------------------------
// All unlock passes
// ---------------------------------------------------------------------------

/// The category indexes applied over the effect-player defaults, one per
/// table. `None` means the table was missing, so that pass is skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnlockIndex {
    pub units: Option<CategoryIndex>,
    pub improvements: Option<CategoryIndex>,
    pub laws: Option<CategoryIndex>,
    pub projects: Option<CategoryIndex>,
}

fn index_for(
    category: Category,
    records: Option<&[EntityRecord]>,
    overrides: Option<&OverrideMap>,
) -> Option<CategoryIndex> {
    let records = records?;
    let index = CategoryIndex::build(&ForwardTable::from_records(category, records));
    let index = match overrides {
        Some(map) => index.with_overrides(map),
        None => index,
    };
    debug!(?category, techs = index.len(), "reverse index built");
    Some(index)
}

impl UnlockIndex {
    /// Build every pass from the loaded tables.
    pub fn from_tables(tables: &TableSet, overrides: &UnlockOverrides) -> Self {
        Self {
            units: index_for(Category::Unit, tables.units.as_deref(), None),
            improvements: index_for(
                Category::Improvement,
                tables.improvements.as_deref(),
                Some(&overrides.improvements),
            ),
            laws: index_for(Category::Law, tables.laws.as_deref(), Some(&overrides.laws)),
            projects: index_for(Category::Project, tables.projects.as_deref(), None),
        }
    }

    /// The passes that exist, in application order.
    pub fn passes(&self) -> impl Iterator<Item = &CategoryIndex> {
        [&self.units, &self.improvements, &self.laws, &self.projects]
            .into_iter()
            .flatten()
    }

    /// Overwrite each category of `unlocks` that a pass has an entry for.
    pub fn apply(&self, tech_id: &str, unlocks: &mut Unlocks) {
        for pass in self.passes() {
            if let Some(names) = pass.get(tech_id) {
                *unlocks.list_mut(pass.category()) = names.to_vec();
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Effect-player defaults
// ---------------------------------------------------------------------------

/// effect id → unlock lists, the per-category defaults a tech starts from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectUnlocks {
    by_effect: HashMap<String, Unlocks>,
}

impl EffectUnlocks {
    pub fn from_records(records: &[EffectPlayerRecord]) -> Self {
        let mut by_effect = HashMap::new();
        for record in records {
            let Some(id) = non_empty(record.id.as_ref()) else {
                continue;
            };
            let mut unlocks = Unlocks::default();
            for (category, raw_ids) in [
                (Category::Unit, &record.units),
                (Category::Improvement, &record.improvements),
                (Category::Law, &record.laws),
                (Category::Project, &record.projects),
                (Category::Specialist, &record.specialists),
            ] {
                let list = unlocks.list_mut(category);
                for raw in raw_ids.iter().filter(|r| !r.is_empty()) {
                    list.push(category.display_name(raw));
                }
            }
            by_effect.insert(id.to_string(), unlocks);
        }
        Self { by_effect }
    }

    pub fn get(&self, effect_id: &str) -> Option<&Unlocks> {
        self.by_effect.get(effect_id)
    }

    pub fn len(&self) -> usize {
        self.by_effect.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_effect.is_empty()
    }
}
