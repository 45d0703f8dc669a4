//! Tech graph resolution for the game's technology tables.
//!
//! Turns the record tables loaded by `techtree-data` into one normalized
//! model: the main technology tree, the side-tree of bonus technologies, and
//! per-nation starting conditions.
//!
//! # Overview
//!
//! The pipeline runs once per input directory, strictly in this order:
//!
//! 1. Text tables are merged into a frozen [`TextResolver`].
//! 2. Unit, improvement, law and project tables become [`ForwardTable`]s,
//!    which are inverted into a tech → unlocked names [`UnlockIndex`].
//! 3. [`TechGraph::build`] parses each technology record, resolving names
//!    and layering the unlock passes over the effect-player defaults.
//! 4. [`classify`] decides, per technology, whether it belongs to the main
//!    tree or is a bonus card, and derives the card's label and effect.
//! 5. [`assemble`] partitions the graph into the final [`TechTreeModel`].
//!
//! [`build_model`] runs all of it over a loaded [`TableSet`].
//!
//! [`TextResolver`]: techtree_data::TextResolver
//! [`TableSet`]: techtree_data::TableSet

pub mod assemble;
pub mod bonus;
pub mod builder;
pub mod forward;
pub mod names;
pub mod nations;
pub mod pipeline;
pub mod reverse_index;

pub use assemble::{BonusTech, MainTech, NationData, TechTreeModel, UnlockLists, assemble};
pub use bonus::{BONUS_RULES, BonusLabel, BonusValueTable, Classification, VICTORY_MARKERS, classify};
pub use builder::TechGraph;
pub use forward::{ForwardRef, ForwardTable};
pub use nations::build_nation_profiles;
pub use pipeline::{build_model, build_model_from_dir};
pub use reverse_index::{CategoryIndex, EffectUnlocks, UnlockIndex};

// ---------------------------------------------------------------------------
// Unlock categories
// ---------------------------------------------------------------------------

/// The kinds of entity a technology can unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Unit,
    Improvement,
    Law,
    Project,
    Specialist,
}

impl Category {
    /// Identifier prefix of the category's records, stripped for display.
    pub const fn prefix(self) -> &'static str {
        match self {
            Category::Unit => "UNIT_",
            Category::Improvement => "IMPROVEMENT_",
            Category::Law => "LAW_",
            Category::Project => "PROJECT_",
            Category::Specialist => "SPECIALIST_",
        }
    }

    /// Display name of a record identifier in this category.
    pub fn display_name(self, raw_id: &str) -> String {
        match self {
            Category::Project => names::project_display_name(raw_id),
            _ => names::display_name(raw_id, self.prefix()),
        }
    }
}

// ---------------------------------------------------------------------------
// Technology nodes
// ---------------------------------------------------------------------------

/// What a technology unlocks, as display names per category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unlocks {
    pub units: Vec<String>,
    pub improvements: Vec<String>,
    pub laws: Vec<String>,
    pub projects: Vec<String>,
    pub specialists: Vec<String>,
    /// Uncategorized unlocks. No current source fills this.
    pub other: Vec<String>,
}

impl Unlocks {
    /// The list holding `category`.
    pub fn list_mut(&mut self, category: Category) -> &mut Vec<String> {
        match category {
            Category::Unit => &mut self.units,
            Category::Improvement => &mut self.improvements,
            Category::Law => &mut self.laws,
            Category::Project => &mut self.projects,
            Category::Specialist => &mut self.specialists,
        }
    }

    pub fn list(&self, category: Category) -> &[String] {
        match category {
            Category::Unit => &self.units,
            Category::Improvement => &self.improvements,
            Category::Law => &self.laws,
            Category::Project => &self.projects,
            Category::Specialist => &self.specialists,
        }
    }
}

/// A parsed technology. Immutable once the graph is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechNode {
    /// Unique identifier, e.g. `TECH_STONECUTTING`.
    pub id: String,
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub row: i32,
    pub column: i32,
    /// Prerequisite tech ids in declaration order, without repeats. May
    /// name unknown techs or form cycles; those are preserved as data.
    pub prereq_ids: Vec<String>,
    pub unlocks: Unlocks,
    /// True iff any of the hidden, discardable, or no-free-grant flags is set.
    pub is_bonus_candidate: bool,
    pub bonus_discover_ref: Option<String>,
    /// Nations allowed to draw this tech, in declaration order.
    pub nation_restriction: Vec<String>,
}

/// A nation with at least one starting tech.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NationProfile {
    pub id: String,
    pub name: String,
    pub starting_tech_ids: Vec<String>,
}

/// Push `value` unless an equal element is already present.
pub(crate) fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
