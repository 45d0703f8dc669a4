//! Curated unlock overrides for laws and improvements.
//!
//! The law and improvement tables do not carry a usable technology
//! prerequisite, so the techs that unlock them are curated by hand. The
//! curated maps ship as constants; an `unlock_overrides` data file in the
//! input directory may replace either map wholesale.

use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::loader::{deserialize_file, find_data_file, table};
use crate::schema::UnlockOverrideData;

/// Improvements unlocked per tech, curated from the game.
pub const CURATED_IMPROVEMENTS: &[(&str, &[&str])] = &[
    ("TECH_STONECUTTING", &["Fort", "Quarry"]),
    ("TECH_TRAPPING", &["Camp"]),
    ("TECH_DIVINATION", &["Shrine"]),
    ("TECH_ADMINISTRATION", &["Granary"]),
    ("TECH_HUSBANDRY", &["Pasture"]),
    ("TECH_DRAMA", &["Odeon"]),
    ("TECH_POLIS", &["Hamlet"]),
    ("TECH_MILITARY_DRILL", &["Barracks"]),
    ("TECH_ARISTOCRACY", &["Kushite Pyramids"]),
    ("TECH_FORESTRY", &["Lumbermill"]),
    ("TECH_COINAGE", &["Market"]),
    ("TECH_CITIZENSHIP", &["Courthouse"]),
    ("TECH_ARCHITECTURE", &["Baths"]),
    ("TECH_LAND_CONSOLIDATION", &["Grove"]),
    ("TECH_COMPOSITE_BOW", &["Range"]),
    ("TECH_MONASTICISM", &["Monastery"]),
    ("TECH_SCHOLARSHIP", &["Library"]),
    ("TECH_VAULTING", &["Cathedral"]),
    ("TECH_DOCTRINE", &["Temple"]),
    ("TECH_HYDRAULICS", &["Mill"]),
    ("TECH_CARTOGRAPHY", &["Harbor"]),
];

/// Law pairs unlocked per tech, curated from the game. Laws are unlocked in
/// mutually exclusive pairs, shown as `A/B`.
pub const CURATED_LAWS: &[(&str, &[&str])] = &[
    ("TECH_LABOR_FORCE", &["Slavery/Freedom"]),
    ("TECH_ARISTOCRACY", &["Centralization/Vassalage"]),
    ("TECH_RHETORIC", &["Epics/Exploration"]),
    ("TECH_NAVIGATION", &["Colonies/Serfdom"]),
    ("TECH_SOVEREIGNTY", &["Tyranny/Constitution"]),
    ("TECH_CITIZENSHIP", &["Divine Rule/Legal Code"]),
    ("TECH_ARCHITECTURE", &["Philosophy/Engineering"]),
    ("TECH_MONASTICISM", &["Monotheism/Polytheism"]),
    ("TECH_VAULTING", &["Iconography/Calligraphy"]),
    ("TECH_MANOR", &["Professional Army/Volunteers"]),
    ("TECH_DOCTRINE", &["Tolerance/Orthodoxy"]),
    ("TECH_LATEEN_SAIL", &["Autarky/Trade League"]),
    ("TECH_JURISPRUDENCE", &["Guilds/Elites"]),
    ("TECH_MARTIAL_CODE", &["Pilgrimage/Holy War"]),
    ("TECH_FISCAL_POLICY", &["Coin Debasement/Monetary Reform"]),
];

/// tech id → display names that replace the computed unlock list.
pub type OverrideMap = HashMap<String, Vec<String>>;

fn to_map(entries: &[(&str, &[&str])]) -> OverrideMap {
    entries
        .iter()
        .map(|(tech, names)| {
            (
                tech.to_string(),
                names.iter().map(|n| n.to_string()).collect(),
            )
        })
        .collect()
}

/// The override maps in effect for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockOverrides {
    pub laws: OverrideMap,
    pub improvements: OverrideMap,
}

impl UnlockOverrides {
    /// The curated maps shipped with the crate.
    pub fn curated() -> Self {
        Self {
            laws: to_map(CURATED_LAWS),
            improvements: to_map(CURATED_IMPROVEMENTS),
        }
    }

    /// No overrides at all.
    pub fn empty() -> Self {
        Self {
            laws: OverrideMap::new(),
            improvements: OverrideMap::new(),
        }
    }

    /// Replace each category the data file provides.
    pub fn with_data(mut self, data: UnlockOverrideData) -> Self {
        if let Some(laws) = data.laws {
            self.laws = laws;
        }
        if let Some(improvements) = data.improvements {
            self.improvements = improvements;
        }
        self
    }
}

impl Default for UnlockOverrides {
    fn default() -> Self {
        Self::curated()
    }
}

/// Load the overrides for `dir`: the curated maps, replaced per category by
/// an `unlock_overrides` file when one is present and readable.
pub fn load_unlock_overrides(dir: &Path) -> UnlockOverrides {
    let curated = UnlockOverrides::curated();

    let path = match find_data_file(dir, table::UNLOCK_OVERRIDES) {
        Ok(Some(path)) => path,
        Ok(None) => return curated,
        Err(e) => {
            warn!(error = %e, "unlock overrides skipped, using curated maps");
            return curated;
        }
    };

    match deserialize_file::<UnlockOverrideData>(&path) {
        Ok(data) => {
            info!(
                file = %path.display(),
                laws = data.laws.is_some(),
                improvements = data.improvements.is_some(),
                "unlock overrides loaded"
            );
            curated.with_data(data)
        }
        Err(e) => {
            warn!(error = %e, "unlock overrides unreadable, using curated maps");
            curated
        }
    }
}
