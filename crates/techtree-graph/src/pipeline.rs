//! End-to-end resolution of a loaded table set.

use std::path::Path;

use techtree_data::{DataLoadError, TableSet, TextResolver, UnlockOverrides, load_table_set, load_unlock_overrides};
use tracing::{info, warn};

use crate::assemble::{TechTreeModel, assemble};
use crate::bonus::BonusValueTable;
use crate::builder::TechGraph;
use crate::nations::build_nation_profiles;
use crate::reverse_index::{EffectUnlocks, UnlockIndex};

/// Resolve every table into the exported model.
///
/// All text tables are merged before anything is resolved; the unlock
/// indexes are complete before the first tech is parsed.
pub fn build_model(tables: &TableSet, overrides: &UnlockOverrides) -> TechTreeModel {
    let text = TextResolver::from_tables(tables.texts.iter().map(Vec::as_slice));
    let effects = EffectUnlocks::from_records(tables.effect_players.as_deref().unwrap_or_default());
    let index = UnlockIndex::from_tables(tables, overrides);

    let graph = TechGraph::build(&tables.techs, &text, &effects, &index);
    if let Some(cycle) = graph.find_cycle() {
        warn!(cycle = %cycle.join(" -> "), "prerequisite cycle");
    }

    let nations = build_nation_profiles(tables.nations.as_deref().unwrap_or_default(), &text);
    let values = BonusValueTable::from_records(tables.bonuses.as_deref().unwrap_or_default());

    let model = assemble(&graph, &nations, &values);
    info!(
        techs = model.techs.len(),
        bonus_techs = model.bonus_techs.len(),
        nations = model.nation_data.starting_techs.len(),
        "tech tree resolved"
    );
    model
}

/// Load the tables and override file from `dir` and resolve them.
pub fn build_model_from_dir(dir: &Path) -> Result<TechTreeModel, DataLoadError> {
    let tables = load_table_set(dir)?;
    let overrides = load_unlock_overrides(dir);
    Ok(build_model(&tables, &overrides))
}
