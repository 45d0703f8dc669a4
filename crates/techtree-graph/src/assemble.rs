//! The exported model: main techs, bonus cards, and nation data.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

use crate::bonus::{BonusValueTable, Classification, classify};
use crate::builder::TechGraph;
use crate::{NationProfile, TechNode};

/// Unlock lists as exported. Specialists and uncategorized unlocks are
/// internal only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnlockLists {
    pub units: Vec<String>,
    pub improvements: Vec<String>,
    pub laws: Vec<String>,
    pub projects: Vec<String>,
}

/// A node of the main technology tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainTech {
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub column: i32,
    pub row: i32,
    pub prereqs: Vec<String>,
    pub unlocks: UnlockLists,
}

/// A bonus card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BonusTech {
    pub id: String,
    /// The card label.
    pub name: String,
    pub cost: u32,
    /// First prerequisite of the source tech. Exported as `""` when absent.
    #[serde(serialize_with = "serialize_parent")]
    pub parent: Option<String>,
    /// The effect string.
    pub bonus: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nation: Option<String>,
}

fn serialize_parent<S: Serializer>(parent: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(parent.as_deref().unwrap_or(""))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NationData {
    pub starting_techs: BTreeMap<String, Vec<String>>,
    pub nation_names: BTreeMap<String, String>,
    /// nation id → bonus tech ids restricted to it, in bonus order. Nations
    /// without such techs have no entry.
    pub nation_specific_bonuses: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechTreeModel {
    pub techs: Vec<MainTech>,
    pub bonus_techs: Vec<BonusTech>,
    pub nation_data: NationData,
}

impl TechTreeModel {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn main_tech(&self, id: &str) -> Option<&MainTech> {
        self.techs.iter().find(|t| t.id == id)
    }

    pub fn bonus_tech(&self, id: &str) -> Option<&BonusTech> {
        self.bonus_techs.iter().find(|t| t.id == id)
    }
}

impl From<&TechNode> for MainTech {
    fn from(node: &TechNode) -> Self {
        Self {
            id: node.id.clone(),
            name: node.name.clone(),
            cost: node.cost,
            column: node.column,
            row: node.row,
            prereqs: node.prereq_ids.clone(),
            unlocks: UnlockLists {
                units: node.unlocks.units.clone(),
                improvements: node.unlocks.improvements.clone(),
                laws: node.unlocks.laws.clone(),
                projects: node.unlocks.projects.clone(),
            },
        }
    }
}

/// Partition the graph into main techs and bonus cards, in table order, and
/// attach the nation data.
pub fn assemble(graph: &TechGraph, nations: &[NationProfile], values: &BonusValueTable) -> TechTreeModel {
    let mut model = TechTreeModel::default();

    for node in graph.nodes() {
        match classify(node, values) {
            Classification::Main => model.techs.push(MainTech::from(node)),
            Classification::Bonus(card) => model.bonus_techs.push(BonusTech {
                id: node.id.clone(),
                name: card.label,
                cost: node.cost,
                parent: node.prereq_ids.first().cloned(),
                bonus: card.effect,
                nation: node.nation_restriction.first().cloned(),
            }),
        }
    }

    let data = &mut model.nation_data;
    for nation in nations {
        data.starting_techs
            .insert(nation.id.clone(), nation.starting_tech_ids.clone());
        data.nation_names.insert(nation.id.clone(), nation.name.clone());
    }
    for bonus in &model.bonus_techs {
        if let Some(nation) = &bonus.nation {
            data.nation_specific_bonuses
                .entry(nation.clone())
                .or_default()
                .push(bonus.id.clone());
        }
    }

    model
}
