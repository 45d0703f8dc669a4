//! Tech graph construction from the technology table.

use std::collections::HashMap;

use techtree_data::TextResolver;
use techtree_data::schema::{TechRecord, flag, int_or, non_empty};
use tracing::{debug, warn};

use crate::reverse_index::{EffectUnlocks, UnlockIndex};
use crate::{TechNode, Unlocks, names, push_unique};

/// Identifier prefix of technology records.
pub const TECH_PREFIX: &str = "TECH_";

/// Parse one technology record. Returns `None` for entries without an
/// identifier (template rows).
///
/// Never fails on malformed fields: numbers default to 0, flags to false.
pub fn parse_tech(record: &TechRecord, text: &TextResolver, effects: &EffectUnlocks) -> Option<TechNode> {
    let id = non_empty(record.id.as_ref())?;

    let name = text.resolve(record.name_tag.as_deref(), || {
        names::display_name(id, TECH_PREFIX)
    });
    let description = text.resolve(record.advice_tag.as_deref(), String::new);

    let cost = u32::try_from(int_or(record.cost.as_ref(), 0)).unwrap_or(0);
    let row = i32::try_from(int_or(record.row.as_ref(), 0)).unwrap_or(0);
    let column = i32::try_from(int_or(record.column.as_ref(), 0)).unwrap_or(0);

    let mut prereq_ids = Vec::new();
    for pair in &record.prereqs {
        let Some(other) = non_empty(pair.tech.as_ref()) else {
            continue;
        };
        if flag(pair.value.as_ref()) {
            push_unique(&mut prereq_ids, other);
        }
    }

    let unlocks = record
        .effect_player
        .as_deref()
        .and_then(|effect| effects.get(effect))
        .cloned()
        .unwrap_or_default();

    // Three unrelated flags, any one of which marks a bonus card.
    let is_bonus_candidate = flag(record.hide.as_ref())
        || flag(record.trash.as_ref())
        || flag(record.no_free.as_ref());

    let mut nation_restriction = Vec::new();
    for nation in record.nation_valid.iter().filter(|n| !n.is_empty()) {
        push_unique(&mut nation_restriction, nation);
    }

    Some(TechNode {
        id: id.to_string(),
        name,
        description,
        cost,
        row,
        column,
        prereq_ids,
        unlocks,
        is_bonus_candidate,
        bonus_discover_ref: non_empty(record.bonus_discover.as_ref()).map(str::to_string),
        nation_restriction,
    })
}

/// The parsed technologies, in table order, with lookup by id.
#[derive(Debug, Clone, Default)]
pub struct TechGraph {
    nodes: Vec<TechNode>,
    positions: HashMap<String, usize>,
}

impl TechGraph {
    /// Parse every technology record and apply the unlock passes.
    ///
    /// Irregular data is kept and reported: duplicate ids (first one wins),
    /// self-referencing prerequisites, and prerequisites naming unknown techs
    /// are logged as warnings.
    pub fn build(
        records: &[TechRecord],
        text: &TextResolver,
        effects: &EffectUnlocks,
        index: &UnlockIndex,
    ) -> Self {
        let mut graph = Self::default();

        for record in records {
            let Some(mut node) = parse_tech(record, text, effects) else {
                debug!("skipping technology entry without an id");
                continue;
            };
            if graph.positions.contains_key(&node.id) {
                warn!(tech = %node.id, "duplicate technology id, keeping the first");
                continue;
            }
            index.apply(&node.id, &mut node.unlocks);
            graph.positions.insert(node.id.clone(), graph.nodes.len());
            graph.nodes.push(node);
        }

        graph.report_irregular_prereqs();
        graph
    }

    /// Assemble a graph from already-parsed nodes. Later duplicates are dropped.
    pub fn from_nodes(nodes: impl IntoIterator<Item = TechNode>) -> Self {
        let mut graph = Self::default();
        for node in nodes {
            if graph.positions.contains_key(&node.id) {
                continue;
            }
            graph.positions.insert(node.id.clone(), graph.nodes.len());
            graph.nodes.push(node);
        }
        graph
    }

    fn report_irregular_prereqs(&self) {
        for node in &self.nodes {
            for prereq in &node.prereq_ids {
                if *prereq == node.id {
                    warn!(tech = %node.id, "technology lists itself as a prerequisite");
                } else if !self.positions.contains_key(prereq) {
                    warn!(tech = %node.id, prereq = %prereq, "prerequisite names an unknown technology");
                }
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&TechNode> {
        self.positions.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    pub fn nodes(&self) -> &[TechNode] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<TechNode> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Unlocks of `id`, if the tech exists.
    pub fn unlocks(&self, id: &str) -> Option<&Unlocks> {
        self.get(id).map(|node| &node.unlocks)
    }

    /// Find one prerequisite cycle, if the graph has any.
    ///
    /// The returned path starts and ends with the same id, following
    /// prerequisite edges. Edges to unknown techs are ignored.
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq, Eq)]
        enum Mark {
            New,
            Active,
            Done,
        }

        let mut marks = vec![Mark::New; self.nodes.len()];

        for start in 0..self.nodes.len() {
            if marks[start] != Mark::New {
                continue;
            }
            marks[start] = Mark::Active;
            // (node, index of the next prerequisite to visit)
            let mut frames: Vec<(usize, usize)> = vec![(start, 0)];

            while let Some(frame) = frames.last_mut() {
                let (node, edge) = *frame;
                let prereqs = &self.nodes[node].prereq_ids;
                if edge >= prereqs.len() {
                    marks[node] = Mark::Done;
                    frames.pop();
                    continue;
                }
                frame.1 += 1;

                let Some(&next) = self.positions.get(&prereqs[edge]) else {
                    continue;
                };
                match marks[next] {
                    Mark::New => {
                        marks[next] = Mark::Active;
                        frames.push((next, 0));
                    }
                    Mark::Active => {
                        let from = frames.iter().position(|&(n, _)| n == next).unwrap_or(0);
                        let mut cycle: Vec<String> = frames[from..]
                            .iter()
                            .map(|&(n, _)| self.nodes[n].id.clone())
                            .collect();
                        cycle.push(self.nodes[next].id.clone());
                        return Some(cycle);
                    }
                    Mark::Done => {}
                }
            }
        }

        None
    }
}
