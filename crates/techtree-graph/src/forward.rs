//! Forward-reference tables: entities that name the tech unlocking them.

use techtree_data::schema::{EntityRecord, non_empty};

use crate::Category;

/// One entity gated behind a technology.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardRef {
    pub own_id: String,
    pub tech_id: String,
    pub display_name: String,
}

/// The tech-gated records of one category, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTable {
    pub category: Category,
    pub entries: Vec<ForwardRef>,
}

impl ForwardTable {
    /// Collect the records that declare both an identifier and a tech
    /// prerequisite. Records without a prerequisite are not tech-gated and
    /// are left out.
    pub fn from_records(category: Category, records: &[EntityRecord]) -> Self {
        let entries = records
            .iter()
            .filter_map(|record| {
                let own_id = non_empty(record.id.as_ref())?;
                let tech_id = non_empty(record.tech_prereq.as_ref())?;
                Some(ForwardRef {
                    own_id: own_id.to_string(),
                    tech_id: tech_id.to_string(),
                    display_name: category.display_name(own_id),
                })
            })
            .collect();

        Self { category, entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
