//! Nation starting conditions.

use techtree_data::TextResolver;
use techtree_data::schema::{NationRecord, non_empty};
use tracing::debug;

use crate::{NationProfile, names, push_unique};

pub const NATION_PREFIX: &str = "NATION_";

/// Build a profile for every nation that starts with at least one tech.
/// Nations without starting techs are left out.
pub fn build_nation_profiles(records: &[NationRecord], text: &TextResolver) -> Vec<NationProfile> {
    let mut profiles: Vec<NationProfile> = Vec::new();

    for record in records {
        let Some(id) = non_empty(record.id.as_ref()) else {
            continue;
        };
        if profiles.iter().any(|p| p.id == id) {
            debug!(nation = %id, "duplicate nation id, keeping the first");
            continue;
        }

        let mut starting_tech_ids = Vec::new();
        for tech in record.starting_techs.iter().filter(|t| !t.is_empty()) {
            push_unique(&mut starting_tech_ids, tech);
        }
        if starting_tech_ids.is_empty() {
            debug!(nation = %id, "nation has no starting techs, skipped");
            continue;
        }

        let name = text.resolve(record.name_tag.as_deref(), || {
            names::display_name(id, NATION_PREFIX)
        });
        profiles.push(NationProfile {
            id: id.to_string(),
            name,
            starting_tech_ids,
        });
    }

    profiles
}

#[cfg(test)]
mod tests {
    use super::*;
    use techtree_data::schema::TextRecord;

    fn nation(id: &str, name_tag: Option<&str>, techs: &[&str]) -> NationRecord {
        NationRecord {
            id: Some(id.to_string()),
            name_tag: name_tag.map(str::to_string),
            starting_techs: techs.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn only_nations_with_starting_techs() {
        let text = TextResolver::from_tables([[TextRecord {
            tag: Some("TEXT_NATION_ROME".to_string()),
            text: Some("Rome".to_string()),
        }]
        .as_slice()]);
        let records = vec![
            nation("NATION_ROME", Some("TEXT_NATION_ROME"), &["TECH_ARISTOCRACY", "TECH_RHETORIC"]),
            nation("NATION_BARBARIAN", None, &[]),
            nation("NATION_SEA_PEOPLES", Some("TEXT_MISSING"), &["TECH_SAILING", ""]),
        ];

        let profiles = build_nation_profiles(&records, &text);
        assert_eq!(profiles.len(), 2);
        assert_eq!(profiles[0].name, "Rome");
        assert_eq!(
            profiles[0].starting_tech_ids,
            vec!["TECH_ARISTOCRACY".to_string(), "TECH_RHETORIC".to_string()]
        );
        assert_eq!(profiles[1].name, "Sea Peoples");
        assert_eq!(profiles[1].starting_tech_ids, vec!["TECH_SAILING".to_string()]);
    }

    #[test]
    fn first_declaration_wins() {
        let records = vec![
            nation("NATION_EGYPT", None, &["TECH_A"]),
            nation("NATION_EGYPT", None, &["TECH_B"]),
        ];
        let profiles = build_nation_profiles(&records, &TextResolver::default());
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].starting_tech_ids, vec!["TECH_A".to_string()]);
    }
}
