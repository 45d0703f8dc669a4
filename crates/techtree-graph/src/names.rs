//! Display names derived from raw identifiers.

/// Title-case a string: a letter is uppercased when it follows a non-letter
/// (or starts the string) and lowercased otherwise.
///
/// `"HORSE ARCHER"` becomes `"Horse Archer"`, `"2ND LEGION"` becomes
/// `"2Nd Legion"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut after_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if after_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(c);
            after_letter = false;
        }
    }
    out
}

/// Strip `prefix` (when present), turn underscores into spaces, and
/// title-case the rest.
pub fn display_name(raw_id: &str, prefix: &str) -> String {
    let bare = raw_id.strip_prefix(prefix).unwrap_or(raw_id);
    title_case(&bare.replace('_', " "))
}

/// Display name of a project. Tiered upgrades (`PROJECT_WALLS_2`) collapse
/// onto the base project's name.
pub fn project_display_name(raw_id: &str) -> String {
    let name = display_name(raw_id, "PROJECT_");
    strip_tier_suffix(&name).to_string()
}

/// Remove a trailing whitespace-separated number: `"Walls 2"` → `"Walls"`.
fn strip_tier_suffix(name: &str) -> &str {
    let without_digits = name.trim_end_matches(|c: char| c.is_ascii_digit());
    if without_digits.len() == name.len() {
        return name;
    }
    let stripped = without_digits.trim_end();
    if stripped.len() == without_digits.len() {
        return name;
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("HORSE ARCHER"), "Horse Archer");
        assert_eq!(title_case("war elephant"), "War Elephant");
        assert_eq!(title_case("2ND LEGION"), "2Nd Legion");
        assert_eq!(title_case("DIVINE-RULE"), "Divine-Rule");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn display_name_strips_prefix_only_at_start() {
        assert_eq!(display_name("TECH_STONECUTTING", "TECH_"), "Stonecutting");
        assert_eq!(display_name("TECH_BONUS_WORKER", "TECH_"), "Bonus Worker");
        assert_eq!(display_name("UNIT_WARRIOR", "TECH_"), "Unit Warrior");
    }

    #[test]
    fn project_tiers_collapse() {
        assert_eq!(project_display_name("PROJECT_WALLS"), "Walls");
        assert_eq!(project_display_name("PROJECT_WALLS_2"), "Walls");
        assert_eq!(project_display_name("PROJECT_WALLS_12"), "Walls");
        assert_eq!(project_display_name("PROJECT_TIER2"), "Tier2");
        assert_eq!(project_display_name("PROJECT_2"), "2");
    }
}
