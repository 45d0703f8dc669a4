//! Output surfaces: the JSON export and the HTML page.

use std::fs;
use std::path::Path;

use techtree_graph::TechTreeModel;

use crate::error::CliError;

pub const TECH_DATA_PLACEHOLDER: &str = "{{TECH_DATA}}";
pub const NATION_DATA_PLACEHOLDER: &str = "{{NATION_DATA}}";

/// Pretty-printed JSON of the whole model.
pub fn export_json(model: &TechTreeModel) -> Result<String, CliError> {
    Ok(model.to_json_pretty()?)
}

/// Fill the template's data placeholders with script declarations. All other
/// template text is left as is.
pub fn render_html(model: &TechTreeModel, template: &str) -> Result<String, CliError> {
    let tech_data = format!(
        "const techData = {{\n    techs: {},\n    bonusTechs: {}\n}};",
        serde_json::to_string_pretty(&model.techs)?,
        serde_json::to_string_pretty(&model.bonus_techs)?,
    );
    let nation_data = format!(
        "const nationData = {};",
        serde_json::to_string_pretty(&model.nation_data)?
    );

    Ok(template
        .replace(TECH_DATA_PLACEHOLDER, &tech_data)
        .replace(NATION_DATA_PLACEHOLDER, &nation_data))
}

pub fn read_template(path: &Path) -> Result<String, CliError> {
    if !path.is_file() {
        return Err(CliError::MissingTemplate {
            path: path.to_path_buf(),
        });
    }
    Ok(fs::read_to_string(path)?)
}

pub fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use techtree_graph::{BonusTech, MainTech, UnlockLists};

    fn model() -> TechTreeModel {
        let mut model = TechTreeModel::default();
        model.techs.push(MainTech {
            id: "TECH_IRONWORKING".to_string(),
            name: "Ironworking".to_string(),
            cost: 120,
            column: 1,
            row: 3,
            prereqs: vec![],
            unlocks: UnlockLists {
                units: vec!["Warrior".to_string()],
                ..UnlockLists::default()
            },
        });
        model.bonus_techs.push(BonusTech {
            id: "TECH_BONUS_WORKER".to_string(),
            name: "Free Worker".to_string(),
            cost: 40,
            parent: None,
            bonus: "+1 Worker".to_string(),
            nation: None,
        });
        model
            .nation_data
            .starting_techs
            .insert("NATION_ROME".to_string(), vec!["TECH_IRONWORKING".to_string()]);
        model
    }

    fn make_test_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "techtree_cli_test_{}_{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn cleanup(dir: &Path) {
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn html_placeholders_are_replaced() {
        let template = "<script>\n{{TECH_DATA}}\n{{NATION_DATA}}\n</script><p>{{OTHER}}</p>";
        let html = render_html(&model(), template).unwrap();

        assert!(!html.contains(TECH_DATA_PLACEHOLDER));
        assert!(!html.contains(NATION_DATA_PLACEHOLDER));
        assert!(html.contains("const techData = {"));
        assert!(html.contains("bonusTechs: ["));
        assert!(html.contains("\"TECH_BONUS_WORKER\""));
        assert!(html.contains("const nationData = {"));
        assert!(html.contains("\"startingTechs\""));
        assert!(html.ends_with("</script><p>{{OTHER}}</p>"));
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        let template = "<html><body>static</body></html>";
        assert_eq!(render_html(&model(), template).unwrap(), template);
    }

    #[test]
    fn json_export_parses_back() {
        let json = export_json(&model()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["techs"][0]["unlocks"]["units"][0], "Warrior");
        assert_eq!(value["bonusTechs"][0]["parent"], "");
        assert_eq!(value["nationData"]["nationSpecificBonuses"], serde_json::json!({}));
    }

    #[test]
    fn missing_template_is_an_error() {
        let dir = make_test_dir("missing_template");
        let err = read_template(&dir.join("template.html")).unwrap_err();
        assert!(matches!(err, CliError::MissingTemplate { .. }));
        cleanup(&dir);
    }

    #[test]
    fn template_round_trip_through_disk() {
        let dir = make_test_dir("template_disk");
        let template_path = dir.join("template.html");
        fs::write(&template_path, "<div>{{TECH_DATA}}</div>").unwrap();

        let template = read_template(&template_path).unwrap();
        let html = render_html(&model(), &template).unwrap();
        let out = dir.join("index.html");
        write_output(&out, &html).unwrap();

        let written = fs::read_to_string(&out).unwrap();
        assert!(written.starts_with("<div>const techData"));
        cleanup(&dir);
    }
}
