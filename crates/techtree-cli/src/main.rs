//! Generate the tech tree page from a directory of game tables.
//!
//! ```text
//! tables dir --> techtree-data (load) --> techtree-graph (resolve) --> JSON / HTML
//! ```

mod error;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

/// Generate the tech tree HTML from the game's record tables.
#[derive(Debug, Parser)]
#[command(name = "techtree", version)]
struct Args {
    /// Directory holding the record tables.
    #[arg(long = "xml-dir", default_value = "XML/Infos")]
    xml_dir: PathBuf,

    /// Output HTML file.
    #[arg(long, default_value = "index.html")]
    output: PathBuf,

    /// HTML template with `{{TECH_DATA}}` and `{{NATION_DATA}}` placeholders.
    #[arg(long, default_value = "template.html")]
    template: PathBuf,

    /// Also write the resolved model as JSON.
    #[arg(long = "export-json")]
    export_json: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), CliError> {
    if !args.xml_dir.is_dir() {
        return Err(CliError::MissingInputDir {
            dir: args.xml_dir.clone(),
        });
    }

    let model = techtree_graph::build_model_from_dir(&args.xml_dir).map_err(|source| CliError::DataLoad {
        dir: args.xml_dir.clone(),
        source,
    })?;

    if let Some(path) = &args.export_json {
        render::write_output(path, &render::export_json(&model)?)?;
        info!(path = %path.display(), "exported model");
    }

    let template = render::read_template(&args.template)?;
    let html = render::render_html(&model, &template)?;
    render::write_output(&args.output, &html)?;
    info!(path = %args.output.display(), "generated tech tree");

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "tech tree generation failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_arguments() {
        let args = Args::try_parse_from(["techtree"]).unwrap();
        assert_eq!(args.xml_dir, PathBuf::from("XML/Infos"));
        assert_eq!(args.output, PathBuf::from("index.html"));
        assert_eq!(args.template, PathBuf::from("template.html"));
        assert!(args.export_json.is_none());
    }

    #[test]
    fn explicit_arguments() {
        let args = Args::try_parse_from([
            "techtree",
            "--xml-dir",
            "data/tables",
            "--output",
            "out.html",
            "--export-json",
            "model.json",
        ])
        .unwrap();
        assert_eq!(args.xml_dir, PathBuf::from("data/tables"));
        assert_eq!(args.output, PathBuf::from("out.html"));
        assert_eq!(args.export_json, Some(PathBuf::from("model.json")));
    }

    #[test]
    fn missing_input_dir_is_fatal() {
        let args = Args::try_parse_from([
            "techtree",
            "--xml-dir",
            "/nonexistent/techtree/tables",
        ])
        .unwrap();
        assert!(matches!(run(&args), Err(CliError::MissingInputDir { .. })));
    }
}
