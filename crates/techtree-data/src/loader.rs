//! Table loading: reads the record tables of one input directory.
//!
//! Provides format detection (RON/JSON/TOML), file discovery, list
//! deserialization, and [`load_table_set`], which reads every table the
//! pipeline knows about. Only the technology table is mandatory; every other
//! table degrades to "absent" with a warning when missing or unreadable.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::schema::{
    BonusRecord, EffectPlayerRecord, EntityRecord, NationRecord, TechRecord, TextRecord,
};

/// Key holding the entry list in TOML tables.
pub const TOML_ENTRIES_KEY: &str = "entries";

/// Base names of the tables, in the order they are read.
pub mod table {
    pub const TECH: &str = "tech";
    pub const NATION: &str = "nation";
    pub const BONUS: &str = "bonus";
    pub const UNIT: &str = "unit";
    pub const IMPROVEMENT: &str = "improvement";
    pub const LAW: &str = "law";
    pub const PROJECT: &str = "project";
    pub const EFFECT_PLAYER: &str = "effectPlayer";
    pub const TEXT_INFOS: &str = "text-infos";
    pub const TEXT_NATION: &str = "text-nation";
    pub const TEXT_BONUS: &str = "text-bonus";
    pub const UNLOCK_OVERRIDES: &str = "unlock_overrides";
}

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// A required data file was not found in the given directory.
    #[error("required table '{table}' not found in {dir}")]
    MissingRequired { table: String, dir: PathBuf },

    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let extensions = ["ron", "toml", "json"];
    let mut found: Option<PathBuf> = None;

    for ext in &extensions {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(ref existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing.clone(),
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

/// Like [`find_data_file`], but returns an error if no file is found.
pub fn require_data_file(dir: &Path, base_name: &str) -> Result<PathBuf, DataLoadError> {
    find_data_file(dir, base_name)?.ok_or_else(|| DataLoadError::MissingRequired {
        table: base_name.to_string(),
        dir: dir.to_path_buf(),
    })
}

// ===========================================================================
// Deserialization
// ===========================================================================

fn parse_error(path: &Path, detail: impl ToString) -> DataLoadError {
    DataLoadError::Parse {
        file: path.to_path_buf(),
        detail: detail.to_string(),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(path, e)),
    }
}

/// Deserialize a list from a file. For TOML files, extracts the array at the
/// given `toml_key` from a top-level table. For RON and JSON, deserializes
/// directly as `Vec<T>`.
pub fn deserialize_list<T: DeserializeOwned>(
    path: &Path,
    toml_key: &str,
) -> Result<Vec<T>, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(path, e)),
        Format::Toml => {
            let table: toml::Value = toml::from_str(&content).map_err(|e| parse_error(path, e))?;
            let array = table
                .get(toml_key)
                .ok_or_else(|| parse_error(path, format!("missing key '{toml_key}' in TOML file")))?
                .clone();
            array
                .try_into()
                .map_err(|e: toml::de::Error| parse_error(path, e))
        }
    }
}

// ===========================================================================
// Table set
// ===========================================================================

/// Every record table of one input directory.
///
/// `None` marks an optional table that was missing or unreadable; that is
/// distinct from a table that was present but empty.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    pub techs: Vec<TechRecord>,
    pub nations: Option<Vec<NationRecord>>,
    pub bonuses: Option<Vec<BonusRecord>>,
    pub units: Option<Vec<EntityRecord>>,
    pub improvements: Option<Vec<EntityRecord>>,
    pub laws: Option<Vec<EntityRecord>>,
    pub projects: Option<Vec<EntityRecord>>,
    pub effect_players: Option<Vec<EffectPlayerRecord>>,
    /// Text tables in layering order: later tables overwrite earlier tags.
    pub texts: Vec<Vec<TextRecord>>,
}

/// Load an optional table. A missing, conflicting, or unparsable table is
/// logged and reported as `None`.
pub fn load_optional_table<T: DeserializeOwned>(dir: &Path, base_name: &str) -> Option<Vec<T>> {
    let path = match find_data_file(dir, base_name) {
        Ok(Some(path)) => path,
        Ok(None) => {
            warn!(table = base_name, dir = %dir.display(), "optional table not found");
            return None;
        }
        Err(e) => {
            warn!(table = base_name, error = %e, "optional table skipped");
            return None;
        }
    };

    match deserialize_list::<T>(&path, TOML_ENTRIES_KEY) {
        Ok(entries) => {
            debug!(table = base_name, count = entries.len(), "table loaded");
            Some(entries)
        }
        Err(e) => {
            warn!(table = base_name, error = %e, "optional table unreadable");
            None
        }
    }
}

/// Load the mandatory technology table.
pub fn load_tech_table(dir: &Path) -> Result<Vec<TechRecord>, DataLoadError> {
    let path = require_data_file(dir, table::TECH)?;
    let techs: Vec<TechRecord> = deserialize_list(&path, TOML_ENTRIES_KEY)?;
    debug!(table = table::TECH, count = techs.len(), "table loaded");
    Ok(techs)
}

/// Load every table from `dir`.
///
/// Fails only when the technology table is missing or unreadable.
pub fn load_table_set(dir: &Path) -> Result<TableSet, DataLoadError> {
    info!(dir = %dir.display(), "loading tables");

    let techs = load_tech_table(dir)?;

    let texts = [table::TEXT_INFOS, table::TEXT_NATION, table::TEXT_BONUS]
        .iter()
        .filter_map(|name| load_optional_table::<TextRecord>(dir, name))
        .collect();

    Ok(TableSet {
        techs,
        nations: load_optional_table(dir, table::NATION),
        bonuses: load_optional_table(dir, table::BONUS),
        units: load_optional_table(dir, table::UNIT),
        improvements: load_optional_table(dir, table::IMPROVEMENT),
        laws: load_optional_table(dir, table::LAW),
        projects: load_optional_table(dir, table::PROJECT),
        effect_players: load_optional_table(dir, table::EFFECT_PLAYER),
        texts,
    })
}

// ===========================================================================
// Tests
// ===========================================================================
