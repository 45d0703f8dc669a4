use std::path::PathBuf;

/// Errors that end a generator run.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// The input directory does not exist.
    #[error("input directory {dir} does not exist")]
    MissingInputDir { dir: PathBuf },

    /// The tables could not be loaded.
    #[error("data load error in {dir}: {source}")]
    DataLoad {
        dir: PathBuf,
        source: techtree_data::DataLoadError,
    },

    /// The HTML template could not be read.
    #[error("template {path} not found")]
    MissingTemplate { path: PathBuf },

    /// An output file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Serialization error.
    #[error("serialization error: {detail}")]
    Serialization { detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization {
            detail: e.to_string(),
        }
    }
}
