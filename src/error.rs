// ⚠️ Error taxonomy
// Row-level errors are recoverable (the row is skipped), pipeline errors end the run

use std::path::PathBuf;
use thiserror::Error;

/// Why a single source row was left out of the output.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("missing coordinates")]
    MissingCoordinates,

    #[error("invalid coordinate data in {field}: '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },

    #[error("missing record id")]
    MissingRecordId,

    #[error("invalid date in {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    #[error("unreadable record: {0}")]
    Unreadable(String),
}

/// Failures that abort a whole run.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("The file '{}' was not found.", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("The file '{}' is not a valid JSON file: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("The file '{}' does not contain a 'features' array within a JSON object.", path.display())]
    MissingFeatures { path: PathBuf },

    #[error("Failed to read config file '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl PipelineError {
    /// Map an I/O failure on `path`, keeping not-found distinct.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            PipelineError::SourceNotFound { path }
        } else {
            PipelineError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
