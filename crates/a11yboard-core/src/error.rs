//! Error types for a11yboard-core.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("Failed with HTTP code {status} for {url}")]
    Http { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filter '{0}'")]
    InvalidFilter(String),

    #[error("No run id in query string (expected a run_list filter)")]
    MissingRunId,

    #[error("Request cancelled")]
    Cancelled,

    #[error("{0}")]
    Other(String),
}

impl ViewError {
    /// Whether this error was produced by tearing the view down.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ViewError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, ViewError>;
