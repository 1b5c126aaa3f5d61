use std::path::PathBuf;
use thiserror::Error;

/// Errors that can happen while loading, analysing or querying a sound.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("i/o error on '{path}': {reason}")]
    Io { path: PathBuf, reason: String },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("analysis cancelled")]
    Cancelled,
    #[error("an analysis is already running")]
    Busy,
    #[error("out of range: {0}")]
    OutOfRange(String),
    #[error("transform engine failed: {0}")]
    Engine(String),
}

impl From<cwt::TransformError> for AnalysisError {
    fn from(value: cwt::TransformError) -> Self {
        AnalysisError::Engine(value.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
