use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Nothing to compress: no source files selected")]
    EmptyJob,

    #[error("No compression rule at index {index} (available: {available})")]
    RuleNotFound { index: usize, available: usize },

    #[error("Compression tool not found: {path}")]
    ToolNotFound { path: PathBuf },

    #[error("Failed to launch {program}: {reason}")]
    SpawnFailed { program: PathBuf, reason: String },

    #[error("Failed to signal process {pid}: {reason}")]
    SignalFailed { pid: u32, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ArchiverError>;
