//! Typed error definitions for home_stow.
//! Fatal conditions only: anything here stops the run before (or between) tasks.
//! Per-task problems are reported as outcomes, never as errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StowError {
    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config has no [dirs] section mapping storages to base directories")]
    MissingDirs,

    #[error("Storage '{storage}' has an invalid base directory '{value}': {reason}")]
    InvalidBase {
        storage: String,
        value: String,
        reason: &'static str,
    },

    #[error("Could not determine the home directory; pass --home explicitly")]
    HomeUnavailable,

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl StowError {
    /// Stable machine-readable code, used in structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            StowError::ConfigNotFound(_) => "config_not_found",
            StowError::ConfigRead { .. } => "config_read",
            StowError::ConfigParse { .. } => "config_parse",
            StowError::MissingDirs => "missing_dirs",
            StowError::InvalidBase { .. } => "invalid_base",
            StowError::HomeUnavailable => "home_unavailable",
            StowError::Interrupted => "interrupted",
        }
    }
}
