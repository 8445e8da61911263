//! Core configuration types.
//! - Config holds runtime settings resolved from the command line.
//! - LogLevel represents verbosity with simple parsing helpers.
//! - Direction tags a declaration as "link it" or "restore it".

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Program-defined verbosity levels exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// Per-task details
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Which pass a declaration belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Relocate into the storage and leave a symlink behind.
    Add,
    /// Undo a previous `Add`: drop the symlink and move the content home.
    Remove,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Add => "add",
            Direction::Remove => "remove",
        })
    }
}

/// Runtime settings for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// The INI file with `[dirs]` and per-storage sections
    pub config_path: PathBuf,
    /// Home directory all declarations are relative to
    pub home: PathBuf,
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Answer "yes" to every cross-device prompt
    pub assume_yes: bool,
    /// Emit structured JSON logs
    pub json: bool,
}

impl Config {
    /// Construct a Config with explicit paths; other fields use defaults.
    pub fn new(config_path: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            home: home.into(),
            log_level: LogLevel::Normal,
            log_file: None,
            assume_yes: false,
            json: false,
        }
    }
}
