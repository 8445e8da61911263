//! Core library for `home_stow`.
//!
//! Relocates entries from the home directory into backing storages and leaves
//! symlinks in their place, or undoes that. The binary is a thin wrapper: it
//! parses arguments, sets up logging and hands a [`Manifest`] to a
//! [`Reconciler`].

pub mod cli;
pub mod config;
pub mod device;
pub mod errors;
pub mod fs_ops;
pub mod normalize;
pub mod output;
pub mod platform;
pub mod reconcile;
pub mod shutdown;

pub use config::{path_has_symlink_ancestor, resolve_home, Config, Direction, LogLevel, Manifest};
pub use device::{AssumeYes, Confirm, DeviceGuard, TerminalPrompt};
pub use errors::StowError;
pub use normalize::{backing_path, normalize};
pub use reconcile::{Outcome, Reconciler, Reporter, Severity, Summary};
