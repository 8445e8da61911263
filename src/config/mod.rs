//! Config module.
//! Runtime settings, the INI reader and the validated storage manifest.

pub mod ini;
pub mod manifest;
pub mod paths;
pub mod types;

pub use manifest::{Declaration, Manifest, Rejected, Storage, DIRS_SECTION};
pub use paths::{path_has_symlink_ancestor, resolve_home};
pub use types::{Config, Direction, LogLevel};
