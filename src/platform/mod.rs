//! Platform-specific helpers.
//! Hides OS differences (device ids, symlink creation, log file modes) behind a
//! uniform API so the reconciler stays platform-agnostic.

#[cfg(unix)]
mod unix;
#[cfg(not(unix))]
mod windows;

#[cfg(unix)]
pub use unix::{create_symlink, open_log_file_secure_append, remove_symlink, same_device_existing};

#[cfg(not(unix))]
pub use windows::{create_symlink, open_log_file_secure_append, remove_symlink, same_device_existing};
