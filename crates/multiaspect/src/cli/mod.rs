//! Subcommand implementations.

pub mod config;
pub mod index;
pub mod prepare;

use std::path::{Path, PathBuf};

/// Expand a leading `~` in a user-supplied path.
pub(crate) fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}
