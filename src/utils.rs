//! Miscellaneous helper utilities.
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Search PATH for the first matching executable.
#[must_use]
pub fn get_binary_path(names: &[&str]) -> Option<PathBuf> {
    let path_var = env::var_os("PATH")?;
    find_binary_in(names, &path_var)
}

/// Search a PATH-style directory list for the first matching executable.
///
/// Files without execute permission are skipped, so a stray non-executable
/// file earlier in the list does not shadow the real tool.
#[must_use]
pub fn find_binary_in(names: &[&str], paths: &OsStr) -> Option<PathBuf> {
    let cwd = env::current_dir().unwrap_or_default();
    names
        .iter()
        .find_map(|name| which::which_in(name, Some(paths), &cwd).ok())
}

/// Create a directory and all of its parents.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Ensure a file path's parent directory exists.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => ensure_dir(parent),
        _ => Ok(()),
    }
}

/// Fail with [`Error::InputNotFound`] unless `path` exists.
pub fn require_exists(what: &'static str, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::InputNotFound {
            what,
            path: path.to_path_buf(),
        })
    }
}
