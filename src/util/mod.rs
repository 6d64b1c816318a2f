//! Filesystem helpers shared by the configurators

use crate::error::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Suffix of the copy kept next to every rewritten descriptor
pub const BACKUP_SUFFIX: &str = ".jacoco.orig";

pub fn exists(path: &Path) -> bool {
    path.exists()
}

pub fn is_directory(path: &Path) -> bool {
    path.is_dir()
}

/// `<path>.jacoco.orig`
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Copy `path` to its backup location, returning the backup path
///
/// An existing backup is overwritten.
pub fn backup(path: &Path) -> Result<PathBuf> {
    let target = backup_path(path);
    std::fs::copy(path, &target).map_err(|source| Error::WriteFailure {
        path: target.clone(),
        source,
    })?;
    debug!("backed up '{}' to '{}'", path.display(), target.display());
    Ok(target)
}
