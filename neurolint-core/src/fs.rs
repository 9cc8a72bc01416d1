//! Filesystem access for reading sources and writing fixed code back.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Suffix appended to a source path for its backup copy.
pub const BACKUP_SUFFIX: &str = "bak";

/// Abstraction over filesystem access for testability.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
    /// Read a file into a string.
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Replace a file's contents.
    fn write(&self, path: &Path, contents: &str) -> Result<()>;
    /// Copy a file, overwriting the destination.
    fn copy(&self, from: &Path, to: &Path) -> Result<()>;
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone)]
pub struct StdFileSystem;

impl StdFileSystem {
    /// Create a new standard filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for StdFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        Ok(std::fs::write(path, contents)?)
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::copy(from, to)?;
        Ok(())
    }
}

/// `<path>.bak`, keeping the original extension.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Write fixed code over `path`, copying the original aside first when `backup` is set.
///
/// Returns the backup path when one was written.
pub fn write_fixed_source<F: FileSystem + ?Sized>(
    fs: &F,
    path: &Path,
    code: &str,
    backup: bool,
) -> Result<Option<PathBuf>> {
    let backup = if backup {
        let target = backup_path(path);
        fs.copy(path, &target)?;
        log::info!("backed up {} to {}", path.display(), target.display());
        Some(target)
    } else {
        None
    };
    fs.write(path, code)?;
    Ok(backup)
}
