/*!
 * VFS Traits
 * Filesystem capability consumed by the provider
 */

use std::io::{Read, Seek, Write};
use std::path::Path;

use tracing::debug;

use super::types::*;

/// Filesystem capability
///
/// Paths are absolute within the backend (`/a/b`). Every failure carries a
/// [`VfsError`] whose [`VfsError::code`] is surfaced to provider callers.
pub trait FileSystem: Send + Sync {
    /// Read entire file contents
    fn read(&self, path: &Path) -> VfsResult<Vec<u8>>;

    /// Write entire file contents (create or overwrite)
    fn write(&self, path: &Path, data: &[u8]) -> VfsResult<()>;

    /// Create empty file, truncating an existing one
    fn create(&self, path: &Path) -> VfsResult<()>;

    /// Unlink a file
    fn delete(&self, path: &Path) -> VfsResult<()>;

    /// Existence check; absence is `Ok(false)`, only faults are errors
    fn exists(&self, path: &Path) -> VfsResult<bool>;

    /// Stat
    fn metadata(&self, path: &Path) -> VfsResult<Metadata>;

    /// List directory contents in backend order
    fn list_dir(&self, path: &Path) -> VfsResult<Vec<Entry>>;

    /// Create a single directory; the parent must exist
    fn create_dir(&self, path: &Path) -> VfsResult<()>;

    /// Remove directory (must be empty)
    fn remove_dir(&self, path: &Path) -> VfsResult<()>;

    /// Remove directory recursively
    fn remove_dir_all(&self, path: &Path) -> VfsResult<()> {
        for entry in self.list_dir(path)? {
            let child = path.join(&entry.name);
            if entry.is_dir() {
                self.remove_dir_all(&child)?;
            } else {
                self.delete(&child)?;
            }
        }
        self.remove_dir(path)
    }

    /// Copy a single file
    fn copy(&self, from: &Path, to: &Path) -> VfsResult<()> {
        let data = self.read(from)?;
        self.write(to, &data)
    }

    /// Atomic rename within the backend
    fn rename(&self, from: &Path, to: &Path) -> VfsResult<()>;

    /// Move a file or directory tree to `to` (the full destination path)
    ///
    /// The default is a recursive copy-then-delete; backends with a cheaper
    /// native move override it.
    fn move_dir(&self, from: &Path, to: &Path, mode: MoveMode) -> VfsResult<()> {
        move_recursive(self, from, to, mode)
    }

    /// Open file with specified flags
    fn open(&self, path: &Path, flags: OpenFlags) -> VfsResult<Box<dyn OpenFile>>;

    /// Get filesystem name/type
    fn name(&self) -> &str;
}

/// Open file handle
///
/// Closed when dropped.
pub trait OpenFile: Read + Write + Seek + Send + Sync {
    /// Sync file data to storage
    fn sync(&mut self) -> VfsResult<()>;

    /// Get file metadata
    fn metadata(&self) -> VfsResult<Metadata>;
}

/// Directory-aware copy-then-delete move
///
/// Files are copied and unlinked one at a time; directories are recreated at
/// the destination, filled recursively and removed once empty. A failure
/// leaves whatever was already moved at the destination.
pub fn move_recursive<F>(fs: &F, from: &Path, to: &Path, mode: MoveMode) -> VfsResult<()>
where
    F: FileSystem + ?Sized,
{
    let source = fs.metadata(from)?;

    if !source.is_dir() {
        if fs.exists(to)? {
            if mode == MoveMode::NoOverwrite {
                return Err(VfsError::AlreadyExists(to.display().to_string()));
            }
            if fs.metadata(to)?.is_dir() {
                return Err(VfsError::IsADirectory(to.display().to_string()));
            }
        }
        fs.copy(from, to)?;
        return fs.delete(from);
    }

    if fs.exists(to)? {
        if !fs.metadata(to)?.is_dir() {
            return Err(VfsError::NotADirectory(to.display().to_string()));
        }
        match mode {
            MoveMode::NoOverwrite => {
                return Err(VfsError::AlreadyExists(to.display().to_string()))
            }
            MoveMode::ReplaceDirectory => {
                fs.remove_dir_all(to)?;
                fs.create_dir(to)?;
            }
            MoveMode::OverwriteFiles => {}
        }
    } else {
        fs.create_dir(to)?;
    }

    for entry in fs.list_dir(from)? {
        move_recursive(fs, &from.join(&entry.name), &to.join(&entry.name), mode)?;
    }

    debug!(from = %from.display(), to = %to.display(), "Directory moved by copy");
    fs.remove_dir(from)
}
