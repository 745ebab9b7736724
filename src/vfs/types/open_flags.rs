/*!
 * VFS Open Flags and Move Mode
 * Flags for opening files and conflict policy for directory moves
 */

use super::errors::VfsError;
use crate::core::serde::is_false;
use serde::{Deserialize, Serialize};

/// POSIX access-mode and creation bits accepted by `open_file`
pub mod posix {
    pub const O_RDONLY: u32 = 0o0;
    pub const O_WRONLY: u32 = 0o1;
    pub const O_RDWR: u32 = 0o2;
    pub const O_ACCMODE: u32 = 0o3;
    pub const O_CREAT: u32 = 0o100;
    pub const O_EXCL: u32 = 0o200;
    pub const O_TRUNC: u32 = 0o1000;
    pub const O_APPEND: u32 = 0o2000;
}

/// File open flags (only true flags are serialized)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", default, deny_unknown_fields)]
pub struct OpenFlags {
    #[serde(skip_serializing_if = "is_false")]
    pub read: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub write: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub append: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub truncate: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub create: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub create_new: bool,
}

impl OpenFlags {
    #[inline]
    #[must_use]
    pub fn read_only() -> Self {
        Self {
            read: true,
            ..Default::default()
        }
    }

    /// Create flags for creating a file (write + create)
    #[inline]
    #[must_use]
    pub fn create() -> Self {
        Self {
            write: true,
            create: true,
            ..Default::default()
        }
    }

    /// Convert from POSIX open flags
    ///
    /// An access mode of `0o3` is not a valid POSIX mode and is rejected.
    pub fn from_posix(flags: u32) -> Result<Self, VfsError> {
        use posix::*;

        let (read, write) = match flags & O_ACCMODE {
            O_RDONLY => (true, false),
            O_WRONLY => (false, true),
            O_RDWR => (true, true),
            other => {
                return Err(VfsError::InvalidArgument(format!(
                    "invalid access mode: {:#o}",
                    other
                )))
            }
        };

        let create = flags & O_CREAT != 0;
        Ok(Self {
            read,
            write,
            append: flags & O_APPEND != 0,
            truncate: flags & O_TRUNC != 0,
            create: create && flags & O_EXCL == 0,
            create_new: create && flags & O_EXCL != 0,
        })
    }
}

/// Conflict policy applied by `FileSystem::move_dir` when the destination exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MoveMode {
    /// Fail if any destination entry already exists
    #[default]
    NoOverwrite,
    /// Merge directories, overwriting conflicting files
    OverwriteFiles,
    /// Remove an existing destination directory before moving
    ReplaceDirectory,
}
