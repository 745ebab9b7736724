/*!
 * VFS Metadata
 * Stat record returned by filesystem backends
 */

use super::file_type::FileType;
use crate::core::serde::{is_zero_u64, system_time_micros};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// File metadata
///
/// Timestamps are serialized as microseconds since UNIX epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
pub struct Metadata {
    pub file_type: FileType,
    #[serde(skip_serializing_if = "is_zero_u64", default)]
    pub size: u64,
    /// Unix mode bits including the file type bits when the backend has them
    pub mode: u32,
    #[serde(default)]
    pub ino: u64,
    #[serde(default)]
    pub uid: u32,
    #[serde(default)]
    pub gid: u32,
    #[serde(with = "system_time_micros")]
    pub modified: SystemTime,
    #[serde(with = "system_time_micros")]
    pub accessed: SystemTime,
    #[serde(with = "system_time_micros")]
    pub changed: SystemTime,
}

impl Metadata {
    /// Minimal record for backends without inode/owner information
    pub fn new(file_type: FileType, size: u64, mode: u32, modified: SystemTime) -> Self {
        Self {
            file_type,
            size,
            mode,
            ino: 0,
            uid: 0,
            gid: 0,
            modified,
            accessed: modified,
            changed: modified,
        }
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_dir(&self) -> bool {
        matches!(self.file_type, FileType::Directory)
    }

    #[inline(always)]
    #[must_use]
    pub const fn is_file(&self) -> bool {
        matches!(self.file_type, FileType::File)
    }

    /// Modification time in whole seconds since the epoch
    #[must_use]
    pub fn mtime_secs(&self) -> u64 {
        secs_since_epoch(self.modified)
    }

    #[must_use]
    pub fn atime_secs(&self) -> u64 {
        secs_since_epoch(self.accessed)
    }

    #[must_use]
    pub fn ctime_secs(&self) -> u64 {
        secs_since_epoch(self.changed)
    }
}

fn secs_since_epoch(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
