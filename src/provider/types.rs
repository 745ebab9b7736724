/*!
 * Provider Types
 * Result envelopes and records returned across the operation boundary
 */

use serde::{Deserialize, Serialize};
use tracing::error;

use super::errors::ProviderResult;
use crate::core::limits::status::ERR_OK;
use crate::core::serde::is_default;
use crate::vfs::Metadata;
use crate::volume::{VolumeInfo, VolumeType};

/// Status code returned with every response
pub type StatusCode = i32;

/// `(value, code)` pair returned by every operation
///
/// On failure `value` holds the empty payload for the operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response<T> {
    pub value: T,
    pub code: StatusCode,
}

impl<T> Response<T> {
    #[inline]
    #[must_use]
    pub fn ok(value: T) -> Self {
        Self {
            value,
            code: ERR_OK,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == ERR_OK
    }

    pub fn into_parts(self) -> (T, StatusCode) {
        (self.value, self.code)
    }

    /// Convert an inner result at the operation boundary
    ///
    /// Errors are logged and replaced by `empty` plus their code.
    pub fn from_result_or(operation: &str, result: ProviderResult<T>, empty: T) -> Self {
        match result {
            Ok(value) => Self::ok(value),
            Err(e) => {
                error!(operation, error = %e, code = e.code(), "Operation failed");
                Self {
                    value: empty,
                    code: e.code(),
                }
            }
        }
    }
}

impl<T: Default> Response<T> {
    #[inline]
    #[must_use]
    pub fn failed(code: StatusCode) -> Self {
        Self {
            value: T::default(),
            code,
        }
    }

    /// [`Response::from_result_or`] with the default value as empty payload
    pub fn from_result(operation: &str, result: ProviderResult<T>) -> Self {
        Self::from_result_or(operation, result, T::default())
    }
}

/// Capability bits reported in [`FileInfo::mode`]
pub mod document_flag {
    pub const REPRESENTS_FILE: u32 = 0x1;
    pub const REPRESENTS_DIR: u32 = 0x2;
    pub const SUPPORTS_READ: u32 = 0x4;
    pub const SUPPORTS_WRITE: u32 = 0x8;
}

/// Capability bits reported in [`RootInfo::device_flags`] for the primary root
pub mod device_flag {
    pub const SUPPORTS_READ: u32 = 0x1;
    pub const SUPPORTS_WRITE: u32 = 0x2;
}

/// One listed entry
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FileInfo {
    pub uri: String,
    pub file_name: String,
    pub mode: u32,
    pub size: u64,
    /// Seconds since the epoch
    pub mtime: u64,
    /// Always empty; MIME detection is left to callers
    pub mime_type: String,
}

impl FileInfo {
    pub fn from_metadata(uri: String, file_name: impl Into<String>, metadata: &Metadata) -> Self {
        let mut mode = document_flag::SUPPORTS_READ | document_flag::SUPPORTS_WRITE;
        mode |= if metadata.is_dir() {
            document_flag::REPRESENTS_DIR
        } else {
            document_flag::REPRESENTS_FILE
        };

        Self {
            uri,
            file_name: file_name.into(),
            mode,
            size: metadata.size,
            mtime: metadata.mtime_secs(),
            mime_type: String::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.mode & document_flag::REPRESENTS_DIR != 0
    }
}

/// Kind of device backing a root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceType {
    DeviceSharedDisk,
    DeviceSd,
    DeviceExternalUsb,
}

impl From<VolumeType> for DeviceType {
    fn from(kind: VolumeType) -> Self {
        match kind {
            VolumeType::Sd => DeviceType::DeviceSd,
            VolumeType::Usb => DeviceType::DeviceExternalUsb,
        }
    }
}

/// Top-level addressable origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RootInfo {
    pub uri: String,
    pub display_name: String,
    pub device_type: DeviceType,
    pub device_flags: u32,
}

impl From<&VolumeInfo> for RootInfo {
    fn from(volume: &VolumeInfo) -> Self {
        Self {
            uri: volume.uri.clone(),
            display_name: volume.display_name.clone(),
            device_type: volume.volume_type.into(),
            device_flags: volume.flags.bits(),
        }
    }
}

/// Optional narrowing of `list_file` results
///
/// An entry passes when it satisfies every non-empty criterion. Directories
/// are exempt from the suffix and size criteria so they stay navigable.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct FileFilter {
    /// Accepted name suffixes, including the dot (`".txt"`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suffixes: Vec<String>,
    /// Accepted exact names
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub display_names: Vec<String>,
    /// Minimum file size in bytes
    #[serde(skip_serializing_if = "is_default")]
    pub min_size: u64,
    /// Hide entries whose name starts with `.`
    #[serde(skip_serializing_if = "is_default")]
    pub exclude_hidden: bool,
}

impl FileFilter {
    /// A filter with no criteria matches everything and is skipped
    pub fn has_criteria(&self) -> bool {
        !self.suffixes.is_empty()
            || !self.display_names.is_empty()
            || self.min_size > 0
            || self.exclude_hidden
    }

    pub fn matches(&self, info: &FileInfo) -> bool {
        let name = info.file_name.as_str();

        if self.exclude_hidden && name.starts_with('.') {
            return false;
        }
        if !self.display_names.is_empty() && !self.display_names.iter().any(|n| n == name) {
            return false;
        }
        if info.is_dir() {
            return true;
        }
        if !self.suffixes.is_empty() && !self.suffixes.iter().any(|s| name.ends_with(s.as_str())) {
            return false;
        }
        info.size >= self.min_size
    }
}
