/*!
 * Volume Types
 * Mounted volume records, capability flags and mount notifications
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use thiserror::Error;

use crate::core::limits::VOLUME_SCHEME;

/// Volume operation result
pub type VolumeResult<T> = Result<T, VolumeError>;

/// Volume source errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VolumeError {
    #[error("Volume enumeration failed: {0}")]
    EnumerationFailed(String),

    #[error("Volume source unavailable: {0}")]
    Unavailable(String),
}

/// Capability flags advertised for a volume root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolumeFlags(u32);

impl VolumeFlags {
    pub const SUPPORTS_THUMBNAIL: Self = Self(0x1);
    pub const SUPPORTS_WRITE: Self = Self(0x2);
    pub const SUPPORTS_READ: Self = Self(0x4);
    pub const SUPPORTS_DELETE: Self = Self(0x8);
    pub const SUPPORTS_RENAME: Self = Self(0x10);
    pub const SUPPORTS_MOVE: Self = Self(0x20);
    pub const SUPPORTS_COPY: Self = Self(0x40);
    pub const SUPPORTS_REMOVE: Self = Self(0x80);
    pub const DIR_SUPPORTS_CREATE: Self = Self(0x100);
    pub const DIR_PREFERS_GRID: Self = Self(0x200);
    pub const DIR_PREFERS_LAST_MODIFIED: Self = Self(0x400);

    /// Flags granted to every enumerated or mounted removable volume
    pub const REMOVABLE: Self = Self(
        Self::SUPPORTS_WRITE.0
            | Self::SUPPORTS_DELETE.0
            | Self::SUPPORTS_RENAME.0
            | Self::SUPPORTS_COPY.0
            | Self::SUPPORTS_MOVE.0
            | Self::SUPPORTS_REMOVE.0
            | Self::DIR_SUPPORTS_CREATE.0
            | Self::DIR_PREFERS_LAST_MODIFIED.0,
    );

    #[inline]
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for VolumeFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for VolumeFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Kind of removable media
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeType {
    #[default]
    Sd,
    Usb,
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VolumeType::Sd => write!(f, "SD"),
            VolumeType::Usb => write!(f, "USB"),
        }
    }
}

/// Raw volume as reported by a [`super::VolumeSource`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeDescriptor {
    pub id: String,
    pub uuid: String,
    /// Mount path inside the provider's filesystem
    pub path: String,
}

impl VolumeDescriptor {
    pub fn new(id: impl Into<String>, uuid: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            uuid: uuid.into(),
            path: path.into(),
        }
    }
}

/// One mounted removable volume, owned by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VolumeInfo {
    pub volume_id: String,
    pub fs_uuid: String,
    pub path: String,
    pub uri: String,
    pub display_name: String,
    pub device_id: String,
    pub flags: VolumeFlags,
    pub volume_type: VolumeType,
}

impl VolumeInfo {
    /// Registry record for a freshly reported volume
    pub fn from_descriptor(descriptor: VolumeDescriptor) -> Self {
        Self {
            uri: volume_uri("", &descriptor.path),
            display_name: descriptor.id.clone(),
            volume_id: descriptor.id,
            fs_uuid: descriptor.uuid,
            path: descriptor.path,
            device_id: String::new(),
            flags: VolumeFlags::REMOVABLE,
            volume_type: VolumeType::Sd,
        }
    }
}

/// Root URI of a volume: `fileAccess://{id}{path}`
pub fn volume_uri(id: &str, path: &str) -> String {
    format!("{}://{}{}", VOLUME_SCHEME, id, path)
}

/// Mount state notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum VolumeEvent {
    Mounted(VolumeDescriptor),
    Unmounted { id: String },
    /// Any other state change (ejecting, bad removal, ...); treated as removal
    Other { kind: String, id: String },
}

impl VolumeEvent {
    pub fn volume_id(&self) -> &str {
        match self {
            VolumeEvent::Mounted(descriptor) => &descriptor.id,
            VolumeEvent::Unmounted { id } | VolumeEvent::Other { id, .. } => id,
        }
    }
}
