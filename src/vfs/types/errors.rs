/*!
 * VFS Error Types
 * Structured, type-safe error handling for filesystem operations
 */

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::core::limits::platform;

/// VFS operation result
pub type VfsResult<T> = Result<T, VfsError>;

/// VFS errors with structured, type-safe error handling
///
/// Every variant carries a stable platform error code (see [`VfsError::code`])
/// which the provider layer passes through to callers unchanged.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum VfsError {
    #[error("Not found: {0}")]
    NotFound(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Already exists: {0}")]
    AlreadyExists(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Permission denied: {0}")]
    PermissionDenied(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not a directory: {0}")]
    NotADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Is a directory: {0}")]
    IsADirectory(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Invalid path: {0}")]
    InvalidPath(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("I/O error: {0}")]
    IoError(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Not supported: {0}")]
    NotSupported(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Bad file descriptor: {0}")]
    BadDescriptor(i32),

    #[error("Out of space")]
    OutOfSpace,

    #[error("Invalid argument: {0}")]
    InvalidArgument(#[serde(deserialize_with = "deserialize_nonempty_string")] String),

    #[error("Read-only filesystem")]
    ReadOnly,

    #[error("Cross-device link")]
    CrossDevice,
}

impl VfsError {
    /// Platform error code carried through the provider boundary
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            VfsError::NotFound(_) => platform::ENOENT,
            VfsError::IoError(_) => platform::EIO,
            VfsError::BadDescriptor(_) => platform::EBADF,
            VfsError::PermissionDenied(_) => platform::EACCES,
            VfsError::AlreadyExists(_) => platform::EEXIST,
            VfsError::CrossDevice => platform::EXDEV,
            VfsError::NotADirectory(_) => platform::ENOTDIR,
            VfsError::IsADirectory(_) => platform::EISDIR,
            VfsError::InvalidPath(_) | VfsError::InvalidArgument(_) => platform::EINVAL,
            VfsError::OutOfSpace => platform::ENOSPC,
            VfsError::ReadOnly => platform::EROFS,
            VfsError::NotSupported(_) => platform::ENOSYS,
            VfsError::DirectoryNotEmpty(_) => platform::ENOTEMPTY,
        }
    }

    /// Convert a host I/O error, keeping the most specific variant available
    pub fn from_io(e: std::io::Error, context: impl Into<String>) -> Self {
        use std::io::ErrorKind;
        let context = context.into();
        match e.kind() {
            ErrorKind::NotFound => VfsError::NotFound(context),
            ErrorKind::PermissionDenied => VfsError::PermissionDenied(context),
            ErrorKind::AlreadyExists => VfsError::AlreadyExists(context),
            ErrorKind::InvalidInput => VfsError::InvalidArgument(context),
            _ => match e.raw_os_error() {
                Some(18) => VfsError::CrossDevice,
                Some(20) => VfsError::NotADirectory(context),
                Some(21) => VfsError::IsADirectory(context),
                Some(28) => VfsError::OutOfSpace,
                Some(30) => VfsError::ReadOnly,
                Some(39) | Some(66) => VfsError::DirectoryNotEmpty(context),
                _ => VfsError::IoError(format!("{}: {}", context, e)),
            },
        }
    }
}

/// Deserialize and validate non-empty string for error messages
pub(super) fn deserialize_nonempty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() {
        return Err(serde::de::Error::custom("error message must not be empty"));
    }
    Ok(s)
}
