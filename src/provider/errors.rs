/*!
 * Provider Errors
 * Error taxonomy of the operation layer with status code mapping
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::StatusCode;
use crate::core::limits::status::{E_EXIST, E_GETRESULT, E_NOEXIST, E_URIS};
use crate::vfs::VfsError;

/// Provider operation result
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Provider operation errors with serialization support
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProviderError {
    #[error("Invalid uri: {0}")]
    #[diagnostic(
        code(provider::invalid_uri),
        help("Use file:// or datashare:///<segment>/... with non-empty segments.")
    )]
    InvalidUri(String),

    #[error("Not found: {0}")]
    #[diagnostic(code(provider::not_found), help("The entry does not exist."))]
    NotFound(String),

    #[error("Already exists: {0}")]
    #[diagnostic(
        code(provider::already_exists),
        help("Choose a different name or delete the existing entry first.")
    )]
    AlreadyExists(String),

    #[error("Invalid operation: {0}")]
    #[diagnostic(
        code(provider::invalid_operation),
        help("The request is well formed but cannot be applied to this entry.")
    )]
    InvalidOperation(String),

    #[error("Filesystem error: {0}")]
    #[diagnostic(
        code(provider::platform),
        help("The underlying filesystem rejected the call. The code is passed through.")
    )]
    Platform(#[from] VfsError),
}

impl ProviderError {
    /// Status code reported to callers
    pub const fn code(&self) -> StatusCode {
        match self {
            ProviderError::InvalidUri(_) => E_URIS,
            ProviderError::NotFound(_) => E_NOEXIST,
            ProviderError::AlreadyExists(_) => E_EXIST,
            ProviderError::InvalidOperation(_) => E_GETRESULT,
            ProviderError::Platform(e) => e.code(),
        }
    }
}
