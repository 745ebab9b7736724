/*!
 * Limits and Constants
 *
 * Centralized location for the provider's fixed identifiers, status codes and
 * thresholds, grouped by domain.
 */

use std::time::Duration;

// =============================================================================
// ADDRESSING
// =============================================================================

/// Provider scheme accepted by URI validation
pub const PROVIDER_SCHEME: &str = "datashare";

/// Plain file scheme; always accepted
pub const FILE_SCHEME: &str = "file";

/// Scheme used for mounted volume roots
pub const VOLUME_SCHEME: &str = "fileAccess";

/// Application bundle segment embedded in provider URIs
pub const DEFAULT_BUNDLE_NAME: &str = "com.ohos.UserFile.ExternalFileManager";

/// Path of the primary storage root inside the provider's filesystem
pub const PRIMARY_ROOT_PATH: &str = "/data/storage/el1/bundle/storage_daemon";

/// Display name of the primary storage root
pub const PRIMARY_ROOT_NAME: &str = "shared_disk";

// =============================================================================
// STATUS CODES
// =============================================================================

/// Provider status codes
pub mod status {
    pub const ERR_OK: i32 = 0;
    pub const ERR_ERROR: i32 = -1;
    /// Malformed or unrecognized URI
    pub const E_URIS: i32 = 14300002;
    /// Operation could not produce a result (invalid move, non-directory, ...)
    pub const E_GETRESULT: i32 = 14300004;
    pub const E_NOEXIST: i32 = 13900002;
    pub const E_EXIST: i32 = 13900015;
}

/// Platform filesystem error codes (errno mapped into the 139000xx range)
pub mod platform {
    pub const EPERM: i32 = 13900001;
    pub const ENOENT: i32 = 13900002;
    pub const EIO: i32 = 13900005;
    pub const EBADF: i32 = 13900008;
    pub const EACCES: i32 = 13900012;
    pub const EEXIST: i32 = 13900015;
    pub const EXDEV: i32 = 13900016;
    pub const ENOTDIR: i32 = 13900018;
    pub const EISDIR: i32 = 13900019;
    pub const EINVAL: i32 = 13900020;
    pub const ENOSPC: i32 = 13900025;
    pub const EROFS: i32 = 13900027;
    pub const ENOSYS: i32 = 13900031;
    pub const ENOTEMPTY: i32 = 13900032;
}

// =============================================================================
// HANDLES
// =============================================================================

/// First descriptor handed out by the open-file table
/// Keeps 0-2 free so descriptors never look like stdio
pub const FIRST_FD: i32 = 3;

/// Maximum simultaneously open files per provider
pub const MAX_OPEN_FILES: usize = 1024;

// =============================================================================
// VOLUMES
// =============================================================================

/// Default rescan interval for directory-backed volume sources
pub const DEFAULT_VOLUME_POLL_INTERVAL: Duration = Duration::from_secs(2);
