/*!
 * Provider Configuration
 *
 * Settings for the daemon, loaded from `FILEACCESS_*` environment variables.
 */

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::core::limits::{DEFAULT_BUNDLE_NAME, DEFAULT_VOLUME_POLL_INTERVAL};

pub const ENV_STORAGE_PATH: &str = "FILEACCESS_STORAGE_PATH";
pub const ENV_VOLUME_DIR: &str = "FILEACCESS_VOLUME_DIR";
pub const ENV_BUNDLE_NAME: &str = "FILEACCESS_BUNDLE_NAME";
pub const ENV_TRACE_JSON: &str = "FILEACCESS_TRACE_JSON";
pub const ENV_POLL_INTERVAL_MS: &str = "FILEACCESS_POLL_INTERVAL_MS";

const DEFAULT_STORAGE_PATH: &str = "/tmp/file-access-storage";

/// Mount point of volumes inside the provider's filesystem
pub const VOLUME_MOUNT_PREFIX: &str = "/mnt";

/// Daemon configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ProviderConfig {
    /// Host directory backing the provider's local filesystem
    pub storage_path: PathBuf,

    /// Host directory whose subdirectories are mounted volumes
    /// (default: `<storage_path>/mnt`)
    pub volume_dir: PathBuf,

    /// Bundle segment stripped from provider URIs
    pub bundle_name: String,

    /// JSON log output
    pub trace_json: bool,

    /// Volume directory rescan interval in milliseconds
    pub poll_interval_ms: u64,
}

impl ProviderConfig {
    /// Configuration rooted at `storage_path` with every other value defaulted
    pub fn with_storage(storage_path: impl Into<PathBuf>) -> Self {
        let storage_path = storage_path.into();
        Self {
            volume_dir: storage_path.join(VOLUME_MOUNT_PREFIX.trim_start_matches('/')),
            storage_path,
            bundle_name: DEFAULT_BUNDLE_NAME.to_string(),
            trace_json: false,
            poll_interval_ms: DEFAULT_VOLUME_POLL_INTERVAL.as_millis() as u64,
        }
    }

    /// Load from the environment; unset or unparsable values keep their defaults
    pub fn from_env() -> Self {
        let storage_path =
            std::env::var(ENV_STORAGE_PATH).unwrap_or_else(|_| DEFAULT_STORAGE_PATH.to_string());
        let mut config = Self::with_storage(storage_path);

        if let Ok(dir) = std::env::var(ENV_VOLUME_DIR) {
            config.volume_dir = PathBuf::from(dir);
        }
        if let Ok(name) = std::env::var(ENV_BUNDLE_NAME) {
            config.bundle_name = name;
        }
        if let Ok(json) = std::env::var(ENV_TRACE_JSON) {
            config.trace_json = json == "1" || json == "true";
        }
        if let Ok(raw) = std::env::var(ENV_POLL_INTERVAL_MS) {
            match raw.parse::<u64>() {
                Ok(ms) if ms > 0 => config.poll_interval_ms = ms,
                _ => warn!(value = %raw, "Ignoring invalid {}", ENV_POLL_INTERVAL_MS),
            }
        }
        config
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::with_storage(DEFAULT_STORAGE_PATH)
    }
}
