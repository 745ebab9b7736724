/*!
 * File Access Daemon - Main Entry Point
 *
 * Serves the primary storage root from a host directory and tracks removable
 * volumes appearing under the volume directory.
 */

use anyhow::Context;
use std::sync::Arc;
use tracing::{debug, info, warn};

use file_access_ext::config::VOLUME_MOUNT_PREFIX;
use file_access_ext::core::limits::PRIMARY_ROOT_PATH;
use file_access_ext::{
    init_tracing_with, DirectoryVolumeSource, EventBridge, FileAccessExt, LocalFS,
    ProviderConfig, UriTranslator, VolumeRegistry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ProviderConfig::from_env();
    init_tracing_with(config.trace_json);

    info!("File access daemon starting...");
    info!(
        storage = %config.storage_path.display(),
        volumes = %config.volume_dir.display(),
        bundle = %config.bundle_name,
        "Configuration loaded"
    );

    let primary = config
        .storage_path
        .join(PRIMARY_ROOT_PATH.trim_start_matches('/'));
    std::fs::create_dir_all(&primary)
        .with_context(|| format!("creating primary root {}", primary.display()))?;
    std::fs::create_dir_all(&config.volume_dir)
        .with_context(|| format!("creating volume directory {}", config.volume_dir.display()))?;

    let registry = VolumeRegistry::new();
    let source = Arc::new(DirectoryVolumeSource::new(
        &config.volume_dir,
        VOLUME_MOUNT_PREFIX,
    ));
    let bridge = EventBridge::start(&registry, source.clone());
    let watcher = source.spawn_watcher(config.poll_interval());
    registry.track(watcher.abort_handle());

    let provider = FileAccessExt::with_translator(
        Arc::new(LocalFS::new(&config.storage_path)),
        registry.clone(),
        UriTranslator::new(config.bundle_name.clone()),
    );

    // Give the initial enumeration a moment before reporting roots
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    let roots = provider.get_roots();
    for root in &roots.value {
        info!(uri = %root.uri, name = %root.display_name, device = ?root.device_type, "Root available");
    }
    debug!(roots = %serde_json::to_string(&roots.value)?, "Initial roots");

    info!("Press Ctrl+C to exit");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!("Shutting down...");
    bridge.stop();
    registry.shutdown();
    if !provider.handles().is_empty() {
        warn!(open = provider.handles().len(), "Exiting with open descriptors");
    }
    Ok(())
}
