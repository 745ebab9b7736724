/*!
 * Volume Sources
 * Where mounted volumes and mount notifications come from
 */

use ahash::AHashMap;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::types::*;

/// Name of the file holding a volume's filesystem UUID
pub const UUID_FILE: &str = ".uuid";

/// Storage-management service as seen by the provider
#[cfg_attr(test, mockall::automock)]
pub trait VolumeSource: Send + Sync {
    /// Volumes mounted right now
    fn enumerate_volumes(&self) -> VolumeResult<Vec<VolumeDescriptor>>;

    /// Stream of mount notifications published after this call
    fn subscribe(&self) -> flume::Receiver<VolumeEvent>;
}

/// Fan-out of volume events to every live subscriber
#[derive(Default)]
struct Subscribers {
    senders: Mutex<Vec<flume::Sender<VolumeEvent>>>,
}

impl Subscribers {
    fn subscribe(&self) -> flume::Receiver<VolumeEvent> {
        let (tx, rx) = flume::unbounded();
        self.senders.lock().push(tx);
        rx
    }

    fn publish(&self, event: VolumeEvent) {
        let mut senders = self.senders.lock();
        senders.retain(|tx| tx.send(event.clone()).is_ok());
        debug!(
            volume_id = event.volume_id(),
            subscribers = senders.len(),
            "Published volume event"
        );
    }
}

/// In-process source driven by explicit calls
///
/// Used by embedders that learn about mounts from their own storage daemon.
#[derive(Default)]
pub struct ChannelVolumeSource {
    volumes: Mutex<Vec<VolumeDescriptor>>,
    subscribers: Subscribers,
}

impl ChannelVolumeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mounted volume and notify subscribers
    pub fn mount(&self, descriptor: VolumeDescriptor) {
        {
            let mut volumes = self.volumes.lock();
            volumes.retain(|v| v.id != descriptor.id);
            volumes.push(descriptor.clone());
        }
        self.subscribers.publish(VolumeEvent::Mounted(descriptor));
    }

    /// Forget a volume and notify subscribers
    pub fn unmount(&self, id: &str) {
        self.volumes.lock().retain(|v| v.id != id);
        self.subscribers
            .publish(VolumeEvent::Unmounted { id: id.to_string() });
    }

    /// Publish an arbitrary event without touching the volume list
    pub fn notify(&self, event: VolumeEvent) {
        self.subscribers.publish(event);
    }
}

impl VolumeSource for ChannelVolumeSource {
    fn enumerate_volumes(&self) -> VolumeResult<Vec<VolumeDescriptor>> {
        Ok(self.volumes.lock().clone())
    }

    fn subscribe(&self) -> flume::Receiver<VolumeEvent> {
        self.subscribers.subscribe()
    }
}

/// Source backed by a host directory where each subdirectory is a volume
///
/// The volume id is the subdirectory name and its mount path is
/// `{mount_prefix}/{id}` inside the provider's filesystem. Mount changes are
/// detected by polling, see [`DirectoryVolumeSource::spawn_watcher`].
pub struct DirectoryVolumeSource {
    host_dir: PathBuf,
    mount_prefix: String,
    subscribers: Subscribers,
}

impl DirectoryVolumeSource {
    pub fn new(host_dir: impl Into<PathBuf>, mount_prefix: impl Into<String>) -> Self {
        let mount_prefix = mount_prefix.into();
        Self {
            host_dir: host_dir.into(),
            mount_prefix: mount_prefix.trim_end_matches('/').to_string(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn host_dir(&self) -> &Path {
        &self.host_dir
    }

    fn scan(&self) -> VolumeResult<Vec<VolumeDescriptor>> {
        let entries = fs::read_dir(&self.host_dir).map_err(|e| {
            VolumeError::Unavailable(format!("{}: {}", self.host_dir.display(), e))
        })?;

        let mut volumes = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| VolumeError::EnumerationFailed(e.to_string()))?;
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }
            let Ok(id) = entry.file_name().into_string() else {
                warn!(name = ?entry.file_name(), "Skipping volume with non UTF-8 name");
                continue;
            };
            let uuid = fs::read_to_string(entry.path().join(UUID_FILE))
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let path = format!("{}/{}", self.mount_prefix, id);
            volumes.push(VolumeDescriptor::new(id, uuid, path));
        }
        volumes.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(volumes)
    }

    /// Poll the host directory and publish mount and unmount events
    ///
    /// The first scan is the baseline; only later differences are published.
    pub fn spawn_watcher(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let source = Arc::clone(self);
        tokio::spawn(async move {
            let mut known = source.snapshot();
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            info!(
                dir = %source.host_dir.display(),
                interval_ms = interval.as_millis() as u64,
                "Volume watcher started"
            );

            loop {
                ticker.tick().await;
                let current = source.snapshot();

                for (id, descriptor) in &current {
                    if known.get(id) != Some(descriptor) {
                        source
                            .subscribers
                            .publish(VolumeEvent::Mounted(descriptor.clone()));
                    }
                }
                for id in known.keys() {
                    if !current.contains_key(id) {
                        source
                            .subscribers
                            .publish(VolumeEvent::Unmounted { id: id.clone() });
                    }
                }
                known = current;
            }
        })
    }

    fn snapshot(&self) -> AHashMap<String, VolumeDescriptor> {
        match self.scan() {
            Ok(volumes) => volumes.into_iter().map(|v| (v.id.clone(), v)).collect(),
            Err(e) => {
                warn!(error = %e, "Volume scan failed");
                AHashMap::new()
            }
        }
    }
}

impl VolumeSource for DirectoryVolumeSource {
    fn enumerate_volumes(&self) -> VolumeResult<Vec<VolumeDescriptor>> {
        self.scan()
    }

    fn subscribe(&self) -> flume::Receiver<VolumeEvent> {
        self.subscribers.subscribe()
    }
}
