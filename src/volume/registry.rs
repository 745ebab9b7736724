/*!
 * Volume Registry
 * Table of currently mounted removable volumes
 */

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::{AbortHandle, JoinHandle};
use tracing::{debug, info, warn};

use super::source::VolumeSource;
use super::types::*;

/// Registry of mounted volumes
///
/// Readers get immutable snapshots; writers replace the whole table, so a
/// snapshot never contains a partially updated record. Clones share state.
#[derive(Clone)]
pub struct VolumeRegistry {
    volumes: Arc<ArcSwap<Vec<VolumeInfo>>>,
    tasks: Arc<Mutex<Vec<AbortHandle>>>,
}

impl VolumeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            volumes: Arc::new(ArcSwap::from_pointee(Vec::new())),
            tasks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Enumerate mounted volumes in the background
    ///
    /// Must be called inside a tokio runtime. A failed enumeration is logged
    /// and leaves the registry as it is; there is no retry.
    pub fn init(&self, source: Arc<dyn VolumeSource>) -> JoinHandle<()> {
        let registry = self.clone();
        let handle = tokio::spawn(async move {
            let enumerated = tokio::task::spawn_blocking(move || source.enumerate_volumes()).await;
            match enumerated {
                Ok(Ok(volumes)) => {
                    let count = volumes.len();
                    for descriptor in volumes {
                        registry.add(VolumeInfo::from_descriptor(descriptor));
                    }
                    info!(count, "Volume enumeration complete");
                }
                Ok(Err(e)) => warn!(error = %e, "Volume enumeration failed"),
                Err(e) => warn!(error = %e, "Volume enumeration task aborted"),
            }
        });
        self.track(handle.abort_handle());
        handle
    }

    /// Register a background task to be aborted on shutdown
    pub fn track(&self, handle: AbortHandle) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(handle);
    }

    /// Stop background tasks and forget every volume
    pub fn shutdown(&self) {
        for task in self.tasks.lock().drain(..) {
            task.abort();
        }
        self.volumes.store(Arc::new(Vec::new()));
        info!("Volume registry shut down");
    }

    /// Insert or replace by volume id
    pub fn add(&self, info: VolumeInfo) {
        debug!(volume_id = %info.volume_id, path = %info.path, "Adding volume");
        self.volumes.rcu(|current| {
            let mut next = (**current).clone();
            match next.iter_mut().find(|v| v.volume_id == info.volume_id) {
                Some(slot) => *slot = info.clone(),
                None => next.push(info.clone()),
            }
            next
        });
    }

    /// Remove every entry with `volume_id`; returns how many were removed
    pub fn remove(&self, volume_id: &str) -> usize {
        let previous = self.volumes.rcu(|current| {
            current
                .iter()
                .filter(|v| v.volume_id != volume_id)
                .cloned()
                .collect::<Vec<_>>()
        });
        let removed = previous.iter().filter(|v| v.volume_id == volume_id).count();
        debug!(volume_id, removed, "Removing volume");
        removed
    }

    /// Apply a mount notification
    pub fn apply(&self, event: VolumeEvent) {
        match event {
            VolumeEvent::Mounted(descriptor) => self.add(VolumeInfo::from_descriptor(descriptor)),
            VolumeEvent::Unmounted { id } | VolumeEvent::Other { id, .. } => {
                self.remove(&id);
            }
        }
    }

    /// Current snapshot
    pub fn list(&self) -> Arc<Vec<VolumeInfo>> {
        self.volumes.load_full()
    }

    pub fn get(&self, volume_id: &str) -> Option<VolumeInfo> {
        self.volumes
            .load()
            .iter()
            .find(|v| v.volume_id == volume_id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.volumes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.load().is_empty()
    }
}

impl Default for VolumeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
