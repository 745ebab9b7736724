/*!
 * Event Bridge
 * Forwards mount notifications from a volume source into the registry
 */

use futures::StreamExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::registry::VolumeRegistry;
use super::source::VolumeSource;
use super::types::VolumeEvent;

/// Background task applying volume events to a registry
pub struct EventBridge {
    handle: JoinHandle<()>,
}

impl EventBridge {
    /// Apply every event received on `rx` until the channel closes
    pub fn spawn(registry: VolumeRegistry, rx: flume::Receiver<VolumeEvent>) -> Self {
        let task_registry = registry.clone();
        let handle = tokio::spawn(async move {
            let mut events = rx.into_stream();
            while let Some(event) = events.next().await {
                debug!(?event, "Volume event received");
                task_registry.apply(event);
            }
            info!("Volume event stream closed");
        });
        registry.track(handle.abort_handle());
        Self { handle }
    }

    /// Subscribe to `source`, enumerate current volumes, then bridge events
    ///
    /// Subscribing first means a mount racing the enumeration is still seen.
    /// An unmount delivered before the enumeration finishes is not: the
    /// enumerated entry is added afterwards and stays until the next event.
    pub fn start(registry: &VolumeRegistry, source: Arc<dyn VolumeSource>) -> Self {
        let rx = source.subscribe();
        registry.init(source);
        Self::spawn(registry.clone(), rx)
    }

    pub fn stop(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
