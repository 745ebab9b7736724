/*!
 * Volume Registry Tests
 * Enumeration, event application and snapshot behaviour
 */

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use file_access_ext::volume::{
    VolumeDescriptor, VolumeError, VolumeEvent, VolumeFlags, VolumeResult, VolumeType,
};
use file_access_ext::{DirectoryVolumeSource, EventBridge, VolumeRegistry, VolumeSource};
use mockall::mock;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

mock! {
    pub StorageDaemon {}

    impl VolumeSource for StorageDaemon {
        fn enumerate_volumes(&self) -> VolumeResult<Vec<VolumeDescriptor>>;
        fn subscribe(&self) -> flume::Receiver<VolumeEvent>;
    }
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached in time");
}

#[tokio::test]
async fn test_init_grants_removable_flags() {
    let mut daemon = MockStorageDaemon::new();
    daemon
        .expect_enumerate_volumes()
        .times(1)
        .returning(|| Ok(vec![VolumeDescriptor::new("sdcard", "1234-ABCD", "/mnt/sdcard")]));

    let registry = VolumeRegistry::new();
    registry.init(Arc::new(daemon)).await.unwrap();

    let volume = registry.get("sdcard").unwrap();
    assert_eq!(volume.fs_uuid, "1234-ABCD");
    assert_eq!(volume.uri, "fileAccess:///mnt/sdcard");
    assert_eq!(volume.display_name, "sdcard");
    assert_eq!(volume.device_id, "");
    assert_eq!(volume.volume_type, VolumeType::Sd);
    assert_eq!(
        volume.flags,
        VolumeFlags::SUPPORTS_WRITE
            | VolumeFlags::SUPPORTS_DELETE
            | VolumeFlags::SUPPORTS_RENAME
            | VolumeFlags::SUPPORTS_COPY
            | VolumeFlags::SUPPORTS_MOVE
            | VolumeFlags::SUPPORTS_REMOVE
            | VolumeFlags::DIR_SUPPORTS_CREATE
            | VolumeFlags::DIR_PREFERS_LAST_MODIFIED
    );
}

#[tokio::test]
async fn test_failed_enumeration_then_mount_event() {
    let (tx, rx) = flume::unbounded();
    let mut daemon = MockStorageDaemon::new();
    daemon.expect_subscribe().times(1).return_once(move || rx);
    daemon
        .expect_enumerate_volumes()
        .times(1)
        .returning(|| Err(VolumeError::Unavailable("daemon not running".into())));

    let registry = VolumeRegistry::new();
    let bridge = EventBridge::start(&registry, Arc::new(daemon));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(registry.is_empty());

    tx.send(VolumeEvent::Mounted(VolumeDescriptor::new("usb", "", "/mnt/usb")))
        .unwrap();
    wait_until(|| registry.len() == 1).await;

    bridge.stop();
}

#[tokio::test]
async fn test_non_mount_events_remove() {
    let (tx, rx) = flume::unbounded();
    let registry = VolumeRegistry::new();
    let _bridge = EventBridge::spawn(registry.clone(), rx);

    for id in ["a", "b", "c"] {
        tx.send(VolumeEvent::Mounted(VolumeDescriptor::new(id, "", format!("/mnt/{}", id))))
            .unwrap();
    }
    wait_until(|| registry.len() == 3).await;

    tx.send(VolumeEvent::Other {
        kind: "ejecting".into(),
        id: "a".into(),
    })
    .unwrap();
    tx.send(VolumeEvent::Unmounted { id: "b".into() }).unwrap();
    tx.send(VolumeEvent::Unmounted { id: "missing".into() }).unwrap();
    wait_until(|| registry.len() == 1).await;

    assert_eq!(registry.list()[0].volume_id, "c");
}

#[tokio::test]
async fn test_remount_replaces_record() {
    let registry = VolumeRegistry::new();
    registry.apply(VolumeEvent::Mounted(VolumeDescriptor::new("sd", "old", "/mnt/sd")));
    registry.apply(VolumeEvent::Mounted(VolumeDescriptor::new("sd", "new", "/mnt/sd")));

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("sd").unwrap().fs_uuid, "new");
}

#[tokio::test]
async fn test_shutdown_stops_bridge() {
    let (tx, rx) = flume::unbounded();
    let registry = VolumeRegistry::new();
    let bridge = EventBridge::spawn(registry.clone(), rx);

    registry.shutdown();
    wait_until(|| bridge.is_finished()).await;

    let _ = tx.send(VolumeEvent::Mounted(VolumeDescriptor::new("late", "", "/mnt/late")));
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(registry.is_empty());
}

#[tokio::test]
async fn test_directory_source_end_to_end() {
    let host = TempDir::new().unwrap();
    fs::create_dir(host.path().join("sd0")).unwrap();
    fs::write(host.path().join("sd0/.uuid"), "FEED-BEEF").unwrap();

    let source = Arc::new(DirectoryVolumeSource::new(host.path(), "/mnt"));
    let registry = VolumeRegistry::new();
    let _bridge = EventBridge::start(&registry, source.clone());
    let watcher = source.spawn_watcher(Duration::from_millis(20));
    registry.track(watcher.abort_handle());

    wait_until(|| registry.len() == 1).await;
    assert_eq!(registry.get("sd0").unwrap().fs_uuid, "FEED-BEEF");

    fs::create_dir(host.path().join("usb1")).unwrap();
    wait_until(|| registry.get("usb1").is_some()).await;

    fs::remove_dir_all(host.path().join("sd0")).unwrap();
    wait_until(|| registry.get("sd0").is_none()).await;

    registry.shutdown();
}
