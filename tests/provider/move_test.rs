/*!
 * Move Tests
 * Same-location, subtree, same-root and cross-device moves
 */

use std::fs;
use std::path::Path;
use std::sync::Arc;

use file_access_ext::core::limits::status::{E_GETRESULT, E_URIS, ERR_OK};
use file_access_ext::volume::VolumeDescriptor;
use file_access_ext::{FileAccessExt, FileSystem, LocalFS, MemFS, VolumeInfo, VolumeRegistry};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const PRIMARY: &str =
    "file://com.ohos.UserFile.ExternalFileManager/data/storage/el1/bundle/storage_daemon";

fn setup() -> (FileAccessExt, TempDir) {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("root/dir/child")).unwrap();
    fs::create_dir_all(dir.path().join("root/other")).unwrap();
    fs::create_dir_all(dir.path().join("data/storage/el1/bundle/storage_daemon/docs")).unwrap();
    fs::create_dir_all(dir.path().join("mnt/sd0")).unwrap();
    fs::write(dir.path().join("root/a.txt"), b"hello").unwrap();

    let registry = VolumeRegistry::new();
    registry.add(VolumeInfo::from_descriptor(VolumeDescriptor::new(
        "sd0", "CAFE", "/mnt/sd0",
    )));
    let ext = FileAccessExt::new(Arc::new(LocalFS::new(dir.path())), registry);
    (ext, dir)
}

#[test]
fn test_move_to_own_parent_is_noop() {
    let (ext, dir) = setup();
    let resp = ext.move_file("datashare:///root/a.txt", "datashare:///root");
    assert_eq!(resp.into_parts(), ("datashare:///root/a.txt".to_string(), ERR_OK));
    assert!(dir.path().join("root/a.txt").exists());
}

#[test]
fn test_move_into_descendant_is_rejected() {
    let (ext, dir) = setup();

    let resp = ext.move_file("datashare:///root/dir", "datashare:///root/dir/child");
    assert_eq!(resp.into_parts(), (String::new(), E_GETRESULT));

    // Rejected before any filesystem access, so missing paths give the same answer
    let resp = ext.move_file("datashare:///nowhere/x", "datashare:///nowhere/x/y/z");
    assert_eq!(resp.code, E_GETRESULT);

    assert!(dir.path().join("root/dir/child").is_dir());
}

#[test]
fn test_sibling_with_common_prefix_is_not_descendant() {
    let (ext, dir) = setup();
    fs::create_dir(dir.path().join("root/dir2")).unwrap();

    let resp = ext.move_file("datashare:///root/dir", "datashare:///root/dir2");
    assert_eq!(resp.code, ERR_OK);
    assert!(dir.path().join("root/dir2/dir/child").is_dir());
}

#[test]
fn test_move_missing_source() {
    let (ext, _dir) = setup();
    let resp = ext.move_file("datashare:///root/missing.txt", "datashare:///root/other");
    assert_eq!(resp.into_parts(), (String::new(), E_GETRESULT));
}

#[test]
fn test_move_target_not_a_directory() {
    let (ext, dir) = setup();
    fs::write(dir.path().join("root/b.txt"), b"b").unwrap();

    let resp = ext.move_file("datashare:///root/a.txt", "datashare:///root/b.txt");
    assert_eq!(resp.code, E_GETRESULT);

    let resp = ext.move_file("datashare:///root/a.txt", "datashare:///root/absent");
    assert_eq!(resp.code, E_GETRESULT);
    assert!(dir.path().join("root/a.txt").exists());
}

#[test]
fn test_move_validates_both_uris() {
    let (ext, _dir) = setup();
    assert_eq!(ext.move_file("datashare:///root/a.txt", "datashare://").code, E_URIS);
    assert_eq!(ext.move_file("bad", "datashare:///root").code, E_URIS);
}

#[test]
fn test_move_within_primary_root_renames() {
    let (ext, dir) = setup();
    let base = dir.path().join("data/storage/el1/bundle/storage_daemon");
    fs::write(base.join("report.pdf"), b"pdf").unwrap();

    let source = format!("{}/report.pdf", PRIMARY);
    let target = format!("{}/docs", PRIMARY);
    assert!(!ext.is_cross_device(&source, &target));

    let resp = ext.move_file(&source, &target);
    assert_eq!(resp.into_parts(), (format!("{}/docs/report.pdf", PRIMARY), ERR_OK));
    assert_eq!(fs::read(base.join("docs/report.pdf")).unwrap(), b"pdf");
    assert!(!base.join("report.pdf").exists());
}

#[test]
fn test_cross_device_move_to_volume() {
    let (ext, dir) = setup();
    let base = dir.path().join("data/storage/el1/bundle/storage_daemon");
    fs::create_dir(base.join("album")).unwrap();
    fs::write(base.join("album/1.jpg"), b"one").unwrap();
    fs::write(base.join("album/2.jpg"), b"two").unwrap();

    let source = format!("{}/album", PRIMARY);
    let target = "datashare:///mnt/sd0";
    assert!(ext.is_cross_device(&source, target));

    let resp = ext.move_file(&source, target);
    assert_eq!(resp.into_parts(), ("datashare:///mnt/sd0/album".to_string(), ERR_OK));

    let moved = dir.path().join("mnt/sd0/album");
    assert_eq!(fs::read(moved.join("1.jpg")).unwrap(), b"one");
    assert_eq!(fs::read(moved.join("2.jpg")).unwrap(), b"two");
    assert!(!base.join("album").exists());
}

#[test]
fn test_cross_device_move_conflict_fails() {
    let (ext, dir) = setup();
    fs::create_dir(dir.path().join("mnt/sd0/other")).unwrap();

    let resp = ext.move_file("datashare:///root/other", "datashare:///mnt/sd0");
    assert_eq!(resp.into_parts(), (String::new(), E_GETRESULT));
    assert!(dir.path().join("root/other").is_dir());
}

#[test]
fn test_volume_root_counts_as_one_device() {
    let (ext, _dir) = setup();
    assert!(!ext.is_cross_device("fileAccess:///mnt/sd0/a", "fileAccess:///mnt/sd0/b"));
    assert!(ext.is_cross_device("fileAccess:///mnt/sd0/a", &format!("{}/b", PRIMARY)));

    ext.registry().remove("sd0");
    assert!(ext.is_cross_device("fileAccess:///mnt/sd0/a", "fileAccess:///mnt/sd0/b"));
}

#[test]
fn test_move_on_memory_backend() {
    let memfs = MemFS::new();
    memfs.create_dir(Path::new("/src")).unwrap();
    memfs.create_dir(Path::new("/dst")).unwrap();
    let ext = FileAccessExt::new(Arc::new(memfs), VolumeRegistry::new());
    ext.create_file("datashare:///src", "f.txt");

    let resp = ext.move_file("datashare:///src/f.txt", "datashare:///dst");
    assert_eq!(resp.into_parts(), ("datashare:///dst/f.txt".to_string(), ERR_OK));
    assert!(ext.access("datashare:///dst/f.txt").value);
    assert!(!ext.access("datashare:///src/f.txt").value);
}
