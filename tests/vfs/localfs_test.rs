/*!
 * LocalFS Tests
 * Host-directory backend: traversal safety, error mapping and moves
 */

use std::fs;
use std::path::Path;

use file_access_ext::core::limits::platform;
use file_access_ext::vfs::{FileSystem, LocalFS, MoveMode};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

#[test]
fn test_paths_stay_inside_root() {
    let dir = TempDir::new().unwrap();
    let fs_root = dir.path().join("jail");
    fs::create_dir(&fs_root).unwrap();
    fs::write(dir.path().join("secret"), b"outside").unwrap();

    let local = LocalFS::new(&fs_root);
    local.write(Path::new("/../../secret"), b"inside").unwrap();

    assert_eq!(fs::read(fs_root.join("secret")).unwrap(), b"inside");
    assert_eq!(fs::read(dir.path().join("secret")).unwrap(), b"outside");
}

#[test]
fn test_error_codes() {
    let dir = TempDir::new().unwrap();
    let local = LocalFS::new(dir.path());
    local.create_dir(Path::new("/d")).unwrap();
    local.write(Path::new("/d/f"), b"x").unwrap();

    let err = local.remove_dir(Path::new("/d")).unwrap_err();
    assert_eq!(err.code(), platform::ENOTEMPTY);

    let err = local.metadata(Path::new("/missing")).unwrap_err();
    assert_eq!(err.code(), platform::ENOENT);

    let err = local.create_dir(Path::new("/d")).unwrap_err();
    assert_eq!(err.code(), platform::EEXIST);
}

#[test]
fn test_metadata_fields() {
    let dir = TempDir::new().unwrap();
    let local = LocalFS::new(dir.path());
    local.write(Path::new("/f"), b"12345").unwrap();

    let meta = local.metadata(Path::new("/f")).unwrap();
    assert!(meta.is_file());
    assert_eq!(meta.size, 5);
    assert!(meta.mtime_secs() > 0);
    #[cfg(unix)]
    assert!(meta.ino > 0);
}

#[test]
fn test_move_dir_into_existing_destination_merges() {
    let dir = TempDir::new().unwrap();
    let local = LocalFS::new(dir.path());
    fs::create_dir_all(dir.path().join("a/sub")).unwrap();
    fs::write(dir.path().join("a/sub/f"), b"moved").unwrap();
    fs::create_dir_all(dir.path().join("b/sub")).unwrap();

    local
        .move_dir(Path::new("/a"), Path::new("/b"), MoveMode::OverwriteFiles)
        .unwrap();
    assert_eq!(fs::read(dir.path().join("b/sub/f")).unwrap(), b"moved");
    assert!(!dir.path().join("a").exists());
}
