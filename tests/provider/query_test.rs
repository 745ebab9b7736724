/*!
 * Query Tests
 * Column resolution and recursive directory size
 */

use std::fs;
use std::sync::Arc;

use file_access_ext::core::limits::status::{E_NOEXIST, E_URIS, ERR_OK};
use file_access_ext::{FileAccessExt, LocalFS, VolumeRegistry};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn setup() -> (FileAccessExt, TempDir) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("photos/2024")).unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::write(root.join("notes.txt"), vec![b'n'; 100]).unwrap();
    fs::write(root.join("photos/a.jpg"), vec![b'a'; 1_000]).unwrap();
    fs::write(root.join("photos/2024/b.jpg"), vec![b'b'; 2_500]).unwrap();

    let ext = FileAccessExt::new(Arc::new(LocalFS::new(dir.path())), VolumeRegistry::new());
    (ext, dir)
}

#[test]
fn test_directory_size_is_recursive() {
    let (ext, _dir) = setup();

    let resp = ext.query("datashare:///root", &["size"]);
    assert_eq!(resp.into_parts(), (vec!["3600".to_string()], ERR_OK));

    let resp = ext.query("datashare:///root/photos/", &["size"]);
    assert_eq!(resp.value, vec!["3500"]);

    let resp = ext.query("datashare:///root/empty", &["size"]);
    assert_eq!(resp.value, vec!["0"]);
}

#[test]
fn test_file_size_is_raw() {
    let (ext, _dir) = setup();
    let resp = ext.query("datashare:///root/notes.txt", &["size"]);
    assert_eq!(resp.value, vec!["100"]);
}

#[test]
fn test_column_order_invariance() {
    let (ext, _dir) = setup();

    let forward = ext
        .query("datashare:///root/photos", &["size", "display_name", "relative_path"])
        .value;
    let mut backward = ext
        .query("datashare:///root/photos", &["relative_path", "display_name", "size"])
        .value;
    backward.reverse();

    assert_eq!(forward, backward);
    assert_eq!(forward, vec!["3500", "photos", "/root/"]);
}

#[test]
fn test_unknown_columns_are_empty() {
    let (ext, _dir) = setup();
    let resp = ext.query("datashare:///root/notes.txt", &["bogus", "display_name", ""]);
    assert_eq!(resp.into_parts(), (vec![String::new(), "notes.txt".into(), String::new()], ERR_OK));
}

#[test]
fn test_time_columns_are_seconds() {
    let (ext, dir) = setup();
    let resp = ext.query("datashare:///root/notes.txt", &["mtime"]);

    let expected = fs::metadata(dir.path().join("root/notes.txt"))
        .unwrap()
        .modified()
        .unwrap()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    assert_eq!(resp.value, vec![expected.to_string()]);
}

#[test]
fn test_missing_entry() {
    let (ext, _dir) = setup();
    let resp = ext.query("datashare:///root/missing", &["size"]);
    assert_eq!(resp.into_parts(), (Vec::<String>::new(), E_NOEXIST));
}

#[test]
fn test_invalid_uri() {
    let (ext, _dir) = setup();
    let resp = ext.query("datashare:///root//notes.txt", &["size"]);
    assert_eq!(resp.code, E_URIS);
}

#[test]
fn test_empty_column_list() {
    let (ext, _dir) = setup();
    let resp = ext.query::<&str>("datashare:///root", &[]);
    assert_eq!(resp.into_parts(), (Vec::new(), ERR_OK));
}

#[cfg(unix)]
#[test]
fn test_unreadable_subtree_counts_as_zero() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a"), vec![0u8; 10]).unwrap();
    fs::write(root.join("sub/b"), vec![0u8; 20]).unwrap();
    fs::write(root.join("z"), vec![0u8; 5]).unwrap();
    std::os::unix::fs::symlink("/nonexistent/target", root.join("sub/dangling")).unwrap();

    let ext = FileAccessExt::new(Arc::new(LocalFS::new(dir.path())), VolumeRegistry::new());
    let resp = ext.query("datashare:///root", &["size", "display_name"]);
    assert_eq!(
        resp.into_parts(),
        (vec!["35".to_string(), "root".to_string()], ERR_OK)
    );
}

#[cfg(unix)]
#[test]
fn test_symlink_loop_terminates() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("root");
    fs::create_dir_all(&root).unwrap();
    fs::write(root.join("f"), vec![0u8; 1]).unwrap();
    std::os::unix::fs::symlink(".", root.join("loop")).unwrap();

    let ext = FileAccessExt::new(Arc::new(LocalFS::new(dir.path())), VolumeRegistry::new());
    let resp = ext.query("datashare:///root", &["size"]);
    assert_eq!(resp.code, ERR_OK);
    assert!(resp.value[0].parse::<u64>().unwrap() >= 1);
}
