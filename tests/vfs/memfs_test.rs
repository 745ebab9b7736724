/*!
 * MemFS Tests
 * In-memory backend behaviour relied on by the provider
 */

use std::io::{Read, Write};
use std::path::Path;

use file_access_ext::vfs::{FileSystem, MemFS, MoveMode, OpenFlags, VfsError};
use pretty_assertions::assert_eq;

#[test]
fn test_memfs_basic() {
    let fs = MemFS::new();

    fs.write(Path::new("/test.txt"), b"hello").unwrap();
    assert_eq!(fs.read(Path::new("/test.txt")).unwrap(), b"hello");

    assert!(fs.exists(Path::new("/test.txt")).unwrap());
    assert!(!fs.exists(Path::new("/missing.txt")).unwrap());

    fs.delete(Path::new("/test.txt")).unwrap();
    assert!(!fs.exists(Path::new("/test.txt")).unwrap());
}

#[test]
fn test_listing_keeps_creation_order() {
    let fs = MemFS::new();
    fs.create_dir(Path::new("/dir")).unwrap();
    for name in ["zeta", "alpha", "mid"] {
        fs.write(&Path::new("/dir").join(name), b"").unwrap();
    }

    let names: Vec<_> = fs
        .list_dir(Path::new("/dir"))
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(names, vec!["zeta", "alpha", "mid"]);
}

#[test]
fn test_create_dir_is_not_recursive() {
    let fs = MemFS::new();
    assert!(matches!(
        fs.create_dir(Path::new("/a/b")),
        Err(VfsError::NotFound(_))
    ));
    fs.create_dir(Path::new("/a")).unwrap();
    assert!(matches!(
        fs.create_dir(Path::new("/a")),
        Err(VfsError::AlreadyExists(_))
    ));
}

#[test]
fn test_remove_dir_requires_empty() {
    let fs = MemFS::new();
    fs.create_dir(Path::new("/d")).unwrap();
    fs.write(Path::new("/d/f"), b"x").unwrap();

    assert!(matches!(
        fs.remove_dir(Path::new("/d")),
        Err(VfsError::DirectoryNotEmpty(_))
    ));
    fs.remove_dir_all(Path::new("/d")).unwrap();
    assert!(!fs.exists(Path::new("/d")).unwrap());
}

#[test]
fn test_rename_moves_subtree() {
    let fs = MemFS::new();
    fs.create_dir(Path::new("/src")).unwrap();
    fs.create_dir(Path::new("/src/inner")).unwrap();
    fs.write(Path::new("/src/inner/f"), b"data").unwrap();

    fs.rename(Path::new("/src"), Path::new("/dst")).unwrap();
    assert_eq!(fs.read(Path::new("/dst/inner/f")).unwrap(), b"data");
    assert!(!fs.exists(Path::new("/src")).unwrap());
}

#[test]
fn test_move_dir_modes() {
    let fs = MemFS::new();
    fs.create_dir(Path::new("/a")).unwrap();
    fs.write(Path::new("/a/f"), b"new").unwrap();
    fs.create_dir(Path::new("/b")).unwrap();
    fs.write(Path::new("/b/f"), b"old").unwrap();
    fs.write(Path::new("/b/keep"), b"keep").unwrap();

    assert!(matches!(
        fs.move_dir(Path::new("/a"), Path::new("/b"), MoveMode::NoOverwrite),
        Err(VfsError::AlreadyExists(_))
    ));

    fs.move_dir(Path::new("/a"), Path::new("/b"), MoveMode::OverwriteFiles)
        .unwrap();
    assert_eq!(fs.read(Path::new("/b/f")).unwrap(), b"new");
    assert_eq!(fs.read(Path::new("/b/keep")).unwrap(), b"keep");
    assert!(!fs.exists(Path::new("/a")).unwrap());
}

#[test]
fn test_open_handle_writes_back() {
    let fs = MemFS::new();
    {
        let mut file = fs.open(Path::new("/h.txt"), OpenFlags::create()).unwrap();
        file.write_all(b"through handle").unwrap();
    }

    let mut file = fs.open(Path::new("/h.txt"), OpenFlags::read_only()).unwrap();
    let mut contents = String::new();
    file.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, "through handle");
    assert_eq!(file.metadata().unwrap().size, 14);
}

#[test]
fn test_path_normalization() {
    let fs = MemFS::new();
    fs.write(Path::new("/test.txt"), b"hello").unwrap();

    assert!(fs.exists(Path::new("test.txt")).unwrap());
    assert!(fs.exists(Path::new("//test.txt")).unwrap());
    assert!(fs.exists(Path::new("/x/../test.txt")).unwrap());
}
