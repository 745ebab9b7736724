/*!
 * In-Memory Filesystem Backend
 * Volatile filesystem for tests and ephemeral roots
 */

mod dir_ops;
mod file_handle;
mod file_ops;
mod node;

use ahash::RandomState;
use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::traits::{FileSystem, OpenFile};
use super::types::*;
use node::Node;

/// In-memory filesystem implementation
///
/// Directory listings come back in creation order.
#[derive(Debug, Clone)]
pub struct MemFS {
    pub(super) nodes: Arc<DashMap<PathBuf, Node, RandomState>>,
    next_ino: Arc<AtomicU64>,
}

impl MemFS {
    /// Create new in-memory filesystem
    pub fn new() -> Self {
        let nodes = DashMap::with_hasher(RandomState::new());
        nodes.insert(PathBuf::from("/"), Node::directory(1));

        Self {
            nodes: Arc::new(nodes),
            next_ino: Arc::new(AtomicU64::new(2)),
        }
    }

    pub(super) fn alloc_ino(&self) -> u64 {
        self.next_ino.fetch_add(1, Ordering::Relaxed)
    }

    /// Normalize path (make absolute and clean)
    pub(super) fn normalize(&self, path: &Path) -> PathBuf {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            Path::new("/").join(path)
        };
        PathBuf::from(path_clean::clean(&path))
    }

    /// Split a normalized path into (parent, name)
    pub(super) fn split(&self, path: &Path) -> VfsResult<(PathBuf, String)> {
        let parent = path
            .parent()
            .ok_or_else(|| VfsError::InvalidPath("root has no parent".to_string()))?
            .to_path_buf();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| VfsError::InvalidPath(format!("invalid name: {}", path.display())))?
            .to_string();
        Ok((parent, name))
    }

    /// Parent must exist and be a directory
    pub(super) fn check_parent(&self, parent: &Path) -> VfsResult<()> {
        match self.nodes.get(parent) {
            Some(node) if node.is_dir() => Ok(()),
            Some(_) => Err(VfsError::NotADirectory(parent.display().to_string())),
            None => Err(VfsError::NotFound(parent.display().to_string())),
        }
    }

    pub(super) fn attach(&self, parent: &Path, name: &str) {
        if let Some(mut node) = self.nodes.get_mut(parent) {
            if let Node::Directory { children, .. } = node.value_mut() {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    pub(super) fn detach(&self, parent: &Path, name: &str) {
        if let Some(mut node) = self.nodes.get_mut(parent) {
            if let Node::Directory { children, .. } = node.value_mut() {
                children.retain(|c| c != name);
            }
        }
    }
}

impl Default for MemFS {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemFS {
    fn read(&self, path: &Path) -> VfsResult<Vec<u8>> {
        self.read_impl(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> VfsResult<()> {
        self.write_impl(path, data)
    }

    fn create(&self, path: &Path) -> VfsResult<()> {
        self.write_impl(path, &[])
    }

    fn delete(&self, path: &Path) -> VfsResult<()> {
        self.delete_impl(path)
    }

    fn exists(&self, path: &Path) -> VfsResult<bool> {
        Ok(self.nodes.contains_key(&self.normalize(path)))
    }

    fn metadata(&self, path: &Path) -> VfsResult<Metadata> {
        let path = self.normalize(path);
        self.nodes
            .get(&path)
            .map(|node| node.metadata())
            .ok_or_else(|| VfsError::NotFound(path.display().to_string()))
    }

    fn list_dir(&self, path: &Path) -> VfsResult<Vec<Entry>> {
        self.list_dir_impl(path)
    }

    fn create_dir(&self, path: &Path) -> VfsResult<()> {
        self.create_dir_impl(path)
    }

    fn remove_dir(&self, path: &Path) -> VfsResult<()> {
        self.remove_dir_impl(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> VfsResult<()> {
        self.rename_impl(from, to)
    }

    fn open(&self, path: &Path, flags: OpenFlags) -> VfsResult<Box<dyn OpenFile>> {
        self.open_impl(path, flags)
    }

    fn name(&self) -> &str {
        "memory"
    }
}
