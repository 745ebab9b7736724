/*!
 * Directory Operations Implementation
 * FileSystem trait methods for directory management
 */

use std::path::Path;

use super::super::types::*;
use super::node::Node;
use super::MemFS;

impl MemFS {
    pub(super) fn list_dir_impl(&self, path: &Path) -> VfsResult<Vec<Entry>> {
        let path = self.normalize(path);

        match self.nodes.get(&path).map(|n| n.clone()) {
            Some(Node::Directory { children, .. }) => {
                let mut entries = Vec::with_capacity(children.len());
                for name in children {
                    if let Some(node) = self.nodes.get(&path.join(&name)) {
                        let file_type = node.file_type();
                        entries.push(Entry::new_unchecked(name, file_type));
                    }
                }
                Ok(entries)
            }
            Some(Node::File { .. }) => Err(VfsError::NotADirectory(path.display().to_string())),
            None => Err(VfsError::NotFound(path.display().to_string())),
        }
    }

    pub(super) fn create_dir_impl(&self, path: &Path) -> VfsResult<()> {
        let path = self.normalize(path);

        if self.nodes.contains_key(&path) {
            return Err(VfsError::AlreadyExists(path.display().to_string()));
        }

        let (parent, name) = self.split(&path)?;
        self.check_parent(&parent)?;

        let ino = self.alloc_ino();
        self.nodes.insert(path, Node::directory(ino));
        self.attach(&parent, &name);
        Ok(())
    }

    pub(super) fn remove_dir_impl(&self, path: &Path) -> VfsResult<()> {
        let path = self.normalize(path);

        match self.nodes.get(&path).map(|n| n.clone()) {
            Some(Node::Directory { children, .. }) => {
                if !children.is_empty() {
                    return Err(VfsError::DirectoryNotEmpty(path.display().to_string()));
                }
            }
            Some(Node::File { .. }) => {
                return Err(VfsError::NotADirectory(path.display().to_string()))
            }
            None => return Err(VfsError::NotFound(path.display().to_string())),
        }

        let (parent, name) = self.split(&path)?;
        self.nodes.remove(&path);
        self.detach(&parent, &name);
        Ok(())
    }
}
