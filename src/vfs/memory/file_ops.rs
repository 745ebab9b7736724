/*!
 * File Operations Implementation
 * FileSystem trait methods for file contents, unlink and rename
 */

use std::path::Path;
use std::time::SystemTime;

use super::super::types::*;
use super::node::Node;
use super::MemFS;

impl MemFS {
    pub(super) fn read_impl(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let path = self.normalize(path);

        match self.nodes.get(&path).map(|n| n.clone()) {
            Some(Node::File { data, .. }) => Ok(data),
            Some(Node::Directory { .. }) => Err(VfsError::IsADirectory(path.display().to_string())),
            None => Err(VfsError::NotFound(path.display().to_string())),
        }
    }

    pub(super) fn write_impl(&self, path: &Path, data: &[u8]) -> VfsResult<()> {
        let path = self.normalize(path);
        let (parent, name) = self.split(&path)?;
        self.check_parent(&parent)?;

        let existing = match self.nodes.get(&path).map(|n| n.is_dir()) {
            Some(true) => return Err(VfsError::IsADirectory(path.display().to_string())),
            Some(false) => true,
            None => false,
        };

        if existing {
            if let Some(mut node) = self.nodes.get_mut(&path) {
                if let Node::File {
                    data: contents,
                    modified,
                    ..
                } = node.value_mut()
                {
                    *contents = data.to_vec();
                    *modified = SystemTime::now();
                }
            }
            return Ok(());
        }

        let ino = self.alloc_ino();
        self.nodes.insert(
            path.clone(),
            Node::File {
                data: data.to_vec(),
                ino,
                modified: SystemTime::now(),
            },
        );
        self.attach(&parent, &name);
        Ok(())
    }

    pub(super) fn delete_impl(&self, path: &Path) -> VfsResult<()> {
        let path = self.normalize(path);

        match self.nodes.get(&path).map(|n| n.is_dir()) {
            Some(true) => return Err(VfsError::IsADirectory(path.display().to_string())),
            Some(false) => {}
            None => return Err(VfsError::NotFound(path.display().to_string())),
        }

        let (parent, name) = self.split(&path)?;
        self.nodes.remove(&path);
        self.detach(&parent, &name);
        Ok(())
    }

    pub(super) fn rename_impl(&self, from: &Path, to: &Path) -> VfsResult<()> {
        let from = self.normalize(from);
        let to = self.normalize(to);

        let source_is_dir = self
            .nodes
            .get(&from)
            .map(|n| n.is_dir())
            .ok_or_else(|| VfsError::NotFound(from.display().to_string()))?;

        if from == to {
            return Ok(());
        }
        if to.starts_with(&from) {
            return Err(VfsError::InvalidArgument(format!(
                "cannot move {} into itself",
                from.display()
            )));
        }

        let (from_parent, from_name) = self.split(&from)?;
        let (to_parent, to_name) = self.split(&to)?;
        self.check_parent(&to_parent)?;

        // POSIX replacement rules for an existing destination
        match self.nodes.get(&to).map(|n| n.clone()) {
            Some(Node::Directory { children, .. }) => {
                if !source_is_dir {
                    return Err(VfsError::IsADirectory(to.display().to_string()));
                }
                if !children.is_empty() {
                    return Err(VfsError::DirectoryNotEmpty(to.display().to_string()));
                }
                self.nodes.remove(&to);
            }
            Some(Node::File { .. }) => {
                if source_is_dir {
                    return Err(VfsError::NotADirectory(to.display().to_string()));
                }
                self.nodes.remove(&to);
            }
            None => {}
        }

        let subtree: Vec<_> = self
            .nodes
            .iter()
            .filter(|entry| entry.key().starts_with(&from))
            .map(|entry| entry.key().clone())
            .collect();

        for key in subtree {
            if let Some((_, node)) = self.nodes.remove(&key) {
                let target = match key.strip_prefix(&from) {
                    Ok(rel) if !rel.as_os_str().is_empty() => to.join(rel),
                    _ => to.clone(),
                };
                self.nodes.insert(target, node);
            }
        }

        self.detach(&from_parent, &from_name);
        self.attach(&to_parent, &to_name);
        Ok(())
    }
}
