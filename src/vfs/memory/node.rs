/*!
 * Filesystem Node Types
 * Internal representation of files and directories
 */

use std::time::SystemTime;

use super::super::types::{FileType, Metadata};

/// In-memory filesystem node
#[derive(Debug, Clone)]
pub(in crate::vfs) enum Node {
    File {
        data: Vec<u8>,
        ino: u64,
        modified: SystemTime,
    },
    Directory {
        /// Child names in insertion order
        children: Vec<String>,
        ino: u64,
        modified: SystemTime,
    },
}

impl Node {
    pub fn directory(ino: u64) -> Self {
        Node::Directory {
            children: Vec::new(),
            ino,
            modified: SystemTime::now(),
        }
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory { .. })
    }

    pub fn file_type(&self) -> FileType {
        match self {
            Node::File { .. } => FileType::File,
            Node::Directory { .. } => FileType::Directory,
        }
    }

    pub fn metadata(&self) -> Metadata {
        let mut metadata = match self {
            Node::File { data, modified, .. } => {
                Metadata::new(FileType::File, data.len() as u64, 0o100644, *modified)
            }
            Node::Directory { modified, .. } => {
                Metadata::new(FileType::Directory, 0, 0o040755, *modified)
            }
        };
        metadata.ino = match self {
            Node::File { ino, .. } | Node::Directory { ino, .. } => *ino,
        };
        metadata
    }
}
