/*!
 * Open File Table
 * Descriptor allocation for files opened through the provider
 */

use ahash::RandomState;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI32, Ordering};
use tracing::{debug, warn};

use crate::core::limits::{FIRST_FD, MAX_OPEN_FILES};
use crate::vfs::{OpenFile, VfsError, VfsResult};

/// Maps descriptors handed to callers onto open backend files
pub struct HandleTable {
    files: DashMap<i32, Box<dyn OpenFile>, RandomState>,
    next_fd: AtomicI32,
}

impl HandleTable {
    pub fn new() -> Self {
        Self {
            files: DashMap::with_hasher(RandomState::new()),
            next_fd: AtomicI32::new(FIRST_FD),
        }
    }

    /// Take ownership of an open file and return its descriptor
    pub fn insert(&self, file: Box<dyn OpenFile>) -> VfsResult<i32> {
        if self.files.len() >= MAX_OPEN_FILES {
            warn!(limit = MAX_OPEN_FILES, "Open file table full");
            return Err(VfsError::IoError("too many open files".to_string()));
        }

        let fd = self.next_fd.fetch_add(1, Ordering::Relaxed);
        self.files.insert(fd, file);
        debug!(fd, "Descriptor allocated");
        Ok(fd)
    }

    /// Flush and release a descriptor
    pub fn close(&self, fd: i32) -> VfsResult<()> {
        let (_, mut file) = self.files.remove(&fd).ok_or(VfsError::BadDescriptor(fd))?;
        file.sync()?;
        debug!(fd, "Descriptor closed");
        Ok(())
    }

    /// Run `f` against the open file behind `fd`
    pub fn with_file<R>(&self, fd: i32, f: impl FnOnce(&mut dyn OpenFile) -> R) -> VfsResult<R> {
        let mut entry = self.files.get_mut(&fd).ok_or(VfsError::BadDescriptor(fd))?;
        Ok(f(entry.value_mut().as_mut()))
    }

    pub fn contains(&self, fd: i32) -> bool {
        self.files.contains_key(&fd)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Default for HandleTable {
    fn default() -> Self {
        Self::new()
    }
}
