/*!
 * File Handle Implementation
 * In-memory file handle for read/write operations
 */

use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::super::traits::{FileSystem, OpenFile};
use super::super::types::*;
use super::MemFS;

impl MemFS {
    pub(super) fn open_impl(&self, path: &Path, flags: OpenFlags) -> VfsResult<Box<dyn OpenFile>> {
        let path = self.normalize(path);

        match self.nodes.get(&path).map(|n| n.is_dir()) {
            Some(true) => return Err(VfsError::IsADirectory(path.display().to_string())),
            Some(false) if flags.create_new => {
                return Err(VfsError::AlreadyExists(path.display().to_string()))
            }
            None if !(flags.create || flags.create_new) => {
                return Err(VfsError::NotFound(path.display().to_string()))
            }
            None => self.write_impl(&path, &[])?,
            Some(false) => {}
        }

        let data = if flags.truncate {
            self.write_impl(&path, &[])?;
            Vec::new()
        } else {
            self.read_impl(&path)?
        };

        Ok(Box::new(MemFile {
            fs: self.clone(),
            path,
            cursor: Cursor::new(data),
            flags,
            dirty: false,
        }))
    }
}

/// In-memory file handle; contents are written back on sync or drop
pub(super) struct MemFile {
    fs: MemFS,
    path: PathBuf,
    cursor: Cursor<Vec<u8>>,
    flags: OpenFlags,
    dirty: bool,
}

impl Read for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if !self.flags.read {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "file not opened for reading",
            ));
        }
        self.cursor.read(buf)
    }
}

impl Write for MemFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if !(self.flags.write || self.flags.append) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "file not opened for writing",
            ));
        }
        if self.flags.append {
            self.cursor.seek(SeekFrom::End(0))?;
        }
        self.dirty = true;
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.sync()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))
    }
}

impl Seek for MemFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl OpenFile for MemFile {
    fn sync(&mut self) -> VfsResult<()> {
        if self.dirty {
            self.fs.write(&self.path, self.cursor.get_ref())?;
            self.dirty = false;
        }
        Ok(())
    }

    fn metadata(&self) -> VfsResult<Metadata> {
        self.fs.metadata(&self.path)
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        let _ = self.sync();
    }
}
