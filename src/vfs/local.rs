/*!
 * Local Filesystem Backend
 * Wraps std::fs for host filesystem access
 */

use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::debug;

use super::traits::{move_recursive, FileSystem, OpenFile};
use super::types::*;

/// Local filesystem implementation using std::fs
#[derive(Debug, Clone)]
pub struct LocalFS {
    root: PathBuf,
}

impl LocalFS {
    /// Create new local filesystem rooted at specified path
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Host directory backing this filesystem
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve path relative to root
    ///
    /// Components are processed manually so `..` can never climb above the
    /// root, for existing and non-existing paths alike.
    fn resolve(&self, path: &Path) -> PathBuf {
        let mut components = Vec::with_capacity(8);

        for component in path.components() {
            match component {
                std::path::Component::Normal(name) => components.push(name),
                std::path::Component::ParentDir => {
                    components.pop();
                }
                _ => {}
            }
        }

        let mut result = self.root.clone();
        for component in components {
            result.push(component);
        }
        result
    }

    fn convert_file_type(ft: fs::FileType) -> FileType {
        if ft.is_dir() {
            FileType::Directory
        } else if ft.is_symlink() {
            FileType::Symlink
        } else if ft.is_file() {
            FileType::File
        } else {
            FileType::Unknown
        }
    }

    fn convert_metadata(md: fs::Metadata) -> Metadata {
        let modified = md.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let mut metadata = Metadata::new(
            Self::convert_file_type(md.file_type()),
            md.len(),
            0,
            modified,
        );
        metadata.accessed = md.accessed().unwrap_or(modified);

        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            metadata.mode = md.mode();
            metadata.ino = md.ino();
            metadata.uid = md.uid();
            metadata.gid = md.gid();
            if let Some(changed) = SystemTime::UNIX_EPOCH
                .checked_add(std::time::Duration::from_secs(md.ctime().max(0) as u64))
            {
                metadata.changed = changed;
            }
        }
        #[cfg(not(unix))]
        {
            metadata.mode = if md.permissions().readonly() { 0o444 } else { 0o644 };
            metadata.changed = md.created().unwrap_or(modified);
        }

        metadata
    }
}

impl FileSystem for LocalFS {
    fn read(&self, path: &Path) -> VfsResult<Vec<u8>> {
        fs::read(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("read {}", path.display())))
    }

    fn write(&self, path: &Path, data: &[u8]) -> VfsResult<()> {
        fs::write(self.resolve(path), data)
            .map_err(|e| VfsError::from_io(e, format!("write {}", path.display())))
    }

    fn create(&self, path: &Path) -> VfsResult<()> {
        fs::File::create(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("create {}", path.display())))?;
        Ok(())
    }

    fn delete(&self, path: &Path) -> VfsResult<()> {
        fs::remove_file(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("delete {}", path.display())))
    }

    fn exists(&self, path: &Path) -> VfsResult<bool> {
        match fs::symlink_metadata(self.resolve(path)) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(VfsError::from_io(e, format!("access {}", path.display()))),
        }
    }

    fn metadata(&self, path: &Path) -> VfsResult<Metadata> {
        let md = fs::metadata(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("metadata {}", path.display())))?;
        Ok(Self::convert_metadata(md))
    }

    fn list_dir(&self, path: &Path) -> VfsResult<Vec<Entry>> {
        let entries = fs::read_dir(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("list_dir {}", path.display())))?;

        let mut result = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                VfsError::from_io(e, format!("read dir entry in {}", path.display()))
            })?;
            let name = entry
                .file_name()
                .into_string()
                .map_err(|_| VfsError::InvalidPath("invalid UTF-8 in filename".to_string()))?;
            let file_type = entry
                .file_type()
                .map_err(|e| VfsError::from_io(e, format!("get file type for {}", name)))?;

            result.push(Entry::new_unchecked(name, Self::convert_file_type(file_type)));
        }

        Ok(result)
    }

    fn create_dir(&self, path: &Path) -> VfsResult<()> {
        fs::create_dir(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("create_dir {}", path.display())))
    }

    fn remove_dir(&self, path: &Path) -> VfsResult<()> {
        fs::remove_dir(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("remove_dir {}", path.display())))
    }

    fn remove_dir_all(&self, path: &Path) -> VfsResult<()> {
        fs::remove_dir_all(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("remove_dir_all {}", path.display())))
    }

    fn copy(&self, from: &Path, to: &Path) -> VfsResult<()> {
        fs::copy(self.resolve(from), self.resolve(to)).map_err(|e| {
            VfsError::from_io(e, format!("copy {} to {}", from.display(), to.display()))
        })?;
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> VfsResult<()> {
        fs::rename(self.resolve(from), self.resolve(to)).map_err(|e| {
            VfsError::from_io(e, format!("rename {} to {}", from.display(), to.display()))
        })
    }

    fn move_dir(&self, from: &Path, to: &Path, mode: MoveMode) -> VfsResult<()> {
        // A plain rename is only safe when nothing is in the way
        if !self.exists(to)? {
            match self.rename(from, to) {
                Ok(()) => return Ok(()),
                Err(VfsError::CrossDevice) => {
                    debug!(from = %from.display(), "Rename crossed devices, copying instead");
                }
                Err(e) => return Err(e),
            }
        }

        move_recursive(self, from, to, mode)
    }

    fn open(&self, path: &Path, flags: OpenFlags) -> VfsResult<Box<dyn OpenFile>> {
        let mut options = fs::OpenOptions::new();
        options.read(flags.read);
        options.write(flags.write);
        options.append(flags.append);
        options.truncate(flags.truncate);
        options.create(flags.create);
        options.create_new(flags.create_new);

        let file = options
            .open(self.resolve(path))
            .map_err(|e| VfsError::from_io(e, format!("open {}", path.display())))?;

        Ok(Box::new(LocalFile { file }))
    }

    fn name(&self) -> &str {
        "local"
    }
}

/// Local file handle
struct LocalFile {
    file: fs::File,
}

impl Read for LocalFile {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buf)
    }
}

impl Write for LocalFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Seek for LocalFile {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> {
        self.file.seek(pos)
    }
}

impl OpenFile for LocalFile {
    fn sync(&mut self) -> VfsResult<()> {
        self.file
            .sync_all()
            .map_err(|e| VfsError::IoError(format!("sync: {}", e)))
    }

    fn metadata(&self) -> VfsResult<Metadata> {
        let md = self
            .file
            .metadata()
            .map_err(|e| VfsError::IoError(format!("metadata: {}", e)))?;
        Ok(LocalFS::convert_metadata(md))
    }
}
