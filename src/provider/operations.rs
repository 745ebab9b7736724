/*!
 * File Operations
 * URI-addressed operations over a filesystem capability and the volume registry
 */

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::errors::{ProviderError, ProviderResult};
use super::handles::HandleTable;
use super::query::QueryEngine;
use super::types::*;
use crate::core::limits::status::ERR_ERROR;
use crate::core::limits::{FILE_SCHEME, PRIMARY_ROOT_NAME, PRIMARY_ROOT_PATH};
use crate::monitoring::OperationSpan;
use crate::uri::UriTranslator;
use crate::vfs::{FileSystem, MoveMode, OpenFlags, VfsError};
use crate::volume::VolumeRegistry;

/// File access extension
///
/// Every public operation validates its URI arguments before touching the
/// filesystem and converts every failure into a `(empty, code)` response.
pub struct FileAccessExt {
    fs: Arc<dyn FileSystem>,
    translator: UriTranslator,
    registry: VolumeRegistry,
    handles: HandleTable,
}

impl FileAccessExt {
    pub fn new(fs: Arc<dyn FileSystem>, registry: VolumeRegistry) -> Self {
        Self::with_translator(fs, registry, UriTranslator::default())
    }

    pub fn with_translator(
        fs: Arc<dyn FileSystem>,
        registry: VolumeRegistry,
        translator: UriTranslator,
    ) -> Self {
        info!(backend = fs.name(), bundle = translator.bundle_name(), "File access extension ready");
        Self {
            fs,
            translator,
            registry,
            handles: HandleTable::new(),
        }
    }

    pub fn registry(&self) -> &VolumeRegistry {
        &self.registry
    }

    pub fn translator(&self) -> &UriTranslator {
        &self.translator
    }

    pub fn handles(&self) -> &HandleTable {
        &self.handles
    }

    /// Open a file with POSIX `flags`; the descriptor is `-1` on failure
    pub fn open_file(&self, uri: &str, flags: u32) -> Response<i32> {
        self.run_or("open_file", uri, ERR_ERROR, || {
            self.check(uri)?;
            let flags = OpenFlags::from_posix(flags)?;
            let file = self.fs.open(&self.path(uri), flags)?;
            Ok(self.handles.insert(file)?)
        })
    }

    /// Release a descriptor returned by [`FileAccessExt::open_file`]
    pub fn close_file(&self, fd: i32) -> StatusCode {
        let span = OperationSpan::new("close_file", "");
        let _guard = span.enter();
        let response = Response::from_result("close_file", self.handles.close(fd).map_err(Into::into));
        span.record_code(response.code);
        response.code
    }

    pub fn create_file(&self, parent_uri: &str, name: &str) -> Response<String> {
        self.run("create_file", parent_uri, || {
            self.check(parent_uri)?;
            let uri = UriTranslator::child_uri(parent_uri, name);
            let path = self.path(&uri);
            if self.fs.exists(&path)? {
                return Err(ProviderError::AlreadyExists(uri));
            }
            // Dropping the handle closes it
            drop(self.fs.open(&path, OpenFlags::create())?);
            Ok(uri)
        })
    }

    pub fn mkdir(&self, parent_uri: &str, name: &str) -> Response<String> {
        self.run("mkdir", parent_uri, || {
            self.check(parent_uri)?;
            let uri = UriTranslator::child_uri(parent_uri, name);
            self.fs.create_dir(&self.path(&uri))?;
            Ok(uri)
        })
    }

    /// Remove a file, or an empty directory
    pub fn delete(&self, uri: &str) -> StatusCode {
        self.run("delete", uri, || {
            self.check(uri)?;
            let path = self.path(uri);
            if self.fs.metadata(&path)?.is_dir() {
                self.fs.remove_dir(&path)?;
            } else {
                self.fs.delete(&path)?;
            }
            Ok(())
        })
        .code
    }

    /// Move `source_uri` into the directory `target_parent_uri`
    pub fn move_file(&self, source_uri: &str, target_parent_uri: &str) -> Response<String> {
        self.run("move_file", source_uri, || {
            self.move_file_impl(source_uri, target_parent_uri)
        })
    }

    fn move_file_impl(&self, source_uri: &str, target_parent_uri: &str) -> ProviderResult<String> {
        self.check(source_uri)?;
        self.check(target_parent_uri)?;

        let name = UriTranslator::file_name(source_uri);
        let new_uri = UriTranslator::child_uri(target_parent_uri, name);
        let old_path = self.translator.to_path(source_uri);
        let new_path = self.translator.to_path(&new_uri);

        if old_path == new_path {
            debug!(path = %old_path, "Move to same location");
            return Ok(new_uri);
        }
        if is_descendant(&new_path, &old_path) {
            return Err(ProviderError::InvalidOperation(format!(
                "cannot move {} into its own subtree",
                old_path
            )));
        }

        if !self.fs.exists(Path::new(&old_path))? {
            return Err(ProviderError::InvalidOperation(format!(
                "source {} is not accessible",
                old_path
            )));
        }
        match self.fs.metadata(&self.path(target_parent_uri)) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) | Err(VfsError::NotFound(_)) => {
                return Err(ProviderError::InvalidOperation(format!(
                    "target {} is not a directory",
                    target_parent_uri
                )))
            }
            Err(e) => return Err(e.into()),
        }

        // Roots may change between this check and the move itself
        if !self.is_cross_device(source_uri, target_parent_uri) {
            self.fs.rename(Path::new(&old_path), Path::new(&new_path))?;
            return Ok(new_uri);
        }

        debug!(from = %old_path, to = %new_path, "Cross-device move");
        self.fs
            .move_dir(Path::new(&old_path), Path::new(&new_path), MoveMode::default())
            .map_err(|e| {
                error!(from = %old_path, to = %new_path, error = %e, "Cross-device move failed");
                ProviderError::InvalidOperation(e.to_string())
            })?;
        Ok(new_uri)
    }

    /// Rename the last segment of `source_uri`, keeping a trailing `/`
    pub fn rename(&self, source_uri: &str, new_name: &str) -> Response<String> {
        self.run("rename", source_uri, || {
            self.check(source_uri)?;
            let uri = UriTranslator::renamed_uri(source_uri, new_name);
            self.fs.rename(&self.path(source_uri), &self.path(&uri))?;
            Ok(uri)
        })
    }

    /// Whether the entry exists; absence is not an error
    pub fn access(&self, uri: &str) -> Response<bool> {
        self.run("access", uri, || {
            self.check(uri)?;
            Ok(self.fs.exists(&self.path(uri))?)
        })
    }

    /// Children of a directory in listing order, windowed by `offset` and `count`
    ///
    /// A filter with at least one criterion is applied before windowing.
    pub fn list_file(
        &self,
        uri: &str,
        offset: usize,
        count: usize,
        filter: Option<&FileFilter>,
    ) -> Response<Vec<FileInfo>> {
        self.run("list_file", uri, || {
            self.list_file_impl(uri, offset, count, filter)
        })
    }

    fn list_file_impl(
        &self,
        uri: &str,
        offset: usize,
        count: usize,
        filter: Option<&FileFilter>,
    ) -> ProviderResult<Vec<FileInfo>> {
        self.check(uri)?;
        let path = self.path(uri);
        if !self.fs.metadata(&path)?.is_dir() {
            return Err(ProviderError::InvalidOperation(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let entries = self
            .fs
            .list_dir(&path)
            .map_err(|e| ProviderError::InvalidOperation(e.to_string()))?;
        let filter = filter.filter(|f| f.has_criteria());
        let end = offset.saturating_add(count);

        let mut infos = Vec::new();
        let mut position = 0usize;
        for entry in entries {
            if position >= end {
                break;
            }
            // Unfiltered entries before the window need no stat
            if filter.is_none() && position < offset {
                position += 1;
                continue;
            }

            let meta = self
                .fs
                .metadata(&path.join(&entry.name))
                .map_err(|e| ProviderError::InvalidOperation(e.to_string()))?;
            let info =
                FileInfo::from_metadata(UriTranslator::child_uri(uri, &entry.name), entry.name, &meta);

            if filter.map_or(true, |f| f.matches(&info)) {
                if position >= offset {
                    infos.push(info);
                }
                position += 1;
            }
        }
        Ok(infos)
    }

    pub fn get_file_info(&self, uri: &str) -> Response<FileInfo> {
        self.run("get_file_info", uri, || {
            self.check(uri)?;
            let path = self.translator.to_path(uri);
            let meta = self.fs.metadata(Path::new(&path))?;
            Ok(FileInfo::from_metadata(
                uri.to_string(),
                UriTranslator::file_name(&path),
                &meta,
            ))
        })
    }

    /// Primary root followed by one root per mounted volume
    pub fn get_roots(&self) -> Response<Vec<RootInfo>> {
        let span = OperationSpan::new("get_roots", "");
        let _guard = span.enter();
        let response = Response::ok(self.roots());
        span.record_code(response.code);
        response
    }

    fn roots(&self) -> Vec<RootInfo> {
        let volumes = self.registry.list();
        let mut roots = Vec::with_capacity(volumes.len() + 1);
        roots.push(self.primary_root());
        roots.extend(volumes.iter().map(RootInfo::from));
        roots
    }

    pub fn primary_root(&self) -> RootInfo {
        RootInfo {
            uri: format!(
                "{}://{}{}",
                FILE_SCHEME,
                self.translator.bundle_name(),
                PRIMARY_ROOT_PATH
            ),
            display_name: PRIMARY_ROOT_NAME.to_string(),
            device_type: DeviceType::DeviceSharedDisk,
            device_flags: device_flag::SUPPORTS_READ | device_flag::SUPPORTS_WRITE,
        }
    }

    /// True unless both URIs start with the URI of one current root
    pub fn is_cross_device(&self, source_uri: &str, target_uri: &str) -> bool {
        !self
            .roots()
            .iter()
            .any(|root| source_uri.starts_with(&root.uri) && target_uri.starts_with(&root.uri))
    }

    /// Resolve `columns` for the entry at `uri`, in request order
    pub fn query<S: AsRef<str>>(&self, uri: &str, columns: &[S]) -> Response<Vec<String>> {
        self.run("query", uri, || {
            self.check(uri)?;
            let path = self.translator.to_path(uri);
            if !self.fs.exists(Path::new(&path)).unwrap_or(false) {
                return Err(ProviderError::NotFound(path));
            }
            let meta = self
                .fs
                .metadata(Path::new(&path))
                .map_err(|e| ProviderError::InvalidOperation(e.to_string()))?;
            Ok(QueryEngine::new(self.fs.as_ref()).resolve(&path, &meta, columns))
        })
    }

    fn check(&self, uri: &str) -> ProviderResult<()> {
        if self.translator.validate(uri) {
            Ok(())
        } else {
            Err(ProviderError::InvalidUri(uri.to_string()))
        }
    }

    fn path(&self, uri: &str) -> PathBuf {
        PathBuf::from(self.translator.to_path(uri))
    }

    fn run<T: Default>(
        &self,
        operation: &'static str,
        uri: &str,
        f: impl FnOnce() -> ProviderResult<T>,
    ) -> Response<T> {
        self.run_or(operation, uri, T::default(), f)
    }

    fn run_or<T>(
        &self,
        operation: &'static str,
        uri: &str,
        empty: T,
        f: impl FnOnce() -> ProviderResult<T>,
    ) -> Response<T> {
        let span = OperationSpan::new(operation, uri);
        let _guard = span.enter();
        let response = Response::from_result_or(operation, f(), empty);
        span.record_code(response.code);
        response
    }
}

/// Whether `path` lies strictly below `ancestor`
fn is_descendant(path: &str, ancestor: &str) -> bool {
    match path.strip_prefix(ancestor) {
        Some(rest) => rest.starts_with('/') || (ancestor.ends_with('/') && !rest.is_empty()),
        None => false,
    }
}
