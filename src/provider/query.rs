/*!
 * Query Engine
 * Column resolution for `query`, including recursive directory sizes
 */

use std::path::Path;
use tracing::error;

use crate::vfs::{FileSystem, Metadata};

/// Raw stat fields that can be queried by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    Ino,
    Mode,
    Uid,
    Gid,
    Size,
    Atime,
    Mtime,
    Ctime,
}

/// A requested column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Stat(StatField),
    DisplayName,
    RelativePath,
    Unknown,
}

impl Column {
    pub fn parse(name: &str) -> Self {
        match name {
            "ino" => Column::Stat(StatField::Ino),
            "mode" => Column::Stat(StatField::Mode),
            "uid" => Column::Stat(StatField::Uid),
            "gid" => Column::Stat(StatField::Gid),
            "size" => Column::Stat(StatField::Size),
            "atime" => Column::Stat(StatField::Atime),
            "mtime" => Column::Stat(StatField::Mtime),
            "ctime" => Column::Stat(StatField::Ctime),
            "display_name" => Column::DisplayName,
            "relative_path" => Column::RelativePath,
            _ => Column::Unknown,
        }
    }
}

/// Resolves query columns against one stat'ed entry
pub struct QueryEngine<'a> {
    fs: &'a dyn FileSystem,
}

impl<'a> QueryEngine<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self { fs }
    }

    /// One value per column, in request order; never fails
    pub fn resolve<S: AsRef<str>>(&self, path: &str, metadata: &Metadata, columns: &[S]) -> Vec<String> {
        columns
            .iter()
            .map(|column| self.column(path, metadata, Column::parse(column.as_ref())))
            .collect()
    }

    fn column(&self, path: &str, metadata: &Metadata, column: Column) -> String {
        match column {
            Column::Stat(StatField::Size) if metadata.is_dir() => {
                self.dir_size(Path::new(path)).to_string()
            }
            Column::Stat(field) => stat_value(metadata, field),
            Column::DisplayName => match path.rfind('/') {
                Some(idx) => path[idx + 1..].to_string(),
                None => path.to_string(),
            },
            Column::RelativePath => match path.rfind('/') {
                Some(idx) => path[..=idx].to_string(),
                None => String::new(),
            },
            Column::Unknown => String::new(),
        }
    }

    /// Sum of the sizes of every file below `path`
    ///
    /// Directories contribute nothing themselves. A subtree that cannot be
    /// read is logged and counts as zero; descent stops only there.
    pub fn dir_size(&self, path: &Path) -> u64 {
        let entries = match self.fs.list_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Size descent failed");
                return 0;
            }
        };

        entries
            .iter()
            .map(|entry| {
                let child = path.join(&entry.name);
                match self.fs.metadata(&child) {
                    Ok(meta) if meta.is_dir() => self.dir_size(&child),
                    Ok(meta) => meta.size,
                    Err(e) => {
                        error!(path = %child.display(), error = %e, "Size descent failed");
                        0
                    }
                }
            })
            .sum()
    }
}

fn stat_value(metadata: &Metadata, field: StatField) -> String {
    match field {
        StatField::Ino => metadata.ino.to_string(),
        StatField::Mode => metadata.mode.to_string(),
        StatField::Uid => metadata.uid.to_string(),
        StatField::Gid => metadata.gid.to_string(),
        StatField::Size => metadata.size.to_string(),
        StatField::Atime => metadata.atime_secs().to_string(),
        StatField::Mtime => metadata.mtime_secs().to_string(),
        StatField::Ctime => metadata.ctime_secs().to_string(),
    }
}
