/*!
 * File Access Extension Library
 * URI-addressed file operations over local storage and removable volumes
 */

pub mod config;
pub mod core;
pub mod monitoring;
pub mod provider;
pub mod uri;
pub mod vfs;
pub mod volume;

// Re-exports
pub use config::ProviderConfig;
pub use monitoring::{init_tracing, init_tracing_with, OperationSpan};
pub use provider::{
    FileAccessExt, FileFilter, FileInfo, ProviderError, ProviderResult, Response, RootInfo,
};
pub use uri::{Uri, UriError, UriTranslator};
pub use vfs::{FileSystem, LocalFS, MemFS, VfsError, VfsResult};
pub use volume::{
    ChannelVolumeSource, DirectoryVolumeSource, EventBridge, VolumeEvent, VolumeInfo,
    VolumeRegistry, VolumeSource,
};
