/*!
 * Virtual File System Module
 * Filesystem capability and its backends
 */

pub mod local;
pub mod memory;
pub mod traits;
pub mod types;

// Re-exports
pub use local::LocalFS;
pub use memory::MemFS;
pub use traits::{move_recursive, FileSystem, OpenFile};
pub use types::{posix, Entry, FileType, Metadata, MoveMode, OpenFlags, VfsError, VfsResult};
