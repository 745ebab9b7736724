/*!
 * Provider
 * URI-addressed file operations with status-code responses
 */

pub mod errors;
pub mod handles;
pub mod operations;
pub mod query;
pub mod types;

pub use errors::{ProviderError, ProviderResult};
pub use handles::HandleTable;
pub use operations::FileAccessExt;
pub use query::{Column, QueryEngine, StatField};
pub use types::{
    device_flag, document_flag, DeviceType, FileFilter, FileInfo, Response, RootInfo, StatusCode,
};
