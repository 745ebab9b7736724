/*!
 * Volume Management
 * Registry of removable volumes kept current by mount notifications
 */

pub mod bridge;
pub mod registry;
pub mod source;
pub mod types;

pub use bridge::EventBridge;
pub use registry::VolumeRegistry;
pub use source::{ChannelVolumeSource, DirectoryVolumeSource, VolumeSource};
pub use types::{
    volume_uri, VolumeDescriptor, VolumeError, VolumeEvent, VolumeFlags, VolumeInfo,
    VolumeResult, VolumeType,
};
