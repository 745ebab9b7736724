/*!
 * URI Module
 * Provider URI parsing and translation to filesystem paths
 */

pub mod parser;
pub mod translator;

pub use parser::{is_segment_path, Uri, UriError};
pub use translator::UriTranslator;
