/*!
 * URI Translator
 * Validation and URI <-> filesystem path conversion
 */

use tracing::error;

use super::parser::{is_segment_path, Uri, SCHEME_SEPARATOR};
use crate::core::limits::{DEFAULT_BUNDLE_NAME, FILE_SCHEME, PROVIDER_SCHEME};

/// Stateless URI algebra parameterised by the application bundle name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriTranslator {
    bundle_name: String,
}

impl UriTranslator {
    pub fn new(bundle_name: impl Into<String>) -> Self {
        Self {
            bundle_name: bundle_name.into(),
        }
    }

    pub fn bundle_name(&self) -> &str {
        &self.bundle_name
    }

    /// Accept `file` URIs and well-formed provider URIs
    ///
    /// Parse failures are logged and reported as `false`.
    pub fn validate(&self, raw: &str) -> bool {
        match Uri::parse(raw) {
            Ok(uri) if uri.scheme == FILE_SCHEME => true,
            Ok(uri) if uri.scheme == PROVIDER_SCHEME => is_segment_path(&uri.remainder()),
            Ok(uri) => {
                error!(uri = raw, scheme = %uri.scheme, "Unsupported uri scheme");
                false
            }
            Err(e) => {
                error!(uri = raw, error = %e, "Malformed uri");
                false
            }
        }
    }

    /// Filesystem path addressed by a URI
    ///
    /// Strips `scheme://`, the routing authority, the first bundle-name
    /// segment and one trailing `/`. Input without a scheme is returned as is.
    pub fn to_path(&self, raw: &str) -> String {
        let Some(uri) = Uri::split(raw) else {
            return raw.to_string();
        };

        let mut path = strip_segment(&uri.path, &self.bundle_name);
        if path.ends_with('/') {
            path.pop();
        }
        path
    }

    /// Provider URI addressing `path`; inverse of [`UriTranslator::to_path`]
    pub fn provider_uri(&self, path: &str) -> String {
        format!("{}{}{}", PROVIDER_SCHEME, SCHEME_SEPARATOR, path)
    }

    /// `parent/name`, without doubling an existing trailing separator
    pub fn child_uri(parent: &str, name: &str) -> String {
        if parent.ends_with('/') {
            format!("{}{}", parent, name)
        } else {
            format!("{}/{}", parent, name)
        }
    }

    /// Last segment of a path or URI; one trailing `/` is skipped
    pub fn file_name(path: &str) -> &str {
        let trimmed = path.strip_suffix('/').unwrap_or(path);
        match trimmed.rfind('/') {
            Some(idx) => &trimmed[idx + 1..],
            None => trimmed,
        }
    }

    /// Replace the last segment with `new_name`, keeping a trailing `/`
    pub fn renamed_uri(raw: &str, new_name: &str) -> String {
        let (trimmed, trailing) = match raw.strip_suffix('/') {
            Some(trimmed) => (trimmed, "/"),
            None => (raw, ""),
        };
        let parent = match trimmed.rfind('/') {
            Some(idx) => &trimmed[..=idx],
            None => "",
        };
        format!("{}{}{}", parent, new_name, trailing)
    }
}

impl Default for UriTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_BUNDLE_NAME)
    }
}

/// Remove the first whole `/segment` occurrence from `path`
fn strip_segment(path: &str, segment: &str) -> String {
    if segment.is_empty() {
        return path.to_string();
    }

    let needle = format!("/{}", segment);
    let mut from = 0;
    while let Some(pos) = path[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        if end == path.len() || path.as_bytes()[end] == b'/' {
            return format!("{}{}", &path[..start], &path[end..]);
        }
        from = start + 1;
    }
    path.to_string()
}
