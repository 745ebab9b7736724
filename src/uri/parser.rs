/*!
 * URI Parser
 * Structured `{scheme, authority, path}` view over provider URIs
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Separator between scheme and the rest of the URI
pub const SCHEME_SEPARATOR: &str = "://";

/// URI parse errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "error", content = "details")]
pub enum UriError {
    #[error("missing scheme separator")]
    MissingScheme,

    #[error("invalid scheme: {0:?}")]
    InvalidScheme(String),

    #[error("illegal character {0:?} in uri")]
    IllegalCharacter(char),
}

/// Parsed URI
///
/// `authority` is the routing segment between `scheme://` and the path. It is
/// only split off when more path follows it: `scheme://host` keeps `host` as
/// the path and leaves the authority empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uri {
    pub scheme: String,
    pub authority: String,
    pub path: String,
}

impl Uri {
    /// Strict parse used for validation
    ///
    /// The scheme must follow RFC 3986 (`ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`)
    /// and the URI must not contain whitespace or control characters.
    pub fn parse(raw: &str) -> Result<Self, UriError> {
        if let Some(c) = raw.chars().find(|c| c.is_whitespace() || c.is_control()) {
            return Err(UriError::IllegalCharacter(c));
        }

        let uri = Self::split(raw).ok_or(UriError::MissingScheme)?;

        let mut chars = uri.scheme.chars();
        let valid = match chars.next() {
            Some(first) if first.is_ascii_alphabetic() => {
                chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
            }
            _ => false,
        };
        if !valid {
            return Err(UriError::InvalidScheme(uri.scheme));
        }

        Ok(uri)
    }

    /// Lenient split on the first `://`; `None` when there is no scheme
    pub fn split(raw: &str) -> Option<Self> {
        let (scheme, rest) = raw.split_once(SCHEME_SEPARATOR)?;

        let (authority, path) = match rest.find('/') {
            Some(idx) if idx > 0 => (&rest[..idx], &rest[idx..]),
            _ => ("", rest),
        };

        Some(Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            path: path.to_string(),
        })
    }

    /// Everything after `scheme://`
    pub fn remainder(&self) -> String {
        format!("{}{}", self.authority, self.path)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}{}{}", self.scheme, SCHEME_SEPARATOR, self.authority, self.path)
    }
}

/// `^/([^/]+/?)+$`: one or more non-empty segments, optional trailing slash
pub fn is_segment_path(path: &str) -> bool {
    let Some(body) = path.strip_prefix('/') else {
        return false;
    };
    let body = body.strip_suffix('/').unwrap_or(body);
    !body.is_empty() && body.split('/').all(|segment| !segment.is_empty())
}
