//! Checkstyle version identifiers
//!
//! A [`Version`] is an opaque release token. It has no structure beyond
//! equality; it only ends up in a file name and a download URL.

use crate::error::{CsjarError, CsjarResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel that asks for the newest published release
pub const LATEST: &str = "latest";

/// A concrete Checkstyle release, e.g. `10.12.4`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    /// Validate and wrap a concrete version string.
    ///
    /// The token is interpolated into a path and a URL, so empty strings,
    /// whitespace and path separators are rejected.
    pub fn new(raw: impl Into<String>) -> CsjarResult<Self> {
        let raw = raw.into();
        let valid = !raw.is_empty()
            && raw != "."
            && raw != ".."
            && !raw
                .chars()
                .any(|c| c.is_whitespace() || c == '/' || c == '\\' || c.is_control());
        if valid {
            Ok(Self(raw))
        } else {
            Err(CsjarError::InvalidVersion(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// What the configuration asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionRequest {
    /// Resolve the newest release from the metadata index
    Latest,
    /// Use this release as-is
    Exact(Version),
}

impl VersionRequest {
    /// Parse a configured version string. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> CsjarResult<Self> {
        let raw = raw.trim();
        if raw == LATEST {
            Ok(Self::Latest)
        } else {
            Version::new(raw).map(Self::Exact)
        }
    }
}

impl fmt::Display for VersionRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => f.write_str(LATEST),
            Self::Exact(version) => version.fmt(f),
        }
    }
}
