//! Version resolution
//!
//! Turns a [`VersionRequest`] into a concrete [`Version`]. Resolving
//! `latest` costs one round trip to the Maven metadata index; the answer is
//! memoized in a [`ResolvedVersionCache`] shared by every resolver built
//! from it, so frequent lint runs pay that cost once per process.

use crate::error::{CsjarError, CsjarResult};
use crate::version::{Version, VersionRequest};
use std::io::Read;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Upper bound on the metadata document size
const METADATA_LIMIT: u64 = 4 * 1024 * 1024;

/// Process-wide memo of the resolved `latest` version.
///
/// Once set, the value is never replaced: the first successful resolution
/// wins even if the remote index later publishes a newer release. Failed
/// resolutions leave it unset.
#[derive(Debug, Default)]
pub struct ResolvedVersionCache {
    latest: Mutex<Option<Version>>,
}

impl ResolvedVersionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current memoized value, if any
    pub fn get(&self) -> Option<Version> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Return the memoized value, or run `resolve` and memoize its success.
    ///
    /// The lock is held across `resolve`, so concurrent first resolutions
    /// are serialized and only the first one reaches the network.
    pub fn get_or_try_resolve<F>(&self, resolve: F) -> CsjarResult<Version>
    where
        F: FnOnce() -> CsjarResult<Version>,
    {
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(version) = latest.as_ref() {
            debug!("Using memoized latest version {}", version);
            return Ok(version.clone());
        }

        let version = resolve()?;
        *latest = Some(version.clone());
        Ok(version)
    }
}

/// Resolves version requests against the remote metadata index
#[derive(Debug, Clone)]
pub struct VersionResolver {
    agent: ureq::Agent,
    metadata_url: String,
    memo: Arc<ResolvedVersionCache>,
}

impl VersionResolver {
    pub fn new(
        agent: ureq::Agent,
        metadata_url: impl Into<String>,
        memo: Arc<ResolvedVersionCache>,
    ) -> Self {
        Self {
            agent,
            metadata_url: metadata_url.into(),
            memo,
        }
    }

    /// Resolve `request` to a concrete version.
    ///
    /// Exact requests never touch the network. `latest` is served from the
    /// memo when possible.
    pub fn resolve(&self, request: &VersionRequest) -> CsjarResult<Version> {
        match request {
            VersionRequest::Exact(version) => Ok(version.clone()),
            VersionRequest::Latest => self.memo.get_or_try_resolve(|| self.fetch_latest()),
        }
    }

    fn fetch_latest(&self) -> CsjarResult<Version> {
        info!("Polling current Checkstyle version from {}", self.metadata_url);

        let document = self.fetch_metadata().inspect_err(|e| {
            warn!("{}", e);
        })?;
        let version = parse_latest_version(&document)
            .map_err(|reason| CsjarError::resolution(&self.metadata_url, reason))
            .inspect_err(|e| warn!("{}", e))?;

        info!("Latest Checkstyle version on Maven is {}", version);
        Ok(version)
    }

    fn fetch_metadata(&self) -> CsjarResult<String> {
        let mut response = self
            .agent
            .get(&self.metadata_url)
            .call()
            .map_err(|e| CsjarError::resolution(&self.metadata_url, e))?;

        let mut document = String::new();
        response
            .body_mut()
            .as_reader()
            .take(METADATA_LIMIT)
            .read_to_string(&mut document)
            .map_err(|e| CsjarError::resolution(&self.metadata_url, e))?;
        Ok(document)
    }
}

/// Extract the release version from a Maven metadata document.
///
/// The value is read by position: the text of the second element below the
/// third element below the root (`metadata/versioning/release` in the
/// published layout). Any other shape is an error.
pub fn parse_latest_version(document: &str) -> Result<Version, String> {
    let doc = roxmltree::Document::parse(document)
        .map_err(|e| format!("malformed metadata document: {}", e))?;

    let section = doc
        .root_element()
        .children()
        .filter(|node| node.is_element())
        .nth(2)
        .ok_or("metadata document has fewer than three top-level elements")?;

    let field = section
        .children()
        .filter(|node| node.is_element())
        .nth(1)
        .ok_or_else(|| {
            format!(
                "<{}> has fewer than two child elements",
                section.tag_name().name()
            )
        })?;

    let text = field
        .text()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| format!("<{}> is empty", field.tag_name().name()))?;

    Version::new(text).map_err(|e| e.to_string())
}
