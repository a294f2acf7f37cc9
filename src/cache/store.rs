//! On-disk artifact store
//!
//! Maps versions to jar paths inside the single cache directory and answers
//! presence queries. Paths are a pure function of the version.

use crate::cache::janitor::CacheJanitor;
use crate::error::{CsjarError, CsjarResult};
use crate::fetch::is_partial;
use crate::remote::jar_file_name;
use crate::version::Version;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Namespace inside the platform cache area
pub const CACHE_NAMESPACE: &str = "csjar";

/// The jar cache directory
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open a store rooted at `dir`. Relative paths are made absolute so
    /// that every path handed out compares equal to directory listings.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        let dir = std::path::absolute(&dir).unwrap_or(dir);
        Self { dir }
    }

    /// Default cache directory: `<platform cache dir>/csjar/checkstyle`
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join(CACHE_NAMESPACE)
            .join("checkstyle")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the jar for `version` lives. No I/O.
    pub fn path_for(&self, version: &Version) -> PathBuf {
        self.dir.join(jar_file_name(version))
    }

    /// Whether the jar for `version` is present
    pub fn exists(&self, version: &Version) -> bool {
        self.path_for(version).is_file()
    }

    /// Every entry in the cache directory, ordered by file name. In-flight
    /// downloads are not listed.
    ///
    /// A missing directory is an empty cache, not an error.
    pub fn list_cached(&self) -> CsjarResult<Vec<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CsjarError::io(
                    format!("reading cache directory {}", self.dir.display()),
                    e,
                ))
            }
        };

        let mut names = entries
            .map(|entry| entry.map(|entry| entry.file_name()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CsjarError::io("reading cache entry", e))?;
        names.sort();

        let paths: Vec<PathBuf> = names
            .into_iter()
            .map(|name| self.dir.join(name))
            .filter(|path| !is_partial(path))
            .collect();
        debug!("Found {} cached entries in {}", paths.len(), self.dir.display());
        Ok(paths)
    }

    /// Create the cache directory and its parents if needed
    pub fn ensure_directory(&self) -> CsjarResult<()> {
        // create_dir_all succeeds when another process wins the race
        fs::create_dir_all(&self.dir).map_err(|e| {
            CsjarError::io(format!("creating directory {}", self.dir.display()), e)
        })
    }

    /// Janitor operating on this store's directory
    pub fn janitor(&self) -> CacheJanitor {
        CacheJanitor::new(self.dir.clone())
    }
}
