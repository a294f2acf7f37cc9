//! Best-effort removal of superseded jars
//!
//! Deletion failures are logged and skipped: a jar held open by a running
//! Checkstyle process must not abort the rest of the cleanup.

use crate::error::CsjarError;
use crate::fetch::is_partial;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// In-flight downloads younger than this belong to a live process
const STALE_PARTIAL_AGE: Duration = Duration::from_secs(60 * 60);

/// Outcome of a cleanup pass
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Entries that were deleted
    pub removed: Vec<PathBuf>,
    /// Entries that could not be deleted
    pub failed: Vec<CsjarError>,
}

impl CleanupReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Removes cache entries
#[derive(Debug, Clone)]
pub struct CacheJanitor {
    dir: PathBuf,
}

impl CacheJanitor {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Delete every entry in the cache directory except `keep` and
    /// downloads still in progress in other processes
    pub fn retain_only(&self, keep: &Path) -> CleanupReport {
        self.remove_where(|path| path != keep && !is_live_partial(path))
    }

    /// Delete every entry in the cache directory
    pub fn clear(&self) -> CleanupReport {
        self.remove_where(|_| true)
    }

    fn remove_where(&self, doomed: impl Fn(&Path) -> bool) -> CleanupReport {
        let mut report = CleanupReport::default();

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return report,
            Err(e) => {
                warn!("Cannot list {}: {}", self.dir.display(), e);
                report.failed.push(CsjarError::Cleanup {
                    path: self.dir.clone(),
                    source: e,
                });
                return report;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Cannot read entry in {}: {}", self.dir.display(), e);
                    continue;
                }
            };

            let path = self.dir.join(entry.file_name());
            if !doomed(&path) {
                continue;
            }

            info!("Removing old jar: {}", path.display());
            match remove_entry(&path) {
                Ok(()) => report.removed.push(path),
                // Already gone, e.g. removed by a concurrent cleanup
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    warn!("Failed to remove {}: {}", path.display(), e);
                    report.failed.push(CsjarError::Cleanup { path, source: e });
                }
            }
        }

        report
    }
}

fn is_live_partial(path: &Path) -> bool {
    if !is_partial(path) {
        return false;
    }
    let live = fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|age| age < STALE_PARTIAL_AGE);
    if live {
        debug!("Leaving in-flight download {}", path.display());
    }
    live
}

fn remove_entry(path: &Path) -> std::io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}
