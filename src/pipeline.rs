//! Resolve, fetch and cache orchestration
//!
//! One [`Pipeline::run`] walks a small state machine:
//!
//! ```text
//! ResolvingVersion ──ok──▶ LocatingArtifact ──hit──▶ Ready
//!        │                       │ miss
//!        │ err                   ▼
//!        │                  Downloading ──ok──▶ CleaningUp ──▶ Ready
//!        ▼                       │ err
//!  FallbackSearch ◀──────────────┘
//!        ├─ any cached jar ────▶ Ready (degraded)
//!        └─ empty cache ───────▶ Failed
//! ```
//!
//! Resolution and download failures are absorbed by the fallback search.
//! Only an empty cache with no usable version escapes as
//! [`CsjarError::FallbackExhausted`].

use crate::cache::ArtifactStore;
use crate::config::Config;
use crate::error::{CsjarError, CsjarResult};
use crate::events::{Event, EventSink};
use crate::fetch::{Fetcher, ProgressSink};
use crate::remote::{artifact_url, version_from_file_name};
use crate::resolve::{ResolvedVersionCache, VersionResolver};
use crate::version::{Version, VersionRequest};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// How the artifact handed out by the pipeline was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Already cached for the resolved version
    Cached,
    /// Downloaded during this run
    Downloaded,
    /// Version could not be confirmed; an arbitrary cached jar is used
    Fallback,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cached => "cached",
            Self::Downloaded => "downloaded",
            Self::Fallback => "fallback",
        };
        write!(f, "{}", name)
    }
}

/// A jar that is ready to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    /// The resolved version, unknown in fallback mode
    pub version: Option<Version>,
    pub provenance: Provenance,
}

impl Artifact {
    /// Whether the jar could not be freshly verified
    pub fn is_degraded(&self) -> bool {
        self.provenance == Provenance::Fallback
    }
}

/// Pipeline states. Data needed by the next step travels inside the state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    ResolvingVersion,
    LocatingArtifact(Version),
    Downloading(Version),
    CleaningUp(Version),
    FallbackSearch,
    Ready(Artifact),
    Failed,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResolvingVersion => "resolving-version",
            Self::LocatingArtifact(_) => "locating-artifact",
            Self::Downloading(_) => "downloading",
            Self::CleaningUp(_) => "cleaning-up",
            Self::FallbackSearch => "fallback-search",
            Self::Ready(_) => "ready",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provides the Checkstyle jar for a version request
pub struct Pipeline {
    resolver: VersionResolver,
    store: ArtifactStore,
    fetcher: Fetcher,
    release_base_url: String,
    events: Arc<dyn EventSink>,
    fetch_lock: Mutex<()>,
}

impl Pipeline {
    pub fn new(
        resolver: VersionResolver,
        store: ArtifactStore,
        fetcher: Fetcher,
        release_base_url: impl Into<String>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            resolver,
            store,
            fetcher,
            release_base_url: release_base_url.into(),
            events,
            fetch_lock: Mutex::new(()),
        }
    }

    /// Wire a pipeline from configuration. `memo` should be shared by every
    /// pipeline in the process.
    pub fn from_config(
        config: &Config,
        memo: Arc<ResolvedVersionCache>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        let agent = ureq::Agent::new_with_defaults();
        Self::new(
            VersionResolver::new(agent.clone(), config.remote.metadata_url.clone(), memo),
            ArtifactStore::new(config.cache_dir()),
            Fetcher::new(agent),
            config.remote.release_base_url.clone(),
            events,
        )
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn resolver(&self) -> &VersionResolver {
        &self.resolver
    }

    /// Download URL for `version`
    pub fn url_for(&self, version: &Version) -> String {
        artifact_url(&self.release_base_url, version)
    }

    /// Run the state machine to completion.
    ///
    /// Returns the jar to use, or [`CsjarError::FallbackExhausted`] when no
    /// version could be resolved or downloaded and nothing is cached.
    pub fn run(
        &self,
        request: &VersionRequest,
        progress: &dyn ProgressSink,
    ) -> CsjarResult<Artifact> {
        let mut state = State::ResolvingVersion;
        // Held from the presence check until the run ends, so one process
        // never downloads the same jar twice concurrently.
        let mut fetch_guard: Option<MutexGuard<'_, ()>> = None;

        loop {
            debug!("Pipeline state: {}", state);
            state = match state {
                State::ResolvingVersion => match self.resolver.resolve(request) {
                    Ok(version) => {
                        self.events
                            .emit(Event::info(format!("Using Checkstyle {}", version)));
                        fetch_guard = Some(
                            self.fetch_lock
                                .lock()
                                .unwrap_or_else(|poisoned| poisoned.into_inner()),
                        );
                        State::LocatingArtifact(version)
                    }
                    Err(e) => {
                        warn!("Version resolution failed: {}", e);
                        State::FallbackSearch
                    }
                },

                State::LocatingArtifact(version) => {
                    if self.store.exists(&version) {
                        let path = self.store.path_for(&version);
                        self.events.emit(Event::info(format!(
                            "Using existing jar: {}",
                            path.display()
                        )));
                        State::Ready(Artifact {
                            path,
                            version: Some(version),
                            provenance: Provenance::Cached,
                        })
                    } else {
                        debug!("{} is not cached", self.store.path_for(&version).display());
                        State::Downloading(version)
                    }
                }

                State::Downloading(version) => match self.download(&version, progress) {
                    Ok(()) => State::CleaningUp(version),
                    Err(e) => {
                        warn!("Download failed: {}", e);
                        State::FallbackSearch
                    }
                },

                State::CleaningUp(version) => {
                    let path = self.store.path_for(&version);
                    let report = self.store.janitor().retain_only(&path);
                    for failure in &report.failed {
                        self.events.emit(Event::warning(failure.to_string()));
                    }
                    State::Ready(Artifact {
                        path,
                        version: Some(version),
                        provenance: Provenance::Downloaded,
                    })
                }

                State::FallbackSearch => self.fallback(),

                State::Ready(artifact) => {
                    drop(fetch_guard);
                    return Ok(artifact);
                }

                State::Failed => {
                    drop(fetch_guard);
                    return Err(CsjarError::FallbackExhausted {
                        cache_dir: self.store.dir().to_path_buf(),
                    });
                }
            };
        }
    }

    fn download(&self, version: &Version, progress: &dyn ProgressSink) -> CsjarResult<()> {
        self.store.ensure_directory()?;

        let url = self.url_for(version);
        let path = self.store.path_for(version);
        self.fetcher.download(&url, &path, progress).map(|_| ())
    }

    fn fallback(&self) -> State {
        let cached = match self.store.list_cached() {
            Ok(cached) => cached,
            Err(e) => {
                warn!("Cannot search cache: {}", e);
                Vec::new()
            }
        };

        // Named jars first; any other file only as a last resort
        let candidate = cached
            .iter()
            .find(|path| is_jar_name(path) && path.is_file())
            .or_else(|| cached.iter().find(|path| path.is_file()))
            .cloned();

        match candidate {
            Some(path) => {
                self.events.emit(Event::warning(format!(
                    "Checkstyle version cannot be determined or downloaded. Using existing jar {}",
                    path.display()
                )));
                State::Ready(Artifact {
                    path,
                    version: None,
                    provenance: Provenance::Fallback,
                })
            }
            None => {
                self.events.emit(Event::error(format!(
                    "Checkstyle version cannot be determined or downloaded and {} holds no jar. \
                     Check version setting and network connection",
                    self.store.dir().display()
                )));
                State::Failed
            }
        }
    }
}

fn is_jar_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(version_from_file_name)
        .is_some()
}
