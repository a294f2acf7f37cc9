//! Artifact download with progress reporting
//!
//! When the server announces a content length the body is streamed to disk
//! in fixed-size chunks and progress is reported at most once per second.
//! Without a length the body is buffered and written in one go.
//!
//! Bodies are written to a sibling `<name>.<tag>.part` file and renamed into
//! place once complete, so the final path only ever holds a whole jar.

use crate::error::{CsjarError, CsjarResult};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Bytes read from the network per write
const CHUNK_SIZE: usize = 8 * 1024;

/// Minimum spacing between two byte-progress reports
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Suffix of in-flight downloads
pub const PARTIAL_SUFFIX: &str = ".part";

static PARTIAL_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Unique in-flight path next to `destination`, distinct across processes
/// and across downloads within one process
pub fn partial_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tag = format!(
        "{}-{}",
        std::process::id(),
        PARTIAL_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    destination.with_file_name(format!("{}.{}{}", name, tag, PARTIAL_SUFFIX))
}

/// Whether `path` names an in-flight download
pub fn is_partial(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|n| n.to_string_lossy().ends_with(PARTIAL_SUFFIX))
}

/// Download progress signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// `finished` of `total` bytes written
    Bytes { finished: u64, total: u64 },
    /// Body size unknown
    Indeterminate,
    /// File fully written
    Complete,
}

impl Progress {
    /// Completed percentage, when known
    pub fn percent(&self) -> Option<f64> {
        match *self {
            Self::Bytes { total: 0, .. } => None,
            Self::Bytes { finished, total } => Some(finished as f64 * 100.0 / total as f64),
            Self::Indeterminate => None,
            Self::Complete => Some(100.0),
        }
    }
}

/// Receiver of download progress. Reporting cannot fail.
pub trait ProgressSink: Send + Sync {
    fn report(&self, progress: Progress);
}

impl<F> ProgressSink for F
where
    F: Fn(Progress) + Send + Sync,
{
    fn report(&self, progress: Progress) {
        self(progress)
    }
}

/// Discards progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _progress: Progress) {}
}

/// Downloads jars over HTTP(S)
#[derive(Debug, Clone)]
pub struct Fetcher {
    agent: ureq::Agent,
}

impl Fetcher {
    pub fn new(agent: ureq::Agent) -> Self {
        Self { agent }
    }

    /// Download `url` into `destination`, replacing any existing file.
    ///
    /// `destination` is untouched on error.
    pub fn download(
        &self,
        url: &str,
        destination: &Path,
        progress: &dyn ProgressSink,
    ) -> CsjarResult<u64> {
        info!("Downloading from {}", url);

        let mut response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| CsjarError::fetch(url, e))?;
        let total = response.body().content_length();
        debug!("Content length of {}: {:?}", url, total);

        let reader = response.body_mut().as_reader();
        let written =
            write_body(reader, total, destination, progress).map_err(|e| CsjarError::fetch(url, e))?;

        info!("Downloaded {} bytes to {}", written, destination.display());
        Ok(written)
    }
}

/// Copy `body` into `destination`, reporting progress along the way.
///
/// The body goes to a partial file first and is renamed over `destination`
/// once complete. On error the partial file is removed and `destination`
/// keeps whatever it held before. Returns the number of bytes written.
pub fn write_body(
    body: impl Read,
    total: Option<u64>,
    destination: &Path,
    progress: &dyn ProgressSink,
) -> io::Result<u64> {
    let partial = partial_path(destination);
    debug!("Writing to {}", partial.display());

    let result = write_partial(body, total, &partial, progress)
        .and_then(|written| fs::rename(&partial, destination).map(|()| written));

    if result.is_err() {
        if let Err(e) = fs::remove_file(&partial) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Could not remove partial download {}: {}", partial.display(), e);
            }
        }
    }
    result
}

fn write_partial(
    mut body: impl Read,
    total: Option<u64>,
    partial: &Path,
    progress: &dyn ProgressSink,
) -> io::Result<u64> {
    let mut file = File::create(partial)?;

    let written = match total {
        Some(total) => stream_chunks(&mut body, &mut file, total, progress)?,
        None => {
            let mut buffer = Vec::new();
            body.read_to_end(&mut buffer)?;
            file.write_all(&buffer)?;
            progress.report(Progress::Indeterminate);
            buffer.len() as u64
        }
    };

    file.flush()?;
    file.sync_all()?;
    progress.report(Progress::Complete);
    Ok(written)
}

fn stream_chunks(
    body: &mut impl Read,
    file: &mut File,
    total: u64,
    progress: &dyn ProgressSink,
) -> io::Result<u64> {
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut finished: u64 = 0;
    let mut last_report: Option<Instant> = None;

    loop {
        let read = match body.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        file.write_all(&buffer[..read])?;
        finished += read as u64;

        let due = last_report.is_none_or(|at| at.elapsed() >= REPORT_INTERVAL);
        if due {
            progress.report(Progress::Bytes {
                finished: finished.min(total),
                total,
            });
            last_report = Some(Instant::now());
        }
    }

    if finished < total {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("body ended after {} of {} bytes", finished, total),
        ));
    }
    Ok(finished)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use std::sync::Mutex;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct Recorder(Mutex<Vec<Progress>>);

    impl ProgressSink for Recorder {
        fn report(&self, progress: Progress) {
            self.0.lock().unwrap().push(progress);
        }
    }

    impl Recorder {
        fn seen(&self) -> Vec<Progress> {
            self.0.lock().unwrap().clone()
        }
    }

    #[test]
    fn known_length_reports_monotonic_progress() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.jar");
        let payload = vec![7u8; CHUNK_SIZE * 5 + 13];
        let recorder = Recorder::default();

        let written = write_body(
            Cursor::new(payload.clone()),
            Some(payload.len() as u64),
            &dest,
            &recorder,
        )
        .unwrap();

        assert_eq!(written, payload.len() as u64);
        assert_eq!(fs::read(&dest).unwrap(), payload);

        let seen = recorder.seen();
        assert_eq!(seen.last(), Some(&Progress::Complete));
        assert!(matches!(seen.first(), Some(Progress::Bytes { .. })));

        let mut previous = 0;
        for progress in &seen[..seen.len() - 1] {
            match *progress {
                Progress::Bytes { finished, total } => {
                    assert_eq!(total, payload.len() as u64);
                    assert!(finished >= previous);
                    assert!(finished <= total);
                    previous = finished;
                }
                other => panic!("unexpected progress {other:?}"),
            }
        }
    }

    #[test]
    fn reports_are_rate_limited() {
        let temp = TempDir::new().unwrap();
        let payload = vec![1u8; CHUNK_SIZE * 64];
        let recorder = Recorder::default();

        write_body(
            Cursor::new(payload.clone()),
            Some(payload.len() as u64),
            &temp.path().join("out.jar"),
            &recorder,
        )
        .unwrap();

        // An in-memory copy finishes well within one interval
        let bytes_reports = recorder
            .seen()
            .iter()
            .filter(|p| matches!(p, Progress::Bytes { .. }))
            .count();
        assert_eq!(bytes_reports, 1);
    }

    #[test]
    fn unknown_length_is_buffered() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.jar");
        let recorder = Recorder::default();

        let written = write_body(Cursor::new(b"abcdef".to_vec()), None, &dest, &recorder).unwrap();

        assert_eq!(written, 6);
        assert_eq!(fs::read(&dest).unwrap(), b"abcdef");
        assert_eq!(
            recorder.seen(),
            vec![Progress::Indeterminate, Progress::Complete]
        );
    }

    #[test]
    fn existing_file_is_overwritten() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.jar");
        fs::write(&dest, vec![0u8; 1024]).unwrap();

        write_body(Cursor::new(b"new".to_vec()), Some(3), &dest, &NoProgress).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), b"new");
    }

    /// Serves `served` bytes, then fails like a dropped connection
    struct DroppedConnection {
        served: usize,
    }

    impl Read for DroppedConnection {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served == 0 {
                return Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
            }
            let n = self.served.min(buf.len());
            buf[..n].fill(9);
            self.served -= n;
            Ok(n)
        }
    }

    fn entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn dropped_connection_never_exposes_destination() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("checkstyle-10.12.4-all.jar");

        let err = write_body(DroppedConnection { served: 50 }, Some(100), &dest, &NoProgress)
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert!(!dest.exists());
        assert!(entries(temp.path()).is_empty());
    }

    #[test]
    fn failed_write_keeps_previous_jar() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("checkstyle-10.12.4-all.jar");
        fs::write(&dest, b"complete jar").unwrap();

        write_body(DroppedConnection { served: 4 }, None, &dest, &NoProgress).unwrap_err();

        assert_eq!(fs::read(&dest).unwrap(), b"complete jar");
        assert_eq!(entries(temp.path()), vec!["checkstyle-10.12.4-all.jar"]);
    }

    #[test]
    fn short_body_is_an_error() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.jar");

        let err = write_body(Cursor::new(vec![1u8; 50]), Some(100), &dest, &NoProgress)
            .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert!(!dest.exists());
        assert!(entries(temp.path()).is_empty());
    }

    #[test]
    fn partial_paths_are_unique_siblings() {
        let dest = Path::new("/cache/checkstyle-1.0-all.jar");
        let first = partial_path(dest);
        let second = partial_path(dest);

        assert_ne!(first, second);
        assert_eq!(first.parent(), dest.parent());
        assert!(is_partial(&first));
        assert!(!is_partial(dest));
        assert!(first
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("checkstyle-1.0-all.jar."));
    }

    #[test]
    fn empty_body_still_completes() {
        let temp = TempDir::new().unwrap();
        let recorder = Recorder::default();
        write_body(Cursor::new(Vec::new()), Some(0), &temp.path().join("e"), &recorder).unwrap();
        assert_eq!(recorder.seen(), vec![Progress::Complete]);
    }

    #[test]
    fn percent_of_progress() {
        assert_eq!(
            Progress::Bytes { finished: 25, total: 50 }.percent(),
            Some(50.0)
        );
        assert_eq!(Progress::Bytes { finished: 0, total: 0 }.percent(), None);
        assert_eq!(Progress::Indeterminate.percent(), None);
        assert_eq!(Progress::Complete.percent(), Some(100.0));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn download_writes_served_payload() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/checkstyle-10.12.4/checkstyle-10.12.4-all.jar"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![42u8; 50]))
            .expect(1)
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("checkstyle-10.12.4-all.jar");
        let url = format!(
            "{}/checkstyle-10.12.4/checkstyle-10.12.4-all.jar",
            server.uri()
        );

        let (written, seen) = {
            let dest = dest.clone();
            tokio::task::spawn_blocking(move || {
                let recorder = Recorder::default();
                let written = Fetcher::new(ureq::Agent::new_with_defaults())
                    .download(&url, &dest, &recorder)
                    .unwrap();
                (written, recorder.seen())
            })
            .await
            .unwrap()
        };

        assert_eq!(written, 50);
        assert_eq!(fs::read(&dest).unwrap(), vec![42u8; 50]);
        assert_eq!(seen.last(), Some(&Progress::Complete));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn download_fails_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("missing.jar");
        let url = format!("{}/nope.jar", server.uri());

        let result = {
            let dest = dest.clone();
            tokio::task::spawn_blocking(move || {
                Fetcher::new(ureq::Agent::new_with_defaults()).download(&url, &dest, &NoProgress)
            })
            .await
            .unwrap()
        };

        assert!(matches!(result, Err(CsjarError::Fetch { .. })));
        assert!(!dest.exists());
    }
}
