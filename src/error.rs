//! Error types for csjar
//!
//! All modules use `CsjarResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for csjar operations
pub type CsjarResult<T> = Result<T, CsjarError>;

/// All errors that can occur in csjar
#[derive(Error, Debug)]
pub enum CsjarError {
    // Pipeline errors
    #[error("Latest Checkstyle version could not be fetched from {url}: {reason}")]
    Resolution { url: String, reason: String },

    #[error("Failed to download {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error(
        "Checkstyle version cannot be determined or downloaded, and no cached jar exists in {}",
        cache_dir.display()
    )]
    FallbackExhausted { cache_dir: PathBuf },

    #[error("Failed to remove cached entry {}: {source}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid Checkstyle version {0:?}")]
    InvalidVersion(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Checkstyle exited with code {0}")]
    ToolExited(i32),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CsjarError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a version resolution error
    pub fn resolution(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Resolution {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a download error
    pub fn fetch(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::Fetch {
            url: url.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Failures the pipeline recovers from by searching the cache
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Resolution { .. } | Self::Fetch { .. })
    }

    /// Failures that will repeat on every run until settings or the
    /// environment change, so callers should not retry them
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::FallbackExhausted { .. } | Self::InvalidVersion(_) | Self::ConfigInvalid { .. }
        )
    }

    /// Process exit code for this error. Exhausted fallback gets its own
    /// code so editor integrations can stop retrying.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::FallbackExhausted { .. } => 2,
            Self::ToolExited(code) => u8::try_from(*code).ok().filter(|c| *c != 0).unwrap_or(1),
            _ => 1,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::FallbackExhausted { .. } => {
                Some("Check the network connection and the configured Checkstyle version")
            }
            Self::InvalidVersion(_) => {
                Some("Use \"latest\" or a released version such as 10.12.4")
            }
            Self::CommandFailed { .. } => Some("Make sure java is installed and on PATH"),
            _ => None,
        }
    }
}
