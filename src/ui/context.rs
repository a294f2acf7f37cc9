//! UI context for detecting interactive vs CI environments

use std::io::IsTerminal;

/// UI context that determines output behavior
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether running in an interactive terminal
    interactive: bool,
}

impl UiContext {
    /// Detect the current environment
    pub fn detect() -> Self {
        Self {
            interactive: Self::detect_interactive(),
        }
    }

    /// Create a non-interactive context (for testing or explicit CI mode)
    pub fn non_interactive() -> Self {
        Self { interactive: false }
    }

    /// Check if we're in an interactive terminal
    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    /// Check if we should use fancy output (progress bars, symbols)
    pub fn use_fancy_output(&self) -> bool {
        self.interactive
    }

    /// Detect if running in an interactive environment
    fn detect_interactive() -> bool {
        // Status output goes to stderr; stdout may be piped into an editor
        if !std::io::stderr().is_terminal() {
            return false;
        }

        if std::env::var("CI").is_ok() {
            return false;
        }

        // Common CI environment indicators
        let ci_vars = [
            "GITHUB_ACTIONS",
            "GITLAB_CI",
            "CIRCLECI",
            "TRAVIS",
            "JENKINS_URL",
            "BUILDKITE",
            "TEAMCITY_VERSION",
            "TF_BUILD",
        ];

        !ci_vars.iter().any(|var| std::env::var(var).is_ok())
    }
}
