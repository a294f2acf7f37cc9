//! Download progress with CI fallback

use super::context::UiContext;
use crate::fetch::{Progress, ProgressSink};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::OnceLock;
use std::time::Duration;

/// Progress display for jar downloads.
///
/// Shows an indicatif bar in interactive mode and plain status lines in CI.
/// Nothing is drawn until the first report, so cache hits stay silent.
pub struct DownloadProgress {
    bar: OnceLock<ProgressBar>,
    interactive: bool,
}

impl DownloadProgress {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            bar: OnceLock::new(),
            interactive: ctx.use_fancy_output(),
        }
    }

    fn bar(&self, total: Option<u64>) -> &ProgressBar {
        self.bar.get_or_init(|| {
            let (bar, template) = match total {
                Some(total) => (
                    ProgressBar::new(total),
                    "  {spinner:.cyan} Downloading Checkstyle  {bar:20.cyan/dim} {bytes}/{total_bytes}  {elapsed:.dim}",
                ),
                None => (
                    ProgressBar::new_spinner(),
                    "  {spinner:.cyan} Downloading Checkstyle...  {bytes}  {elapsed:.dim}",
                ),
            };
            let style = ProgressStyle::default_bar()
                .template(template)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .progress_chars("━╸─");
            bar.set_style(style);
            bar.enable_steady_tick(Duration::from_millis(120));
            bar
        })
    }
}

impl ProgressSink for DownloadProgress {
    fn report(&self, progress: Progress) {
        if !self.interactive {
            eprintln!("{}", status_line(progress));
            return;
        }

        match progress {
            Progress::Bytes { finished, total } => {
                let bar = self.bar(Some(total));
                bar.set_length(total);
                bar.set_position(finished);
            }
            Progress::Indeterminate => {
                self.bar(None).tick();
            }
            Progress::Complete => {
                if let Some(bar) = self.bar.get() {
                    bar.disable_steady_tick();
                    bar.finish_and_clear();
                }
            }
        }
    }
}

/// Plain-text rendering of a progress report
pub fn status_line(progress: Progress) -> String {
    match (progress, progress.percent()) {
        (Progress::Complete, _) => "Downloading Checkstyle: done".to_string(),
        (_, Some(percent)) => format!("Downloading Checkstyle: {:.2}%", percent),
        (_, None) => "Downloading Checkstyle...".to_string(),
    }
}
