//! Terminal presentation: status lines, download progress and event
//! rendering, with plain fallbacks for CI and non-interactive use.

mod context;
mod events;
mod output;
mod progress;

pub use context::UiContext;
pub use events::ConsoleEvents;
pub use output::{step_error, step_ok, step_warn, step_warn_hint};
pub use progress::{status_line, DownloadProgress};
