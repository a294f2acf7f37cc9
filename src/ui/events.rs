//! Terminal rendering of pipeline events

use super::context::UiContext;
use super::output::{step_error, step_warn};
use crate::events::{Event, EventSink, Level};
use tracing::info;

/// Shows warnings and errors on the terminal; info goes to the log
#[derive(Debug, Clone)]
pub struct ConsoleEvents {
    ctx: UiContext,
}

impl ConsoleEvents {
    pub fn new(ctx: UiContext) -> Self {
        Self { ctx }
    }
}

impl EventSink for ConsoleEvents {
    fn emit(&self, event: Event) {
        match event.level {
            Level::Info => info!("{}", event.message),
            Level::Warning => step_warn(&self.ctx, &event.message),
            Level::Error => step_error(&self.ctx, &event.message),
        }
    }
}
