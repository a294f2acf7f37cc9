//! Structured diagnostics emitted by the pipeline
//!
//! The pipeline never talks to a terminal or an editor directly. It emits
//! [`Event`]s into an injected [`EventSink`] and the host decides how to
//! render them.

use std::fmt;
use std::sync::Mutex;

/// Severity of a pipeline event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        write!(f, "{}", name)
    }
}

/// A tagged diagnostic message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub level: Level,
    pub message: String,
}

impl Event {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Receiver of pipeline events. Implementations must not fail.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: Event);
}

impl<F> EventSink for F
where
    F: Fn(Event) + Send + Sync,
{
    fn emit(&self, event: Event) {
        self(event)
    }
}

/// Collects events in memory, for hosts that render after the fact
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<Event>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Events at `level`, in emission order
    pub fn at_level(&self, level: Level) -> Vec<Event> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: Event) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}
