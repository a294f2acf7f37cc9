//! csjar - Checkstyle jar provider
//!
//! Resolves which Checkstyle release to use, keeps its all-in-one jar in a
//! local cache, prunes superseded jars and falls back to whatever is cached
//! when the network is unavailable.

pub mod cache;
pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod fetch;
pub mod pipeline;
pub mod remote;
pub mod resolve;
pub mod ui;
pub mod version;

pub use error::{CsjarError, CsjarResult};
