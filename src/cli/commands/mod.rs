//! CLI command implementations

pub mod cache;
pub mod command;
pub mod config;
pub mod fetch;
pub mod resolve;
pub mod run;

pub use cache::execute as cache;
pub use command::execute as command;
pub use config::execute as config;
pub use fetch::execute as fetch;
pub use resolve::execute as resolve;
pub use run::execute as run;

use crate::command::Invocation;
use crate::config::Config;
use crate::error::{CsjarError, CsjarResult};
use crate::pipeline::{Artifact, Pipeline};
use crate::resolve::ResolvedVersionCache;
use crate::ui::{ConsoleEvents, DownloadProgress, UiContext};
use crate::version::VersionRequest;
use std::sync::Arc;

/// Pipeline wired to the terminal
pub(crate) fn pipeline(config: &Config, ctx: &UiContext) -> Pipeline {
    Pipeline::from_config(
        config,
        Arc::new(ResolvedVersionCache::new()),
        Arc::new(ConsoleEvents::new(ctx.clone())),
    )
}

/// Run the pipeline for the configured version on a blocking worker
pub(crate) async fn provide_jar(config: &Config, ctx: &UiContext) -> CsjarResult<Artifact> {
    let request = VersionRequest::parse(&config.checkstyle.version)?;
    let pipeline = pipeline(config, ctx);
    let progress = DownloadProgress::new(ctx);

    tokio::task::spawn_blocking(move || pipeline.run(&request, &progress))
        .await
        .map_err(|e| CsjarError::Internal(format!("jar provisioning task failed: {}", e)))?
}

/// Checkstyle invocation for `target` using the configured runtime
pub(crate) fn invocation(
    config: &Config,
    artifact: &Artifact,
    target: &str,
    checks: Option<&str>,
) -> Invocation {
    Invocation::checkstyle(
        &config.runtime.java,
        &artifact.path,
        checks.unwrap_or(&config.checkstyle.config),
        target,
    )
}
