//! Resolve command - print the concrete Checkstyle version

use super::pipeline;
use crate::config::Config;
use crate::error::{CsjarError, CsjarResult};
use crate::ui::UiContext;
use crate::version::VersionRequest;

/// Execute the resolve command
pub async fn execute(config: &Config) -> CsjarResult<()> {
    let request = VersionRequest::parse(&config.checkstyle.version)?;
    let pipeline = pipeline(config, &UiContext::detect());

    let version = tokio::task::spawn_blocking(move || pipeline.resolver().resolve(&request))
        .await
        .map_err(|e| CsjarError::Internal(format!("resolution task failed: {}", e)))??;

    println!("{}", version);
    Ok(())
}
