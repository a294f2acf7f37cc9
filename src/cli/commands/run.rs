//! Run command - run Checkstyle on a file

use super::{invocation, provide_jar};
use crate::cli::args::RunArgs;
use crate::config::Config;
use crate::error::{CsjarError, CsjarResult};
use crate::ui::UiContext;
use tracing::{debug, info};

/// Execute the run command
pub async fn execute(args: RunArgs, config: &Config) -> CsjarResult<()> {
    let ctx = UiContext::detect();
    let artifact = provide_jar(config, &ctx).await?;
    let invocation = invocation(config, &artifact, &args.target, args.checks.as_deref());

    info!(
        "Using checkstyle config: {}",
        args.checks.as_deref().unwrap_or(&config.checkstyle.config)
    );
    debug!("Running: {}", invocation);

    let status = invocation
        .to_command()
        .status()
        .await
        .map_err(|e| CsjarError::command_failed(invocation.to_string(), e))?;

    match status.code() {
        Some(0) => Ok(()),
        Some(code) => Err(CsjarError::ToolExited(code)),
        None => Err(CsjarError::Internal("Checkstyle terminated by signal".to_string())),
    }
}
