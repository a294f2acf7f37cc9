//! Command command - print the Checkstyle invocation for a file

use super::{invocation, provide_jar};
use crate::cli::args::TargetArgs;
use crate::config::Config;
use crate::error::CsjarResult;
use crate::ui::UiContext;

/// Execute the command command
pub async fn execute(args: TargetArgs, config: &Config) -> CsjarResult<()> {
    let ctx = UiContext::detect();
    let artifact = provide_jar(config, &ctx).await?;
    let invocation = invocation(config, &artifact, &args.target, args.checks.as_deref());

    if args.json {
        println!("{}", serde_json::to_string(&invocation.argv())?);
    } else {
        println!("{}", invocation);
    }
    Ok(())
}
