//! Fetch command - make sure the jar is cached and print its path

use super::provide_jar;
use crate::config::Config;
use crate::error::CsjarResult;
use crate::ui::{self, UiContext};

/// Execute the fetch command
pub async fn execute(config: &Config) -> CsjarResult<()> {
    let ctx = UiContext::detect();
    let artifact = provide_jar(config, &ctx).await?;

    if let Some(ref version) = artifact.version {
        ui::step_ok(
            &ctx,
            &format!("Checkstyle {} ({})", version, artifact.provenance),
        );
    }
    println!("{}", artifact.path.display());
    Ok(())
}
