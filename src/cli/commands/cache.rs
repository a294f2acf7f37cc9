//! Cache command - inspect and prune the jar cache

use super::pipeline;
use crate::cache::{ArtifactStore, CleanupReport};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::config::Config;
use crate::error::{CsjarError, CsjarResult};
use crate::remote::version_from_file_name;
use crate::ui::{self, UiContext};
use crate::version::VersionRequest;
use console::style;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;

/// A cached entry as shown by `cache list`
#[derive(Debug, Serialize)]
struct CachedJar {
    name: String,
    version: Option<String>,
    size_bytes: u64,
    path: String,
}

impl CachedJar {
    fn inspect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let size_bytes = path.metadata().map(|m| m.len()).unwrap_or(0);
        Self {
            version: version_from_file_name(&name).map(str::to_string),
            name,
            size_bytes,
            path: path.display().to_string(),
        }
    }
}

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> CsjarResult<()> {
    let store = ArtifactStore::new(config.cache_dir());

    match args.action {
        CacheAction::List { format } => list_jars(&store, format),
        CacheAction::Path => {
            println!("{}", store.dir().display());
            Ok(())
        }
        CacheAction::Clean => clean_jars(config).await,
        CacheAction::Clear { yes } => clear_jars(&store, yes),
    }
}

fn list_jars(store: &ArtifactStore, format: OutputFormat) -> CsjarResult<()> {
    let jars: Vec<CachedJar> = store
        .list_cached()?
        .iter()
        .map(|path| CachedJar::inspect(path))
        .collect();

    match format {
        OutputFormat::Table => print_jar_table(store, &jars),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&jars)?),
        OutputFormat::Plain => {
            for jar in &jars {
                println!("{}", jar.path);
            }
        }
    }

    Ok(())
}

fn print_jar_table(store: &ArtifactStore, jars: &[CachedJar]) {
    if jars.is_empty() {
        println!("No cached jars in {}", store.dir().display());
        return;
    }

    println!("{:<36} {:<12} {:>12}", "FILE", "VERSION", "SIZE");
    println!("{}", "-".repeat(62));

    for jar in jars {
        let version = match jar.version {
            Some(ref v) => v.clone(),
            None => style("unknown").dim().to_string(),
        };
        println!(
            "{:<36} {:<12} {:>12}",
            jar.name,
            version,
            format_bytes(jar.size_bytes)
        );
    }

    println!();
    println!("Total: {}", entries_label(jars.len()));
}

/// Keep only the jar for the configured version
async fn clean_jars(config: &Config) -> CsjarResult<()> {
    let ctx = UiContext::detect();
    let request = VersionRequest::parse(&config.checkstyle.version)?;
    let pipeline = pipeline(config, &ctx);

    let (keep, report) = tokio::task::spawn_blocking(move || -> CsjarResult<_> {
        let version = pipeline.resolver().resolve(&request)?;
        let store = pipeline.store();
        let keep = store.path_for(&version);
        if !store.exists(&version) {
            return Ok((keep, None));
        }
        let report = store.janitor().retain_only(&keep);
        Ok((keep, Some(report)))
    })
    .await
    .map_err(|e| CsjarError::Internal(format!("cleanup task failed: {}", e)))??;

    match report {
        Some(report) => summarize(&ctx, &report),
        None => ui::step_warn_hint(
            &ctx,
            &format!("{} is not cached, nothing removed", keep.display()),
            "Run: csjar fetch",
        ),
    }

    Ok(())
}

fn clear_jars(store: &ArtifactStore, skip_confirm: bool) -> CsjarResult<()> {
    let ctx = UiContext::detect();
    let entries = store.list_cached()?;

    if entries.is_empty() {
        // Leftover partial downloads are not listed but still go
        store.janitor().clear();
        ui::step_ok(&ctx, "No cached jars to clear");
        return Ok(());
    }

    println!("This will remove {}:", entries_label(entries.len()));
    for path in &entries {
        println!("  {} {}", style("•").red(), path.display());
    }
    println!();

    if !skip_confirm {
        print!("Are you sure? [y/N] ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        if io::stdin().read_line(&mut input).is_err() {
            println!("Failed to read input, aborting.");
            return Ok(());
        }

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    summarize(&ctx, &store.janitor().clear());
    Ok(())
}

fn summarize(ctx: &UiContext, report: &CleanupReport) {
    for failure in &report.failed {
        ui::step_warn(ctx, &failure.to_string());
    }
    ui::step_ok(ctx, &format!("Removed {}", entries_label(report.removed.len())));
}

fn entries_label(count: usize) -> String {
    if count == 1 {
        "1 cached entry".to_string()
    } else {
        format!("{} cached entries", count)
    }
}

/// Format bytes as human-readable size (e.g., "10.5 MB")
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
