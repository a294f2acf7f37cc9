//! Output functions for consistent CLI formatting
//!
//! Status lines go to stderr so that stdout stays machine-readable
//! (jar paths, command lines, JSON).

use super::context::UiContext;
use console::style;

/// Display a success step
pub fn step_ok(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("✓").green(), message);
    } else {
        eprintln!("  {} {}", style("[OK]").green(), message);
    }
}

/// Display a warning step
pub fn step_warn(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("!").yellow(), message);
    } else {
        eprintln!("  {} {}", style("[WARN]").yellow(), message);
    }
}

/// Display a warning step with hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {} - {}", style("!").yellow(), message, style(hint).dim());
    } else {
        eprintln!("  {} {} - {}", style("[WARN]").yellow(), message, hint);
    }
}

/// Display an error step
pub fn step_error(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        eprintln!("{} {}", style("✗").red(), message);
    } else {
        eprintln!("  {} {}", style("[FAIL]").red(), message);
    }
}
