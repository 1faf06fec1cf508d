//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

/// About line with ANSI styling for clap help output.
/// Bold "gitgrade", dimmed rest. (Static, used for --help only.)
pub const ABOUT_STYLED: &str =
    "\x1b[1mgitgrade\x1b[0m \x1b[2m· Repository quality grading with AI producers and a heuristic fallback.\x1b[0m";

/// Tracing filter for the given verbosity flags.
///
/// An explicit filter (from `GITGRADE_LOG`) always wins.
pub fn log_filter(verbose: bool, debug: bool, explicit: Option<String>) -> String {
    if let Some(filter) = explicit.filter(|f| !f.trim().is_empty()) {
        return filter;
    }
    let level = if debug {
        "debug"
    } else if verbose {
        "info"
    } else {
        "warn"
    };
    format!("gitgrade={level}")
}

/// Print a dimmed status line to stderr.
pub fn status(message: &str) {
    use colored::Colorize;
    eprintln!("  {} {}", "›".cyan().bold(), message.dimmed());
}
