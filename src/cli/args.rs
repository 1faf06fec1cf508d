//! Clap argument types and validation.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use gitgrade::models::Persona;
use gitgrade::orchestrator::AnalysisOutcome;

/// Grade a repository's engineering quality.
#[derive(Parser, Debug)]
#[command(
    name = "gitgrade",
    version = gitgrade::constants::VERSION,
    about = super::ABOUT_STYLED,
)]
pub struct Cli {
    /// Log producer attempts and acquisition steps.
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    /// Log everything, including skipped producers and HTTP requests.
    #[arg(long, global = true, default_value_t = false)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Assess a repository.
    Analyze(AnalyzeArgs),

    /// Fetch a repository and print its snapshot as JSON.
    Snapshot(SnapshotArgs),

    /// Print version information.
    Version,
}

/// Arguments for the `analyze` subcommand.
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Repository: owner/repo, github.com/owner/repo, or a GitHub URL.
    pub repo: String,

    /// Harsh, sarcastic tone. Scores are unaffected.
    #[arg(long, default_value_t = false)]
    pub roast: bool,

    /// Output format.
    #[arg(long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Skip AI producers and score with the built-in engine only.
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Assess a snapshot saved by `gitgrade snapshot` instead of fetching.
    #[arg(long, value_name = "FILE")]
    pub snapshot: Option<PathBuf>,

    /// Seconds allowed for each AI producer attempt.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Do not count this analysis.
    #[arg(long, default_value_t = false)]
    pub no_usage: bool,
}

impl AnalyzeArgs {
    pub fn persona(&self) -> Persona {
        Persona::from_roast_mode(self.roast)
    }
}

/// Arguments for the `snapshot` subcommand.
#[derive(Parser, Debug)]
pub struct SnapshotArgs {
    /// Repository: owner/repo, github.com/owner/repo, or a GitHub URL.
    pub repo: String,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Render the outcome using the renderer for this format.
    pub fn render(&self, outcome: &AnalysisOutcome) -> String {
        use gitgrade::output::OutputRenderer;
        match self {
            OutputFormat::Terminal => gitgrade::output::TerminalRenderer.render(outcome),
            OutputFormat::Json => gitgrade::output::JsonRenderer.render(outcome),
        }
    }
}
