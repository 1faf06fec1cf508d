//! gitgrade: repository quality grading CLI.
//!
//! Entry point and error handling boundary. Uses `anyhow` for
//! ergonomic error propagation and user-facing messages.

mod cli;

use gitgrade::config;
use gitgrade::constants;
use gitgrade::env;
use gitgrade::orchestrator;
use gitgrade::source;
use gitgrade::usage;

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::args::{AnalyzeArgs, Cli, Command, SnapshotArgs};
use config::Config;
use env::Env;
use orchestrator::{AssessmentOrchestrator, build_producers};
use source::{FileSource, GithubSource, RepositorySource};
use usage::{HttpCounter, InMemoryCounter, NoopCounter, UsageCounter};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let env = Env::real();

    init_tracing(cli.verbose, cli.debug, &env);

    match cli.command {
        Command::Analyze(args) => run_analyze(args, &env).await,
        Command::Snapshot(args) => run_snapshot(args, &env).await,
        Command::Version => run_version(),
    }
}

/// Install the stderr subscriber. `GITGRADE_LOG` overrides the flags.
fn init_tracing(verbose: bool, debug: bool, env: &Env) {
    let filter = cli::log_filter(verbose, debug, env.var(constants::ENV_LOG).ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Print version information.
fn run_version() -> Result<()> {
    use colored::Colorize;

    println!(
        "{} {}",
        constants::APP_NAME.bold(),
        constants::VERSION.green().bold()
    );
    Ok(())
}

fn load_config(env: &Env) -> Result<Config> {
    let cwd = std::env::current_dir().context("failed to get current directory")?;
    Config::load(Some(&cwd), env).context("failed to load configuration")
}

fn github_source(config: &Config) -> Result<GithubSource> {
    GithubSource::new(config.github.api_url.clone(), config.github.token.clone())
        .context("failed to create GitHub client")
}

/// Assess a repository and print the result.
async fn run_analyze(args: AnalyzeArgs, env: &Env) -> Result<()> {
    let config = load_config(env)?;

    let source: Box<dyn RepositorySource> = match &args.snapshot {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(github_source(&config)?),
    };

    let orchestrator = if args.offline {
        AssessmentOrchestrator::offline()
    } else {
        let timeout = args
            .timeout
            .unwrap_or(config.orchestrator.attempt_timeout_secs);
        AssessmentOrchestrator::new(build_producers(&config), Duration::from_secs(timeout))
    };

    if orchestrator.producers().is_empty() {
        cli::status("No AI producers available; using the heuristic engine.");
    } else {
        cli::status(&format!(
            "Assessing {} with {} producer(s)...",
            args.repo,
            orchestrator.producers().len()
        ));
    }

    let outcome = gitgrade::analyze(source.as_ref(), &orchestrator, &args.repo, args.persona())
        .await
        .with_context(|| format!("could not analyze '{}'", args.repo))?;

    let counter: Box<dyn UsageCounter> = match (&config.usage.url, config.usage.enabled) {
        _ if args.no_usage => Box::new(NoopCounter),
        (_, false) => Box::new(NoopCounter),
        (Some(url), true) => Box::new(HttpCounter::new(url.clone())),
        (None, true) => Box::new(InMemoryCounter::new()),
    };
    let pending = counter.increment(&outcome);

    println!("{}", args.format.render(&outcome));

    // Spawned tasks are cancelled when the runtime shuts down.
    if let Some(handle) = pending {
        let _ = tokio::time::timeout(usage::NOTIFY_TIMEOUT, handle).await;
    }
    Ok(())
}

/// Fetch a repository and print its snapshot as JSON.
///
/// The output can be fed back through `analyze --snapshot`.
async fn run_snapshot(args: SnapshotArgs, env: &Env) -> Result<()> {
    let config = load_config(env)?;
    let source = github_source(&config)?;
    let snapshot = source
        .fetch(&args.repo)
        .await
        .with_context(|| format!("could not fetch '{}'", args.repo))?;
    let json = serde_json::to_string_pretty(&snapshot).context("failed to serialize snapshot")?;
    println!("{json}");
    Ok(())
}
