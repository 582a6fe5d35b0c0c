mod config;
mod context;
mod input;
mod models;
mod paths;
mod reporter;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use config::Config;
use context::ReportContext;
use reporter::{GithubReporter, Reporter};
use summary::sink::SUMMARY_ENV_VAR;
use summary::{FileSink, StdoutSink, SummarySink};

/// Render Jest results into the GitHub Actions job summary.
#[derive(Debug, Parser)]
#[command(name = "test-summary", version)]
struct Cli {
    /// Jest JSON result files or glob patterns; shards are merged in order.
    #[arg(required = true)]
    results: Vec<String>,

    /// Project root that file paths are shown relative to.
    #[arg(long, default_value = ".")]
    root_dir: PathBuf,

    /// Settings file (default: <root-dir>/test-summary.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write here instead of $GITHUB_STEP_SUMMARY ("-" for stdout).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Replace the summary file instead of appending to it.
    #[arg(long)]
    overwrite: bool,

    /// Render even when not running under CI.
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let cli = Cli::parse();
    run(cli, |key| std::env::var(key).ok()).await
}

/// Drive one reporter through a run. `env` supplies the CI variables.
async fn run(cli: Cli, env: impl Fn(&str) -> Option<String>) -> Result<()> {
    let mut context = ReportContext::from_lookup(&cli.root_dir, &env);
    let config = match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(&context.root_dir),
    };
    if !config.links.enabled {
        context = context.without_links();
    }
    if cli.force {
        context = context.forced();
    }

    let sink: Box<dyn SummarySink> = match cli.output {
        Some(ref path) if path.as_os_str() == "-" => Box::new(StdoutSink),
        Some(path) => Box::new(FileSink::new(Some(path), cli.overwrite)),
        None => {
            let path = env(SUMMARY_ENV_VAR)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from);
            Box::new(FileSink::new(path, cli.overwrite))
        }
    };

    let mut reporter = GithubReporter::new(context, config.report, sink);
    tracing::info!(reporter = reporter.name(), "run started");
    reporter.on_run_start();

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let result = input::load(&cli.results, &cwd).await?;
    reporter.on_run_complete(&result).await?;

    if let Some(err) = reporter.last_error() {
        anyhow::bail!("{} reporter failed: {:#}", reporter.name(), err);
    }
    Ok(())
}
