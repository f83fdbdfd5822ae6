mod config;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use ghdir::Mirror;
use ghdir_github::GitHubClient;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "ghdir", version)]
#[command(about = "Download one directory of a GitHub repository, keeping its layout")]
struct Cli {
    /// Directory URL, e.g. https://github.com/owner/repo/tree/main/docs
    url: String,
    /// Directory to create the mirrored directory in
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Maximum number of concurrent downloads
    #[arg(short, long)]
    jobs: Option<usize>,
    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Log every request
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,
    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Command-line flags take precedence over the config file.
    fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(jobs) = self.jobs {
            config.max_concurrent_downloads = jobs;
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_secs = timeout;
        }
        config
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_filter = if verbose {
        "ghdir=debug,ghdir_github=debug"
    } else if quiet {
        "warn"
    } else {
        "ghdir=info,ghdir_github=info"
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let config = cli.apply(config::load_config());
    tracing::debug!(?config, "effective configuration");

    let client = GitHubClient::new(&config.http.client_config())
        .context("failed to set up HTTP client")?;

    let started = Instant::now();
    let report = Mirror::new(Arc::new(client))
        .with_translator(config.github.translator())
        .with_output_dir(&config.output_dir)
        .with_max_concurrent_downloads(config.max_concurrent_downloads)
        .run(&cli.url)
        .await
        .with_context(|| format!("failed to mirror {}", cli.url))?;

    let destination = config
        .output_dir
        .join(ghdir::link::local_root_name(&cli.url));

    println!(
        "Mirrored {} files ({} bytes) into {} in {:.1?}",
        report.files,
        report.bytes,
        destination.display(),
        started.elapsed(),
    );
    if report.skipped > 0 {
        println!("Skipped {} unsupported entries.", report.skipped);
    }

    Ok(())
}
