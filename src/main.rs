//! Weblink-Tree main entry point
//!
//! This is the command-line interface for the Weblink-Tree link mapper.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weblink_tree::config::{load_config_or_default, validate, Config};
use weblink_tree::crawler::crawl;
use weblink_tree::output::{render_tree, OutputFormat};

/// Article the crawl starts from when no seed is given
const DEFAULT_SEED: &str = "https://qiita.com/sunakan/items/02198c4d46d416fc93a6";

/// Weblink-Tree: maps the links between articles of a content platform
///
/// Starting from a seed article, Weblink-Tree fetches each article's rendered
/// body, collects the links in it, and follows the ones that lead to other
/// articles on the same platform. The resulting tree is written to stdout.
#[derive(Parser, Debug)]
#[command(name = "weblink-tree")]
#[command(version)]
#[command(about = "Maps the link tree of a content platform", long_about = None)]
struct Cli {
    /// Seed article URL
    #[arg(value_name = "URL", default_value = DEFAULT_SEED)]
    seed: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Bearer token for the platform API
    #[arg(long, env = "QIITA_ACCESS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Output format of the tree
    #[arg(short, long, value_enum, default_value_t = Format::Yaml)]
    format: Format,

    /// Override the minimum delay between API requests (milliseconds)
    #[arg(long, value_name = "MS")]
    delay_ms: Option<u64>,

    /// Override the number of concurrent fetches
    #[arg(long, value_name = "N")]
    concurrency: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Yaml => OutputFormat::Yaml,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    let outcome = match crawl(&config, &cli.seed, cli.token.clone()).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let rendered = render_tree(&outcome.tree, cli.format.into())?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;

    Ok(())
}

/// Loads the configuration file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config_or_default(Some(path.as_path()))
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => load_config_or_default(None)?,
    };

    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.request_delay_ms = delay_ms;
    }
    if let Some(concurrency) = cli.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    validate(&config).context("invalid command-line override")?;

    if cli.token.is_none() {
        tracing::info!("No access token set, requests are unauthenticated");
    }

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout only carries the rendered tree.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("weblink_tree=info,warn"),
            1 => EnvFilter::new("weblink_tree=debug,info"),
            2 => EnvFilter::new("weblink_tree=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
