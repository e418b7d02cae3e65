//! feedcache - inspect and manage a persisted feed snapshot

mod cli;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use feedcache_core::{FeedCacheStore, FeedStoreConfig, FeedStoreError, FeedStoreExt};
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "feedcache",
    version,
    about = "Inspect and manage a persisted feed snapshot cache",
    long_about = "Reads and writes the single feed snapshot (ordered images plus capture\n\
                  timestamp) kept in a feedcache SQLite database.\n\
                  \n\
                  Examples:\n\
                    feedcache show                    # Print the cached feed\n\
                    feedcache show --format json      # Same, as JSON\n\
                    feedcache import feed.json        # Replace the snapshot\n\
                    feedcache export > feed.json      # Dump the snapshot\n\
                    feedcache clear                   # Delete the snapshot\n\
                  \n\
                  Environment Variables:\n\
                    FEEDCACHE_DB                      # Override database path\n\
                    FEEDCACHE_FORMAT                  # Force output format: json|table\n\
                    RUST_LOG                          # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Mode,

    /// Path to the cache database (default: <data dir>/feedcache/feed-cache.db)
    #[arg(long, env = "FEEDCACHE_DB")]
    db: Option<PathBuf>,

    /// Output format
    #[arg(long, env = "FEEDCACHE_FORMAT", value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Verbose logging (debug level unless RUST_LOG is set)
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Mode {
    /// Print the cached feed
    Show,
    /// Replace the cached feed with the contents of a JSON file
    Import {
        /// JSON file: {"feed": [...], "timestamp": "..."} or a bare array of images
        file: PathBuf,
    },
    /// Print the cached feed as JSON
    Export,
    /// Delete the cached feed
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let store = match cli.db {
        Some(path) => FeedCacheStore::open(FeedStoreConfig::file(path)),
        None => FeedCacheStore::open_default(),
    }
    .context("Failed to open feed cache")?;
    debug!(location = %store.config().location, "Using feed cache");

    let json = cli.format == OutputFormat::Json;

    match cli.mode {
        Mode::Show => run_show(&store, json).await,
        Mode::Import { file } => run_import(&store, file).await,
        Mode::Export => run_show(&store, true).await,
        Mode::Clear => run_clear(&store).await,
    }
}

fn init_tracing(verbose: bool) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .compact()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

async fn run_show(store: &FeedCacheStore, json: bool) -> Result<()> {
    let retrieval = match store.retrieve_async().await {
        Ok(retrieval) => retrieval,
        Err(e @ FeedStoreError::InvalidData { .. }) => {
            bail!("Cached feed is corrupted ({e}); run 'feedcache clear' to reset it")
        }
        Err(e) => return Err(e).context("Failed to read feed cache"),
    };

    let Some(cached) = retrieval.into_cached_feed() else {
        if json {
            bail!("Cache is empty");
        }
        println!("Cache is empty");
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&cached)?);
    } else {
        println!("{}", cli::render_table(&cached));
    }
    Ok(())
}

async fn run_import(store: &FeedCacheStore, file: PathBuf) -> Result<()> {
    let content = std::fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let cached = cli::parse_import(&content, chrono::Utc::now())
        .with_context(|| format!("Invalid feed file: {}", file.display()))?;

    let count = cached.feed.len();
    store
        .insert_async(cached.feed, cached.timestamp)
        .await
        .context("Failed to write feed cache")?;

    println!("Cached {} image(s) captured at {}", count, cli::format_timestamp(&cached.timestamp));
    Ok(())
}

async fn run_clear(store: &FeedCacheStore) -> Result<()> {
    store.delete_async().await.context("Failed to clear feed cache")?;
    println!("Feed cache cleared");
    Ok(())
}
