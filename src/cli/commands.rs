use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{
    DEFAULT_HOST, DEFAULT_OUT_DIR, DEFAULT_PORT, DEFAULT_READ_TIMEOUT, DEFAULT_SOURCE_PATH,
    ViewerConfig,
};
use crate::server::start_server;
use crate::site::build_site;
use crate::models::Metadata;
use crate::store::RecordStore;
use crate::utils::{format_path_with_tilde, format_thousands};

#[derive(Parser)]
#[command(name = "context-window-viewer")]
#[command(version = "0.1.0")]
#[command(about = "Browse stored context windows as HTML", long_about = None)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the viewer over HTTP
    Serve {
        /// Line-delimited JSON file of context windows
        #[arg(long, default_value = DEFAULT_SOURCE_PATH)]
        source: PathBuf,
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        /// Upper bound in seconds on a single read of the source file
        #[arg(
            long,
            default_value_t = DEFAULT_READ_TIMEOUT.as_secs(),
            value_parser = clap::value_parser!(u64).range(1..)
        )]
        timeout_secs: u64,
    },
    /// Render every page to static files
    Build {
        /// Line-delimited JSON file of context windows
        #[arg(long, default_value = DEFAULT_SOURCE_PATH)]
        source: PathBuf,
        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,
    },
    /// Show statistics about the source file
    Stats {
        /// Line-delimited JSON file of context windows
        #[arg(long, default_value = DEFAULT_SOURCE_PATH)]
        source: PathBuf,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    match command {
        Commands::Serve { source, host, port, timeout_secs } => {
            let config = ViewerConfig {
                source_path: source,
                host,
                port,
                read_timeout: Duration::from_secs(timeout_secs),
                ..ViewerConfig::default()
            };
            runtime.block_on(serve(config))
        }
        Commands::Build { source, out_dir } => {
            let config = ViewerConfig { source_path: source, out_dir, ..ViewerConfig::default() };
            runtime.block_on(build(config))
        }
        Commands::Stats { source } => {
            let config = ViewerConfig { source_path: source, ..ViewerConfig::default() };
            runtime.block_on(show_stats(config))
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("context_window_viewer={}", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn serve(config: ViewerConfig) -> Result<()> {
    let server = start_server(&config).await?;
    println!("Starting server on http://{}", server.addr);

    tokio::signal::ctrl_c().await.context("Failed to listen for shutdown signal")?;
    tracing::info!("Shutdown signal received");
    server.shutdown().await;

    Ok(())
}

async fn build(config: ViewerConfig) -> Result<()> {
    let store = RecordStore::from_config(&config);
    let summary = build_site(&store, &config.out_dir).await?;

    println!(
        "Wrote {} records ({} files) to {}",
        summary.records_written,
        summary.files_written,
        format_path_with_tilde(&config.out_dir)
    );
    if !summary.unsafe_ids.is_empty() {
        println!("Skipped {} records with unusable ids:", summary.unsafe_ids.len());
        for id in &summary.unsafe_ids {
            println!("  {:?}", id);
        }
    }
    if summary.duplicate_ids > 0 {
        println!("Skipped {} records with duplicate ids", summary.duplicate_ids);
    }
    if summary.skipped_lines > 0 {
        println!("Skipped {} malformed lines", summary.skipped_lines);
    }

    Ok(())
}

/// Summed counts over every record, saturating at `u64::MAX`
#[derive(Debug, Default, PartialEq, Eq)]
struct StatsTotals {
    messages: u64,
    tiktoken_tokens: u64,
    claude_tokens: u64,
}

impl StatsTotals {
    fn from_metadata(metas: &[Metadata]) -> Self {
        metas.iter().fold(Self::default(), |acc, m| Self {
            messages: acc.messages.saturating_add(m.num_messages),
            tiktoken_tokens: acc.tiktoken_tokens.saturating_add(m.tiktoken_context_window_length),
            claude_tokens: acc.claude_tokens.saturating_add(m.claude_context_length),
        })
    }
}

async fn show_stats(config: ViewerConfig) -> Result<()> {
    let store = RecordStore::from_config(&config);
    let metas = store.list_metadata().await?;

    let totals = StatsTotals::from_metadata(&metas);

    println!("Context Window Statistics");
    println!("=========================");
    println!("Total records: {}", format_thousands(metas.len() as u64));
    println!("Total messages: {}", format_thousands(totals.messages));
    println!("TikToken tokens: {}", format_thousands(totals.tiktoken_tokens));
    println!("Claude tokens: {}", format_thousands(totals.claude_tokens));

    if let Some(largest) = metas.iter().max_by_key(|m| m.claude_context_length) {
        println!(
            "Largest record: {} ({} Claude tokens)",
            largest.id,
            format_thousands(largest.claude_context_length)
        );
    }
    println!();
    println!("Source file: {}", format_path_with_tilde(&config.source_path));

    Ok(())
}
