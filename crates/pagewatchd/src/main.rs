//! pagewatchd — the PageWatch replay daemon.
//!
//! Single binary that assembles the collection pipeline around a recorded
//! session fixture:
//! - Session store (pagewatch-metrics)
//! - Collector with a static environment + scripted vitals
//! - Polling console view (the bundled consumer)
//!
//! # Usage
//!
//! ```text
//! pagewatchd replay --session session.json --duration-ms 10000
//! ```

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;

use pagewatch_collector::{Collector, CollectorConfig};
use pagewatch_metrics::MetricStore;

mod config;
mod render;
mod session;

use config::DaemonConfig;
use session::SessionFixture;

#[derive(Parser)]
#[command(name = "pagewatchd", about = "PageWatch replay daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a recorded session and poll the store like a live consumer.
    Replay {
        /// Session fixture to replay (JSON).
        #[arg(long)]
        session: PathBuf,

        /// Optional pagewatch.toml with [collector] and [replay] sections.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Poll cadence in milliseconds. Overrides the config file; the
        /// built-in default is 2000.
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Stop after this many milliseconds instead of waiting for Ctrl-C.
        #[arg(long)]
        duration_ms: Option<u64>,

        /// Force production mode (also enabled via the config file or
        /// PAGEWATCH_ENV=production).
        #[arg(long)]
        production: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,pagewatchd=debug,pagewatch_collector=debug,pagewatch_metrics=debug"
                    .parse()
                    .unwrap()
            }),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Replay {
            session,
            config,
            poll_interval_ms,
            duration_ms,
            production,
        } => run_replay(session, config, poll_interval_ms, duration_ms, production).await,
    }
}

async fn run_replay(
    session: PathBuf,
    config_path: Option<PathBuf>,
    poll_interval_ms: Option<u64>,
    duration_ms: Option<u64>,
    production: bool,
) -> anyhow::Result<()> {
    info!("PageWatch replay daemon starting");

    let file_config = match &config_path {
        Some(path) => {
            let loaded = DaemonConfig::from_file(path)?;
            info!(path = ?path, "config file loaded");
            loaded
        }
        None => DaemonConfig::default(),
    };
    let (collector_config, poll_interval) = effective_settings(
        production,
        poll_interval_ms,
        &file_config,
        CollectorConfig::from_env().production,
    );

    let fixture = SessionFixture::from_file(&session)?;
    info!(
        path = ?session,
        resources = fixture.resources.len(),
        vitals = fixture.vitals.len(),
        "session fixture loaded"
    );

    // ── Assemble the pipeline ──────────────────────────────────

    let store = MetricStore::new();
    let mut collector = Collector::new(store.clone(), collector_config)
        .with_environment(fixture.environment());
    if let Some(vitals) = fixture.vitals_source() {
        collector = collector.with_vitals(vitals);
    }

    collector.init().await;
    info!(
        production = collector_config.production,
        poll_ms = poll_interval.as_millis() as u64,
        "collector initialized, polling store"
    );

    // ── Poll loop ──────────────────────────────────────────────

    let deadline = duration_ms.map(|ms| tokio::time::Instant::now() + Duration::from_millis(ms));

    loop {
        tokio::select! {
            _ = tokio::time::sleep(poll_interval) => {
                let latest = store.latest_all().await;
                if latest.is_empty() {
                    println!("(no metrics collected yet)");
                    continue;
                }
                println!();
                for line in render::format_poll_lines(&latest) {
                    println!("{line}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown signal received");
                break;
            }
            _ = until(deadline) => {
                info!("replay duration elapsed");
                break;
            }
        }
    }

    // ── Final summary ──────────────────────────────────────────

    collector.log_summary().await;
    print!("{}", render::format_session_summary(&store.snapshot().await));

    info!("PageWatch replay daemon stopped");
    Ok(())
}

/// Resolve the effective settings: CLI flags win over the config file,
/// the file wins over the environment, the environment over defaults.
fn effective_settings(
    production_flag: bool,
    poll_flag: Option<u64>,
    file: &DaemonConfig,
    env_production: bool,
) -> (CollectorConfig, Duration) {
    let production = production_flag || file.collector.production || env_production;
    let poll_ms = poll_flag.unwrap_or(file.replay.poll_interval_ms);
    (CollectorConfig { production }, Duration::from_millis(poll_ms))
}

/// Resolves at the deadline, or never when no duration was given.
async fn until(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending::<()>().await,
    }
}
