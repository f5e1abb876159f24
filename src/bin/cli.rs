//! garden-watch CLI
//!
//! Local execution entry point: long-running service, single cycle, and
//! inspection commands.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use garden_watch::{
    app,
    config::load_config,
    error::Result,
    pipeline::Scheduler,
    storage::{LocalSnapshotStore, SnapshotStore},
};

/// garden-watch - game feed change notifier
#[derive(Parser, Debug)]
#[command(name = "garden-watch", version, about = "Polls game feeds and notifies on changes")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the scheduler and the trigger/read HTTP surface
    Serve,

    /// Run exactly one cycle and print its report
    Once,

    /// Print the persisted snapshot
    Show,

    /// Validate the configuration
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return Err(e);
        }
    };
    log::info!("Loaded configuration from {}", cli.config.display());

    match cli.command {
        Command::Serve => {
            let runner = Arc::new(app::build_runner(&config).await?);
            let scheduler = Scheduler::new(Arc::clone(&runner), config.scheduler.interval()).spawn();

            #[cfg(feature = "server")]
            {
                let addr = config.server.bind_addr();
                tokio::select! {
                    result = garden_watch::server::serve(Arc::clone(&runner), &addr) => {
                        if let Err(e) = result {
                            log::error!("HTTP server stopped: {}", e);
                        }
                    }
                    _ = tokio::signal::ctrl_c() => log::info!("Shutdown requested"),
                }
            }

            #[cfg(not(feature = "server"))]
            {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => log::info!("Shutdown requested"),
                    Err(e) => log::error!("Could not listen for shutdown signal: {}", e),
                }
            }

            scheduler.abort();
        }

        Command::Once => {
            let runner = app::build_runner(&config).await?;
            let report = runner.run_cycle().await;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Show => {
            let store = LocalSnapshotStore::new(&config.storage.snapshot_path);
            let snapshot = store.load().await?;
            if snapshot.is_empty() {
                log::info!("No snapshot found yet.");
            }
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Command::Validate => {
            log::info!("✓ Config OK");
            log::info!(
                "Polling every {}s, fetch timeout {}s, snapshot at {}",
                config.scheduler.interval_secs,
                config.scheduler.fetch_timeout_secs,
                config.storage.snapshot_path.display()
            );
        }
    }

    Ok(())
}
