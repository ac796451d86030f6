use std::process::ExitCode;

use clap::Parser;
use logwatcher_core::LogWatcherConfig;
use logwatcher_scheduler::LogScheduler;
use tracing::{error, info};

/// Watches log folders for a piece of text and runs a command when it appears.
///
/// Everything else comes from `logWatcher.ini` in the working directory
/// (or the file named by `LOGWATCHER_CONFIG`).
#[derive(Parser, Debug)]
#[command(version, long_about = None)]
struct Args {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let _args = Args::parse();
    let _guard = logwatcher::init_logging();

    logwatcher_core::init();

    let config = match LogWatcherConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut scheduler = LogScheduler::new(&config);

    tokio::select! {
        _ = scheduler.start() => {}
        signal = tokio::signal::ctrl_c() => match signal {
            Ok(()) => info!("Interrupted, shutting down"),
            Err(e) => error!("Failed to listen for Ctrl-C: {}", e),
        },
    }

    ExitCode::SUCCESS
}
