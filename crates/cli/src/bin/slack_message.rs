use std::process::ExitCode;

use clap::Parser;
use logwatcher_slack::{SlackChannel, SlackConfig};
use tracing::error;

/// Send a message to Slack.
///
/// The webhook comes from `slack.ini` in the working directory
/// (or the file named by `SLACK_CONFIG`).
#[derive(Parser, Debug)]
#[command(name = "slack-message", version, long_about = None)]
struct Args {
    /// Text to post
    #[arg(short, long)]
    message: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    let _guard = logwatcher::init_logging();

    let config = match SlackConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match SlackChannel::new(config).send_message(&args.message).await {
        Ok(body) => {
            println!("{}", body);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to send Slack message: {}", e);
            ExitCode::FAILURE
        }
    }
}
