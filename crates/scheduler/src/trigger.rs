//! Runs the configured executable for a match.

use std::path::Path;
use std::process::ExitStatus;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{info, warn};

/// Runs `executable <log_text>` and waits for it to exit.
///
/// A non-zero exit is logged and returned, not treated as an error. Only a
/// failure to start the process is an error.
pub async fn invoke(executable: &Path, log_text: &str) -> Result<ExitStatus> {
    info!("running {}", executable.display());

    let status = Command::new(executable)
        .arg(log_text)
        .status()
        .await
        .with_context(|| format!("failed to run {}", executable.display()))?;

    if !status.success() {
        warn!("{} exited with {}", executable.display(), status);
    }
    Ok(status)
}
