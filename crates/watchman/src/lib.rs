//! LogWatcher Watchman - polling folder observer
//!
//! This module is organized into:
//! - types: Scan results (MatchEvent)
//! - tracker: Per-file cursor and metadata (FileTracker)
//! - reconcile: Keeping the tracker set in line with the folder listing
//! - scan: Scanning changed files and inactivity detection

mod reconcile;
mod scan;
mod tracker;
mod types;

pub use tracker::{FileTracker, mtime_stamp};
pub use types::MatchEvent;

use std::path::Path;

use logwatcher_core::WatchConfig;
use tracing::info;

/// Watches one configured folder for new text in its log files.
#[derive(Debug)]
pub struct FolderWatcher {
    config: WatchConfig,
    trackers: Vec<FileTracker>,
    inactive: bool,
}

impl FolderWatcher {
    pub fn new(config: WatchConfig) -> Self {
        info!(
            "{}: watching {} for '{}' in *{}",
            config.name,
            config.folder.display(),
            config.search_text,
            config.file_extension
        );
        Self {
            config,
            trackers: Vec::new(),
            inactive: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    /// The executable to run when this watcher reports a match.
    pub fn execution_file(&self) -> &Path {
        &self.config.execution_file
    }

    /// Tracked files in insertion (listing) order.
    pub fn trackers(&self) -> &[FileTracker] {
        &self.trackers
    }

    pub fn tracker(&self, filename: &str) -> Option<&FileTracker> {
        self.trackers.iter().find(|t| t.filename() == filename)
    }

    /// Whether the last completed scan found the folder inactive.
    /// Always false when inactivity monitoring is off.
    pub fn is_inactive(&self) -> bool {
        self.inactive
    }
}
