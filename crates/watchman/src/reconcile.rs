use anyhow::{Context, Result};
use tracing::info;

use crate::{FileTracker, FolderWatcher};

impl FolderWatcher {
    /// Check if a file name passes the configured extension filter
    pub(crate) fn is_watched_file(&self, filename: &str) -> bool {
        filename.ends_with(&self.config.file_extension)
    }

    /// Drops trackers whose file is gone, then adds a tracker for every
    /// matching file in the folder that is not tracked yet.
    /// Subdirectories are never entered.
    pub fn reconcile(&mut self) -> Result<()> {
        let name = &self.config.name;
        self.trackers.retain(|tracker| {
            let present = tracker.exists();
            if !present {
                info!(
                    "{}: log {} no longer exists, remove from the logWatch",
                    name,
                    tracker.filename()
                );
            }
            present
        });

        let folder = &self.config.folder;
        let entries = std::fs::read_dir(folder)
            .with_context(|| format!("failed to list folder {}", folder.display()))?;

        let mut discovered = Vec::new();
        for entry in entries {
            let entry =
                entry.with_context(|| format!("failed to list folder {}", folder.display()))?;
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            // Names that are not valid UTF-8 cannot match a textual extension.
            let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if !self.is_watched_file(&filename) || self.tracker(&filename).is_some() {
                continue;
            }
            info!("{}: add log file to scanning: {}", self.config.name, path.display());
            discovered.push(FileTracker::new(folder, &filename));
        }

        self.trackers.extend(discovered);
        Ok(())
    }
}
