use std::time::{Duration, SystemTime};

use anyhow::Result;
use tracing::{debug, info};

use crate::{FolderWatcher, MatchEvent};

impl FolderWatcher {
    /// Runs one scan cycle over the folder.
    ///
    /// Reconciles the tracker set, then scans every file whose modification
    /// stamp moved forward. The first file that yields a match ends the cycle
    /// with a [`MatchEvent`]; that file keeps its old stamp so the next cycle
    /// reads it again, and files after it are left for the next cycle.
    /// With `initial_load` set, matches are computed but never reported, which
    /// seeds the cursors without replaying old content.
    pub fn scan_once(&mut self, initial_load: bool) -> Result<Option<MatchEvent>> {
        self.reconcile()?;

        let name = &self.config.name;
        let mut youngest: Option<Duration> = None;

        for tracker in &mut self.trackers {
            let stamp = tracker.current_stamp()?;

            if tracker.is_stale(&stamp) {
                info!("{}: scan {}", name, tracker.filename());
                let matched = tracker.scan_for(&self.config.search_text, name, initial_load)?;

                if let Some(log_text) = matched.filter(|_| !initial_load) {
                    return Ok(Some(MatchEvent {
                        timestamp: stamp,
                        event_name: self.config.event_name.clone(),
                        log_text,
                        log_file_name: tracker.filename().to_string(),
                    }));
                }
            }

            tracker.refresh()?;

            if self.config.inactivity_monitor {
                if let Some(age) = tracker.age(SystemTime::now()) {
                    debug!(
                        "{}: {} age in sec: {}",
                        name,
                        tracker.filename(),
                        age.as_secs()
                    );
                    youngest = Some(youngest.map_or(age, |min| min.min(age)));
                }
            }
        }

        self.inactive = self.config.inactivity_monitor && self.exceeds_inactivity(youngest);
        Ok(None)
    }

    /// An empty folder counts as inactive.
    fn exceeds_inactivity(&self, youngest: Option<Duration>) -> bool {
        let threshold = Duration::from_secs(self.config.inactivity_seconds);
        match youngest {
            Some(age) if age <= threshold => false,
            Some(age) => {
                info!(
                    "{}: no change in folder {} for {} seconds",
                    self.config.name,
                    self.config.folder.display(),
                    age.as_secs()
                );
                true
            }
            None => {
                info!(
                    "{}: no change in folder {}, no log files tracked",
                    self.config.name,
                    self.config.folder.display()
                );
                true
            }
        }
    }
}
