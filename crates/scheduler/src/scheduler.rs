use logwatcher_core::LogWatcherConfig;
use logwatcher_watchman::{FolderWatcher, MatchEvent};
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use crate::ticker::Ticker;
use crate::trigger;

/// How often the idle loop checks whether the ticker fired.
const IDLE_POLL: Duration = Duration::from_secs(2);

pub struct LogScheduler {
    watchers: Vec<FolderWatcher>,
    interval: Duration,
}

impl LogScheduler {
    pub fn new(config: &LogWatcherConfig) -> Self {
        let watchers = config
            .watches
            .iter()
            .cloned()
            .map(FolderWatcher::new)
            .collect();
        Self::from_watchers(watchers, config.scan_interval())
    }

    pub fn from_watchers(watchers: Vec<FolderWatcher>, interval: Duration) -> Self {
        Self { watchers, interval }
    }

    pub fn watchers(&self) -> &[FolderWatcher] {
        &self.watchers
    }

    /// Initial pass: builds trackers and cursors without reporting anything,
    /// so content written before startup never triggers.
    pub fn seed(&mut self) {
        for watcher in &mut self.watchers {
            if let Err(e) = watcher.scan_once(true) {
                error!("{}: initial scan failed: {:#}", watcher.name(), e);
            }
        }
    }

    /// Scans every watcher once, in order, and runs the executable for each
    /// match. A failing watcher is logged and skipped.
    pub async fn run_cycle(&mut self) -> Vec<MatchEvent> {
        let mut events = Vec::new();

        for watcher in &mut self.watchers {
            match watcher.scan_once(false) {
                Ok(Some(event)) => {
                    info!(
                        "{}: {} matched in {}",
                        watcher.name(),
                        event.event_name,
                        event.log_file_name
                    );
                    let executable = watcher.execution_file();
                    if let Err(e) = trigger::invoke(executable, &event.log_text).await {
                        error!("{}: trigger failed: {:#}", watcher.name(), e);
                    }
                    events.push(event);
                }
                Ok(None) => {}
                Err(e) => error!("{}: scan failed: {:#}", watcher.name(), e),
            }
        }

        events
    }

    /// Seeds, then scans on every tick until the task is dropped.
    pub async fn start(&mut self) {
        info!(
            "Scheduler: {} watcher(s), scanning every {}s",
            self.watchers.len(),
            self.interval.as_secs()
        );
        self.seed();

        let mut ticker = Ticker::new(self.interval);
        ticker.arm();
        let idle = IDLE_POLL.min(self.interval);

        loop {
            if ticker.is_ready() {
                self.run_cycle().await;
                ticker.arm();
            }
            sleep(idle).await;
        }
    }
}
