use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

/// Formats a modification time the way trackers compare it: UTC, second
/// resolution, fixed width, so string order equals time order.
pub fn mtime_stamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y%m%d%H%M%S").to_string()
}

/// Bookmark into one log file.
#[derive(Debug, Clone)]
pub struct FileTracker {
    filename: String,
    path: PathBuf,
    /// Lines already scanned.
    cursor: usize,
    size: Option<u64>,
    last_modified: String,
    modified_at: Option<SystemTime>,
    changed: bool,
}

impl FileTracker {
    pub fn new(folder: &Path, filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            path: folder.join(filename),
            cursor: 0,
            size: None,
            last_modified: String::new(),
            modified_at: None,
            changed: false,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Size seen at the last refresh, `None` before the first one.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    /// Cached modification stamp, empty before the first refresh.
    pub fn last_modified(&self) -> &str {
        &self.last_modified
    }

    pub fn modified_at(&self) -> Option<SystemTime> {
        self.modified_at
    }

    /// True when the last refresh saw a different size than the one before.
    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Current on-disk modification stamp.
    pub fn current_stamp(&self) -> Result<String> {
        let modified = std::fs::metadata(&self.path)
            .and_then(|m| m.modified())
            .with_context(|| format!("failed to read mtime of {}", self.path.display()))?;
        Ok(mtime_stamp(modified))
    }

    pub fn is_stale(&self, stamp: &str) -> bool {
        stamp > self.last_modified.as_str()
    }

    /// Re-reads size and modification time from the filesystem.
    pub fn refresh(&mut self) -> Result<()> {
        let meta = std::fs::metadata(&self.path)
            .with_context(|| format!("failed to stat {}", self.path.display()))?;
        let modified = meta
            .modified()
            .with_context(|| format!("failed to read mtime of {}", self.path.display()))?;

        let size = meta.len();
        self.changed = self.size != Some(size);
        self.size = Some(size);
        self.last_modified = mtime_stamp(modified);
        self.modified_at = Some(modified);
        Ok(())
    }

    /// Time since the cached modification time. Clock skew counts as zero.
    pub fn age(&self, now: SystemTime) -> Option<Duration> {
        self.modified_at
            .map(|modified| now.duration_since(modified).unwrap_or_default())
    }

    /// Reads the lines past the cursor and returns the last one containing
    /// `needle`. A zero cursor makes every line eligible. The cursor ends up
    /// at the file's line count.
    pub fn scan_for(
        &mut self,
        needle: &str,
        watcher: &str,
        initial_load: bool,
    ) -> Result<Option<String>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let mut reader = BufReader::new(file);

        let mut buf = Vec::new();
        let mut position = 0usize;
        let mut matched = None;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .with_context(|| format!("failed to read {}", self.path.display()))?;
            if read == 0 {
                break;
            }
            position += 1;

            if position > self.cursor || self.cursor == 0 {
                let line = String::from_utf8_lossy(&buf);
                if line.contains(needle) {
                    if !initial_load {
                        info!(
                            "{}: found matching text in log {} at position {}",
                            watcher, self.filename, position
                        );
                    }
                    matched = Some(line.into_owned());
                }
            }
        }

        self.cursor = position;
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn tracker_with(content: &[u8]) -> (tempfile::TempDir, FileTracker) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.log"), content).unwrap();
        let tracker = FileTracker::new(dir.path(), "app.log");
        (dir, tracker)
    }

    fn append(tracker: &FileTracker, text: &str) {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(tracker.path())
            .unwrap();
        file.write_all(text.as_bytes()).unwrap();
    }

    #[test]
    fn stamp_is_fixed_width_utc() {
        let epoch_plus_day = SystemTime::UNIX_EPOCH + Duration::from_secs(86_400 + 3_661);
        assert_eq!(mtime_stamp(epoch_plus_day), "19700102010101");
    }

    #[test]
    fn fresh_tracker_has_no_metadata() {
        let (_dir, tracker) = tracker_with(b"");
        assert_eq!(tracker.cursor(), 0);
        assert_eq!(tracker.size(), None);
        assert_eq!(tracker.last_modified(), "");
        assert!(tracker.is_stale("19700101000000"));
    }

    #[test]
    fn first_scan_considers_every_line_and_keeps_the_last_match() {
        let (_dir, mut tracker) = tracker_with(b"ERROR one\nINFO two\nERROR three\nINFO four\n");
        let matched = tracker.scan_for("ERROR", "test", false).unwrap();
        assert_eq!(matched.as_deref(), Some("ERROR three\n"));
        assert_eq!(tracker.cursor(), 4);
    }

    #[test]
    fn later_scans_only_consider_lines_past_the_cursor() {
        let (_dir, mut tracker) = tracker_with(b"ERROR old\n");
        tracker.scan_for("ERROR", "test", true).unwrap();
        assert_eq!(tracker.cursor(), 1);

        append(&tracker, "INFO fine\n");
        assert_eq!(tracker.scan_for("ERROR", "test", false).unwrap(), None);
        assert_eq!(tracker.cursor(), 2);

        append(&tracker, "ERROR new\nINFO after\n");
        let matched = tracker.scan_for("ERROR", "test", false).unwrap();
        assert_eq!(matched.as_deref(), Some("ERROR new\n"));
        assert_eq!(tracker.cursor(), 4);
    }

    #[test]
    fn unterminated_last_line_counts() {
        let (_dir, mut tracker) = tracker_with(b"INFO a\nERROR tail");
        let matched = tracker.scan_for("ERROR", "test", false).unwrap();
        assert_eq!(matched.as_deref(), Some("ERROR tail"));
        assert_eq!(tracker.cursor(), 2);
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let (_dir, mut tracker) = tracker_with(b"\xff\xfe ERROR bytes\n");
        let matched = tracker.scan_for("ERROR", "test", false).unwrap().unwrap();
        assert!(matched.ends_with("ERROR bytes\n"));
    }

    #[test]
    fn refresh_tracks_size_changes() {
        let (_dir, mut tracker) = tracker_with(b"one\n");
        tracker.refresh().unwrap();
        assert_eq!(tracker.size(), Some(4));
        assert!(tracker.changed());
        assert_eq!(tracker.last_modified().len(), 14);
        assert!(tracker.modified_at().is_some());

        tracker.refresh().unwrap();
        assert!(!tracker.changed());

        append(&tracker, "two\n");
        tracker.refresh().unwrap();
        assert_eq!(tracker.size(), Some(8));
        assert!(tracker.changed());
    }

    #[test]
    fn age_is_measured_from_cached_mtime() {
        let (_dir, mut tracker) = tracker_with(b"x\n");
        assert_eq!(tracker.age(SystemTime::now()), None);

        tracker.refresh().unwrap();
        let modified = tracker.modified_at().unwrap();
        let age = tracker.age(modified + Duration::from_secs(90)).unwrap();
        assert_eq!(age, Duration::from_secs(90));
        assert_eq!(tracker.age(modified - Duration::from_secs(5)), Some(Duration::ZERO));
    }

    #[test]
    fn scanning_a_missing_file_is_an_error() {
        let (dir, mut tracker) = tracker_with(b"x\n");
        std::fs::remove_file(dir.path().join("app.log")).unwrap();
        assert!(!tracker.exists());
        assert!(tracker.scan_for("x", "test", false).is_err());
        assert!(tracker.refresh().is_err());
    }
}
