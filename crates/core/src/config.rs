use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::info;

use crate::error::ConfigError;
use crate::ini::{IniTables, Section};
use crate::path_utils;

/// Config file read from the working directory when no override is set.
pub const DEFAULT_CONFIG_FILE: &str = "logWatcher.ini";

/// Environment variable that overrides [`DEFAULT_CONFIG_FILE`].
pub const CONFIG_ENV_VAR: &str = "LOGWATCHER_CONFIG";

const GENERAL_SECTION: &str = "general";
const SECTION_PREFIX: &str = "logwatch_";
const MAX_SECTIONS: usize = 99;

/// One `[logwatch_N]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub name: String,
    pub folder: PathBuf,
    pub file_extension: String,
    pub search_text: String,
    pub execution_file: PathBuf,
    pub event_name: String,
    pub inactivity_monitor: bool,
    pub inactivity_seconds: u64,
}

impl WatchConfig {
    fn from_section(section: Section<'_>) -> Result<Self, ConfigError> {
        let name = section.require("name")?.to_string();
        info!("loading {}", name);

        Ok(Self {
            name,
            folder: path_utils::get_path(section.require("folder")?),
            file_extension: section.require("fileExtension")?.to_string(),
            search_text: section.require("searchText")?.to_string(),
            execution_file: path_utils::get_path(section.require("executionFile")?),
            event_name: section.require("eventName")?.to_string(),
            inactivity_monitor: section.require_bool("inactivityMonitor")?,
            inactivity_seconds: section.require_parsed("inactivitySeconds")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWatcherConfig {
    /// Seconds between scan cycles.
    pub scan_interval: u64,
    pub watches: Vec<WatchConfig>,
}

impl LogWatcherConfig {
    /// Load from `$LOGWATCHER_CONFIG`, falling back to `logWatcher.ini`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&path_utils::config_path(CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        info!("reading configuration from {}", path.display());
        Self::from_tables(&IniTables::load(path)?)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Self::from_tables(&IniTables::parse(contents)?)
    }

    /// `[general]` and `[logwatch_1]` are mandatory. Later sections are read
    /// in order until the first one that is absent or unreadable.
    pub fn from_tables(tables: &IniTables) -> Result<Self, ConfigError> {
        let general = tables.require_section(GENERAL_SECTION)?;
        let scan_interval: u64 = general.require_parsed("scanInterval")?;
        if scan_interval == 0 {
            return Err(ConfigError::InvalidValue {
                section: GENERAL_SECTION.to_string(),
                key: "scanInterval".to_string(),
                value: "0".to_string(),
            });
        }

        let first = format!("{SECTION_PREFIX}1");
        let mut watches = vec![WatchConfig::from_section(tables.require_section(&first)?)?];

        for number in 2..=MAX_SECTIONS {
            let name = format!("{SECTION_PREFIX}{number}");
            let loaded = tables
                .require_section(&name)
                .and_then(WatchConfig::from_section);
            match loaded {
                Ok(watch) => watches.push(watch),
                Err(e) => {
                    info!("no more config ({})", e);
                    break;
                }
            }
        }

        Ok(Self {
            scan_interval,
            watches,
        })
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(number: usize, folder: &str) -> String {
        format!(
            "[logwatch_{number}]
name = watcher {number}
folder = {folder}
fileExtension = .log
searchText = ERROR
executionFile = /usr/local/bin/alert.sh
eventName = app-error
inactivityMonitor = False
inactivitySeconds = 60
"
        )
    }

    #[test]
    fn loads_general_and_numbered_sections() {
        let ini = format!(
            "[general]\nscanInterval = 15\n\n{}\n{}",
            section(1, "/var/log/app"),
            section(2, "/var/log/db")
        );
        let config = LogWatcherConfig::parse(&ini).unwrap();

        assert_eq!(config.scan_interval, 15);
        assert_eq!(config.scan_interval(), Duration::from_secs(15));
        assert_eq!(config.watches.len(), 2);

        let first = &config.watches[0];
        assert_eq!(first.name, "watcher 1");
        assert_eq!(first.folder, PathBuf::from("/var/log/app"));
        assert_eq!(first.file_extension, ".log");
        assert_eq!(first.search_text, "ERROR");
        assert_eq!(first.execution_file, PathBuf::from("/usr/local/bin/alert.sh"));
        assert_eq!(first.event_name, "app-error");
        assert!(!first.inactivity_monitor);
        assert_eq!(first.inactivity_seconds, 60);
        assert_eq!(config.watches[1].folder, PathBuf::from("/var/log/db"));
    }

    #[test]
    fn gap_in_numbering_ends_the_list() {
        let ini = format!(
            "[general]\nscanInterval = 5\n{}\n{}",
            section(1, "/a"),
            section(3, "/c")
        );
        let config = LogWatcherConfig::parse(&ini).unwrap();
        assert_eq!(config.watches.len(), 1);
    }

    #[test]
    fn malformed_later_section_ends_the_list() {
        let ini = format!(
            "[general]\nscanInterval = 5\n{}\n[logwatch_2]\nname = partial\nfolder = /b\n",
            section(1, "/a")
        );
        let config = LogWatcherConfig::parse(&ini).unwrap();
        assert_eq!(config.watches.len(), 1);
        assert_eq!(config.watches[0].name, "watcher 1");
    }

    #[test]
    fn missing_general_interval_is_fatal() {
        let ini = format!("[general]\n{}", section(1, "/a"));
        assert!(matches!(
            LogWatcherConfig::parse(&ini),
            Err(ConfigError::MissingKey { key, .. }) if key == "scanInterval"
        ));

        assert!(matches!(
            LogWatcherConfig::parse(&section(1, "/a")),
            Err(ConfigError::MissingSection(name)) if name == "general"
        ));
    }

    #[test]
    fn zero_or_non_numeric_interval_is_fatal() {
        for value in ["0", "soon"] {
            let ini = format!("[general]\nscanInterval = {value}\n{}", section(1, "/a"));
            assert!(matches!(
                LogWatcherConfig::parse(&ini),
                Err(ConfigError::InvalidValue { .. })
            ));
        }
    }

    #[test]
    fn missing_first_section_is_fatal() {
        let ini = format!("[general]\nscanInterval = 5\n{}", section(2, "/b"));
        assert!(matches!(
            LogWatcherConfig::parse(&ini),
            Err(ConfigError::MissingSection(name)) if name == "logwatch_1"
        ));
    }

    #[test]
    fn malformed_first_section_is_fatal() {
        let ini = "[general]\nscanInterval = 5\n[logwatch_1]\nname = only\n";
        assert!(matches!(
            LogWatcherConfig::parse(ini),
            Err(ConfigError::MissingKey { .. })
        ));
    }

    #[test]
    fn shipped_example_parses() {
        let example = include_str!("../../../config/logWatcher.example.ini");
        let config = LogWatcherConfig::parse(example).unwrap();
        assert_eq!(config.scan_interval, 30);
        assert_eq!(config.watches.len(), 2);
        assert!(config.watches[0].inactivity_monitor);
        assert_eq!(config.watches[0].inactivity_seconds, 600);
        assert_eq!(config.watches[1].search_text, "FAILED");
        assert!(!config.watches[1].folder.starts_with("~"));
    }

    #[test]
    fn windows_paths_and_comment_marks_are_kept() {
        let ini = "[general]
scanInterval = 5

[logwatch_1]
name = windows
folder = D:\\logs\\app
fileExtension = .log
searchText = code=500; retry #2
executionFile = C:\\tools\\alert.bat
eventName = app-error
inactivityMonitor = no
inactivitySeconds = 60
";
        let config = LogWatcherConfig::parse(ini).unwrap();
        let watch = &config.watches[0];
        assert_eq!(watch.search_text, "code=500; retry #2");
        assert_eq!(watch.execution_file, PathBuf::from("C:\\tools\\alert.bat"));
        assert_eq!(watch.folder, PathBuf::from("D:\\logs\\app"));
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logWatcher.ini");
        std::fs::write(
            &path,
            format!("[general]\nscanInterval = 2\n{}", section(1, "/srv/logs")),
        )
        .unwrap();

        let config = LogWatcherConfig::load_from(&path).unwrap();
        assert_eq!(config.scan_interval, 2);
        assert_eq!(config.watches[0].folder, PathBuf::from("/srv/logs"));
    }
}
