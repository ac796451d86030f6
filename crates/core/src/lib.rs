pub mod config;
pub mod error;
pub mod ini;
pub mod path_utils;

pub use crate::config::{LogWatcherConfig, WatchConfig};
pub use crate::error::ConfigError;

use tracing::info;

pub fn init() {
    info!("LogWatcher core v{} initialized", env!("CARGO_PKG_VERSION"));
}
