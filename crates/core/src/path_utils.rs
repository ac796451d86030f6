//! Path utilities for LogWatcher
//!
//! Home-relative paths from INI values and config file discovery.

use std::env;
use std::path::PathBuf;

/// Turns an INI path value into a `PathBuf`, resolving `~` and `~/...`
/// against `$HOME`. `~user` forms and paths without a leading tilde are kept
/// as written, as is everything when `$HOME` is unset.
pub fn get_path(raw: &str) -> PathBuf {
    let home_relative = match raw.strip_prefix('~') {
        Some("") => Some(""),
        Some(rest) => rest.strip_prefix('/'),
        None => None,
    };

    match (home_relative, env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(raw),
    }
}

/// Resolves a config file path: the env var wins when set and non-empty,
/// otherwise the fixed relative default is used.
pub fn config_path(env_var: &str, default: &str) -> PathBuf {
    match env::var(env_var) {
        Ok(value) if !value.trim().is_empty() => get_path(value.trim()),
        _ => PathBuf::from(default),
    }
}
