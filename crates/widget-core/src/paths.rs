//! Filesystem locations of the widget's own data.

use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "deskinfo-widget";

/// Per-user application data root, `%LOCALAPPDATA%\deskinfo-widget` on
/// Windows. Falls back to the current directory when the platform has
/// no such notion.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

pub fn log_dir() -> PathBuf {
    data_dir().join("logs")
}

pub fn default_config_path() -> PathBuf {
    data_dir().join("config.toml")
}
