//! Widget configuration.
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `DESKINFO_*` environment overrides. Only ambient concerns are
//! configurable (log filter, log directory, config path); the refresh
//! cadence, geometry and field set are product behaviour and stay
//! fixed in code.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::paths;

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub log_filter: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_dir: None,
        }
    }
}

impl WidgetConfig {
    pub fn load() -> Result<Self> {
        let mut cfg = Self::default();
        cfg.apply_file_config()?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_file_config(&mut self) -> Result<bool> {
        let path = resolve_config_path();
        if !path.is_file() {
            return Ok(false);
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("failed reading config file {}", path.display()))?;
        let file_cfg: FileConfig = toml::from_str(&raw)
            .with_context(|| format!("failed parsing TOML config {}", path.display()))?;

        self.apply_file_logging(file_cfg.logging);
        Ok(true)
    }

    fn apply_file_logging(&mut self, logging: Option<FileLoggingConfig>) {
        let Some(logging) = logging else {
            return;
        };
        if let Some(v) = non_empty(logging.filter) {
            self.log_filter = v;
        }
        if let Some(v) = non_empty(logging.dir) {
            self.log_dir = Some(PathBuf::from(v));
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_non_empty("DESKINFO_LOG_FILTER") {
            self.log_filter = v;
        }
        if let Some(v) = env_non_empty("DESKINFO_LOG_DIR") {
            self.log_dir = Some(PathBuf::from(v));
        }
    }
}

fn resolve_config_path() -> PathBuf {
    env_non_empty("DESKINFO_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(paths::default_config_path)
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    logging: Option<FileLoggingConfig>,
}

#[derive(Debug, Default, Deserialize)]
struct FileLoggingConfig {
    filter: Option<String>,
    dir: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| non_empty(Some(v)))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    use super::*;

    // Environment variables are process-global; tests touching them
    // take this lock.
    fn env_lock() -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(Mutex::default)
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_deskinfo_env() {
        for name in [
            "DESKINFO_CONFIG",
            "DESKINFO_LOG_FILTER",
            "DESKINFO_LOG_DIR",
            "DESKINFO_REFRESH_INTERVAL_SECS",
        ] {
            std::env::remove_var(name);
        }
    }

    #[test]
    fn defaults_are_ambient_only() {
        let cfg = WidgetConfig::default();
        assert_eq!(cfg.log_filter, "info");
        assert!(cfg.log_dir.is_none());
    }

    #[test]
    fn file_config_overrides_logging_knobs() {
        let _guard = env_lock();
        clear_deskinfo_env();

        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        writeln!(file, "[logging]\nfilter = \"debug\"\ndir = \"/tmp/deskinfo-logs\"\n")
            .expect("write config");
        std::env::set_var("DESKINFO_CONFIG", file.path());

        let cfg = WidgetConfig::load().expect("load config");
        assert_eq!(cfg.log_filter, "debug");
        assert_eq!(cfg.log_dir.as_deref(), Some(std::path::Path::new("/tmp/deskinfo-logs")));

        clear_deskinfo_env();
    }

    #[test]
    fn env_overrides_win_over_the_file() {
        let _guard = env_lock();
        clear_deskinfo_env();

        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        writeln!(file, "[logging]\nfilter = \"debug\"\n").expect("write config");
        std::env::set_var("DESKINFO_CONFIG", file.path());
        std::env::set_var("DESKINFO_LOG_FILTER", "trace");

        let cfg = WidgetConfig::load().expect("load config");
        assert_eq!(cfg.log_filter, "trace");

        clear_deskinfo_env();
    }

    #[test]
    fn product_behaviour_is_not_a_config_knob() {
        let _guard = env_lock();
        clear_deskinfo_env();

        // Leftover sections and variables from older installs are
        // ignored rather than rejected; nothing they name is
        // user-settable.
        let mut file = tempfile::NamedTempFile::new().expect("temp config");
        writeln!(
            file,
            "[overlay]\nrefresh_interval_secs = 5\nmargin = 99\n\n[logging]\nfilter = \"debug\"\n"
        )
        .expect("write config");
        std::env::set_var("DESKINFO_CONFIG", file.path());
        std::env::set_var("DESKINFO_REFRESH_INTERVAL_SECS", "5");

        let cfg = WidgetConfig::load().expect("load config");
        assert_eq!(cfg.log_filter, "debug");

        clear_deskinfo_env();
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let _guard = env_lock();
        clear_deskinfo_env();
        std::env::set_var("DESKINFO_CONFIG", "/nonexistent/deskinfo.toml");

        let cfg = WidgetConfig::load().expect("load config");
        assert_eq!(cfg.log_filter, "info");

        clear_deskinfo_env();
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let _guard = env_lock();
        clear_deskinfo_env();
        std::env::set_var("DESKINFO_LOG_FILTER", "   ");

        let cfg = WidgetConfig::load().expect("load config");
        assert_eq!(cfg.log_filter, "info");

        clear_deskinfo_env();
    }
}
