#![cfg_attr(all(target_os = "windows", not(test)), windows_subsystem = "windows")]

mod config;
mod lifecycle;
mod logging;
mod paths;

use anyhow::Result;
use tracing::{error, info};

use config::WidgetConfig;
use lifecycle::WidgetRuntime;
use platform_windows::{SingleInstanceGuard, INSTANCE_MUTEX_NAME};

fn main() -> Result<()> {
    let config = WidgetConfig::load()?;
    let _logging = logging::init(&config)?;

    let runtime = WidgetRuntime::new();
    let base_dir = std::env::current_dir().unwrap_or_default();
    info!(
        version = env!("CARGO_PKG_VERSION"),
        platform = platform_windows::platform_name(),
        refresh_secs = runtime.refresh_interval_secs(),
        data_dir = %paths::data_dir().display(),
        base_dir = %base_dir.display(),
        "deskinfo-widget starting"
    );

    let Some(_guard) = SingleInstanceGuard::acquire(INSTANCE_MUTEX_NAME) else {
        error!("another instance already owns the overlay; exiting");
        eprintln!("deskinfo-widget is already running");
        return Ok(());
    };

    let result = runtime.run();
    match &result {
        Ok(()) => info!("deskinfo-widget stopped"),
        Err(err) => error!(error = %err, "deskinfo-widget failed"),
    }
    result
}
