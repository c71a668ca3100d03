//! Startup logging.
//!
//! The widget runs without a console, so everything goes to a daily
//! rolling file under the per-user data directory. Panics are routed
//! through tracing as well so a crash leaves a trace on disk.

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::WidgetConfig;
use crate::paths;

/// Keeps the non-blocking writer alive; dropping it flushes and stops
/// the background logging thread.
pub struct LoggingGuard {
    _worker: tracing_appender::non_blocking::WorkerGuard,
}

pub fn init(config: &WidgetConfig) -> Result<LoggingGuard> {
    let log_dir = config.log_dir.clone().unwrap_or_else(paths::log_dir);
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("failed creating log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(&log_dir, "deskinfo-widget.log");
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_ansi(false).with_target(true).with_writer(writer))
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed installing tracing subscriber: {err}"))?;

    install_panic_hook();
    Ok(LoggingGuard { _worker: worker })
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::error!(%location, message = %info, "panic");
        previous(info);
    }));
}
