//! File logging. The terminal belongs to the display, so log lines go to a
//! file in the configured log directory.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::fmt::Layer;
use tracing_subscriber::prelude::*;

/// Overrides the crate's own log level, e.g. `YANHUA_LOG=trace`.
pub const LEVEL_ENV: &str = "YANHUA_LOG";

/// Keeps the background writer alive; logs stop when it is dropped.
#[must_use]
pub struct LogGuard {
    _guard: WorkerGuard,
}

fn crate_level() -> LevelFilter {
    std::env::var(LEVEL_ENV)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::DEBUG)
}

/// Starts logging into `dir`. Returns `None` if the directory is unusable,
/// in which case the show runs without logs.
pub fn init_logging(dir: &Path) -> Option<LogGuard> {
    let file = match RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("yanhua")
        .filename_suffix("log")
        .max_log_files(3)
        .build(dir)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("logging disabled, cannot write to {}: {e}", dir.display());
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);

    let installed = tracing_subscriber::registry()
        .with(
            Layer::new()
                .with_ansi(false)
                .with_writer(writer)
                .with_filter(
                    Targets::new()
                        .with_default(LevelFilter::INFO)
                        .with_target(env!("CARGO_CRATE_NAME"), crate_level()),
                ),
        )
        .try_init();

    if installed.is_err() {
        // Someone else already set a global subscriber (tests, embedding).
        return None;
    }

    Some(LogGuard { _guard: guard })
}
