//! # rollcount-logging
//!
//! Logging for the rollcount stores.
//!
//! ## Key Types
//!
//! - [`StoreEvent`] - Structured persistence events (reset, rollover, save, ...)
//! - [`LogFormat`] - Output formats (Pretty, JSON, Compact)
//!
//! Stores never print directly; they build a [`StoreEvent`] and call
//! [`StoreEvent::emit`], which goes through whatever `tracing` subscriber the
//! host installed. [`init_tracing`] installs a reasonable default.

mod events;

pub use events::{LogFormat, StoreEvent};
pub use tracing_appender::non_blocking::WorkerGuard;

use std::path::Path;

use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize tracing for the host process.
///
/// `RUST_LOG` takes precedence over `level`. Returns `false` when a global
/// subscriber was already installed, in which case nothing changes.
pub fn init_tracing(level: &str, format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let json = (format == LogFormat::Json).then(|| fmt::layer().json().with_target(false));
    let compact =
        (format == LogFormat::Compact).then(|| fmt::layer().compact().with_target(false));
    let pretty = (format == LogFormat::Pretty).then(|| fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .with(pretty)
        .try_init()
        .is_ok()
}

/// Like [`init_tracing`], additionally writing JSON lines to a daily-rotated
/// file `<log_dir>/rollcount.<date>.log`.
///
/// Returns `Ok(None)` when a global subscriber was already installed; the
/// file layer is then not attached and no guard is handed out. Otherwise the
/// guard flushes the background writer on drop; keep it alive for the
/// lifetime of the process.
pub fn init_tracing_with_file(
    level: &str,
    format: LogFormat,
    log_dir: &Path,
) -> Result<Option<WorkerGuard>, InitError> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("rollcount")
        .filename_suffix("log")
        .build(log_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let json = (format == LogFormat::Json).then(|| fmt::layer().json().with_target(false));
    let compact =
        (format == LogFormat::Compact).then(|| fmt::layer().compact().with_target(false));
    let pretty = (format == LogFormat::Pretty).then(|| fmt::layer().with_target(false));
    let file = fmt::layer()
        .json()
        .with_ansi(false)
        .with_target(false)
        .with_writer(writer);

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(compact)
        .with(pretty)
        .with(file)
        .try_init()
        .is_ok();
    if !installed {
        tracing::debug!("tracing subscriber already installed, file layer not attached");
        return Ok(None);
    }

    Ok(Some(guard))
}
