use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};

/// Set once a stderr layer is installed, so failures are not printed twice.
static STDERR_LAYER: AtomicBool = AtomicBool::new(false);

/// Directory holding the rolling log files.
pub fn log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".nestjar/logs")
}

pub fn init_logging(component: &str, to_stderr: bool, debug: bool) -> WorkerGuard {
    let log_dir = log_dir();
    let _ = std::fs::create_dir_all(&log_dir);

    // Roll daily, with the component name as the prefix
    // This will create files like run.log.2024-01-21
    let file_appender = tracing_appender::rolling::daily(&log_dir, component);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // File layer: no ANSI colors, output to file
    let file_layer = tracing_fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true);

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);

    if to_stderr {
        let stderr_layer = tracing_fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(true)
            .with_target(false);
        if registry.with(stderr_layer).try_init().is_ok() {
            STDERR_LAYER.store(true, Ordering::Relaxed);
        }
    } else {
        let _ = registry.try_init();
    }

    guard
}

/// Report a terminal failure exactly once on stderr.
///
/// The failure is always logged; the plain `nestjar:` line is only written when
/// no stderr layer already carries the log record.
pub fn report_failure(message: impl fmt::Display) {
    report_to(
        &mut std::io::stderr(),
        STDERR_LAYER.load(Ordering::Relaxed),
        &message,
    );
}

fn report_to(out: &mut impl Write, stderr_layer: bool, message: &dyn fmt::Display) {
    error!("{}", message);
    if !stderr_layer {
        let _ = writeln!(out, "nestjar: {message}");
    }
}
