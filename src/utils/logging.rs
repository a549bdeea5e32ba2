//! Logging initialization
//!
//! Structured JSON logging to stdout and a daily rolling log file. The
//! monitor daemon and the dashboard server write to separate file
//! prefixes in the same directory so the dashboard can tail the
//! monitor's activity.

use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the logging system.
///
/// Logs are emitted in JSON format to stdout and to a daily file in
/// `LOG_DIR` (default `logs/`) named `<file_prefix>.YYYY-MM-DD`. The log
/// level is controlled with `RUST_LOG` (default `info,building_monitor=debug`).
///
/// The returned `WorkerGuard` must be held in main; dropping it early
/// loses buffered log lines on shutdown.
pub fn init_logging(file_prefix: &str) -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

    let file_appender = rolling::daily(&log_dir, file_prefix);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let stdout_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .flatten_event(false);

    let file_layer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_current_span(true)
        .flatten_event(false)
        .with_ansi(false)
        .with_writer(non_blocking);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,building_monitor=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .or_else(|err| {
            // Detect "already initialized" via source downcasting
            use std::error::Error;
            if err
                .source()
                .and_then(|s| s.downcast_ref::<tracing::dispatcher::SetGlobalDefaultError>())
                .is_some()
            {
                // Already initialized; safe to ignore
                return Ok(());
            }
            eprintln!("Failed to initialize tracing: {}", err);
            Err(err)
        })
        .ok(); // Let the process start even if logging fails

    guard
}

/// File prefix used by the monitor daemon's daily log files.
pub const MONITOR_LOG_PREFIX: &str = "monitor.log";

/// File prefix used by the dashboard server's daily log files.
pub const SERVER_LOG_PREFIX: &str = "server.log";
