//! Log file tail reader for the dashboard's recent-activity panel
//!
//! Reads the last N lines of the monitor daemon's daily log file
//! (`<LOG_DIR>/monitor.log.YYYY-MM-DD`, as written by `init_logging`).

use chrono::{NaiveDate, Utc};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::error::AppError;

/// Resolve the daily log file path for a given date.
fn log_file_path(log_dir: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    log_dir.join(format!("{}.{}", prefix, date.format("%Y-%m-%d")))
}

/// Read the last `max_lines` lines of today's log file.
///
/// A missing file yields an empty list, not an error; the monitor may not
/// have run yet today.
pub fn recent_lines(
    log_dir: &Path,
    prefix: &str,
    max_lines: usize,
) -> Result<Vec<String>, AppError> {
    let today = Utc::now().date_naive();
    let path = log_file_path(log_dir, prefix, today);

    if !path.exists() {
        debug!(log_file = %path.display(), "Log file does not exist yet");
        return Ok(vec![]);
    }

    let file = File::open(&path).map_err(|e| {
        error!(error = %e, log_file = %path.display(), "Failed to open log file");
        AppError::InternalError(format!("Failed to open log file: {}", e))
    })?;

    let mut lines: Vec<String> = Vec::new();
    for line in BufReader::new(file).lines() {
        match line {
            Ok(l) => lines.push(l),
            // A torn write at the tail is not worth failing the request over
            Err(e) => {
                debug!(error = %e, "Skipping unreadable log line");
            }
        }
    }

    if lines.len() > max_lines {
        lines.drain(..lines.len() - max_lines);
    }
    Ok(lines)
}
