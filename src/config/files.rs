//! Plain-file configuration store
//!
//! The monitored address list, fallback Discord webhook, check schedule,
//! and optional proxy URL live as flat files under the config directory.
//! The dashboard edits these files; the monitor re-reads them on every
//! cycle, so edits take effect without a restart. Missing files are not
//! an error; they yield defaults.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

use crate::monitor::schedule::CheckSchedule;
use crate::utils::AppError;

const ADDRESS_FILE: &str = "addresses.txt";
const WEBHOOK_FILE: &str = "webhook.txt";
const SCHEDULE_FILE: &str = "schedule.json";
const PROXY_FILE: &str = "proxy.txt";

/// Handle on the flat-file config directory
#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_dir: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
        }
    }

    /// Create the config directory if it does not exist.
    pub fn ensure_dir(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.config_dir).map_err(|e| {
            error!(error = %e, dir = %self.config_dir.display(), "Failed to create config directory");
            AppError::InternalError(format!("Failed to create config directory: {}", e))
        })
    }

    fn path(&self, file: &str) -> PathBuf {
        self.config_dir.join(file)
    }

    /// Load the monitored address list, one address per line.
    pub fn load_addresses(&self) -> Vec<String> {
        let path = self.path(ADDRESS_FILE);
        if !path.exists() {
            warn!(path = %path.display(), "Address file not found");
            return vec![];
        }
        match fs::read_to_string(&path) {
            Ok(content) => content
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) => {
                error!(error = %e, path = %path.display(), "Failed to read address file");
                vec![]
            }
        }
    }

    pub fn save_addresses(&self, addresses: &[String]) -> Result<(), AppError> {
        self.ensure_dir()?;
        let content = addresses.join("\n");
        write_file(&self.path(ADDRESS_FILE), &content)
    }

    /// Load the fallback webhook URL; empty or missing yields `None`.
    pub fn load_webhook(&self) -> Option<String> {
        let path = self.path(WEBHOOK_FILE);
        let content = fs::read_to_string(path).ok()?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn save_webhook(&self, webhook_url: &str) -> Result<(), AppError> {
        self.ensure_dir()?;
        write_file(&self.path(WEBHOOK_FILE), webhook_url.trim())
    }

    /// Load the check schedule; missing or malformed files fall back to
    /// the default schedule.
    pub fn load_schedule(&self) -> CheckSchedule {
        let path = self.path(SCHEDULE_FILE);
        if !path.exists() {
            return CheckSchedule::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<CheckSchedule>(&content) {
                Ok(schedule) => schedule.normalized(),
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "Malformed schedule file, using default");
                    CheckSchedule::default()
                }
            },
            Err(e) => {
                error!(error = %e, path = %path.display(), "Failed to read schedule file");
                CheckSchedule::default()
            }
        }
    }

    pub fn save_schedule(&self, schedule: &CheckSchedule) -> Result<(), AppError> {
        self.ensure_dir()?;
        let content = serde_json::to_string_pretty(schedule)
            .map_err(|e| AppError::InternalError(format!("Failed to encode schedule: {}", e)))?;
        write_file(&self.path(SCHEDULE_FILE), &content)
    }

    /// Load the optional outbound proxy URL for BIS requests.
    pub fn load_proxy(&self) -> Option<String> {
        let content = fs::read_to_string(self.path(PROXY_FILE)).ok()?;
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), AppError> {
    fs::write(path, content).map_err(|e| {
        error!(error = %e, path = %path.display(), "Failed to write config file");
        AppError::InternalError(format!("Failed to write {}: {}", path.display(), e))
    })
}
