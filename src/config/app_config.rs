use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    /// Directory holding the plain-file config (addresses, webhook, schedule, proxy)
    pub config_dir: PathBuf,
    /// Directory holding the SQLite database file
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub database_url: String,
    /// BIS property profile endpoint
    pub bis_base_url: String,
    /// NYC Open Data host (311 complaints, DOB/ECB violation datasets)
    pub open_data_base_url: String,
    /// Whether to synchronize the database schema on startup
    pub schema_update: bool,
    /// Run a single check and exit instead of looping on the schedule
    pub run_once: bool,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let config_dir = PathBuf::from(env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into()));
        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| "data".into()));
        let log_dir = PathBuf::from(env::var("LOG_DIR").unwrap_or_else(|_| "logs".into()));

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            format!(
                "sqlite://{}?mode=rwc",
                data_dir.join("building_monitor.db").display()
            )
        });

        let bis_base_url = env::var("BIS_BASE_URL").unwrap_or_else(|_| {
            "https://a810-bisweb.nyc.gov/bisweb/PropertyProfileOverviewServlet".to_string()
        });

        let open_data_base_url = env::var("NYC_OPEN_DATA_BASE_URL")
            .unwrap_or_else(|_| "https://data.cityofnewyork.us".to_string());

        let schema_update = parse_bool_var("DB_SCHEMA_UPDATE", true);
        let run_once = parse_bool_var("MONITOR_RUN_ONCE", false);

        Ok(Self {
            server_port,
            config_dir,
            data_dir,
            log_dir,
            database_url,
            bis_base_url,
            open_data_base_url,
            schema_update,
            run_once,
        })
    }
}

fn parse_bool_var(name: &str, default: bool) -> bool {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<bool>()
        .unwrap_or_else(|_| {
            tracing::warn!(
                "Invalid {} value, defaulting to {}. Use 'true' or 'false'.",
                name,
                default
            );
            default
        })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Failed to create directory: {0}")]
    DirectoryCreation(String),
}
