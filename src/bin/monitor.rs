//! The monitor daemon: wakes on the configured schedule, checks every
//! monitored address, and notifies owners. Runs as its own process
//! against the same database file as the dashboard server.

use building_monitor::config::{database, AppConfig};
use building_monitor::monitor::CheckRunner;
use building_monitor::utils::logging::{init_logging, MONITOR_LOG_PREFIX};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let _guard = init_logging(MONITOR_LOG_PREFIX);

    let config = AppConfig::from_env().expect("Failed to load configuration");
    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");

    let db = database::establish_connection(&config.database_url, config.schema_update)
        .await
        .expect("Failed to connect to database");

    tracing::info!(
        run_once = config.run_once,
        "Building monitor daemon starting"
    );

    let runner = CheckRunner::new(db, config);
    runner.run_loop().await;
}
