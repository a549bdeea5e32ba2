use std::net::SocketAddr;

use building_monitor::config::{database, AppConfig};
use building_monitor::state::AppState;
use building_monitor::utils::logging::{init_logging, SERVER_LOG_PREFIX};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let _guard = init_logging(SERVER_LOG_PREFIX);

    let config = AppConfig::from_env().expect("Failed to load configuration");
    std::fs::create_dir_all(&config.data_dir).expect("Failed to create data directory");

    let db = database::establish_connection(&config.database_url, config.schema_update)
        .await
        .expect("Failed to connect to database");

    let state = AppState::new(db, config.clone());
    if let Err(e) = state.files.ensure_dir() {
        tracing::warn!(error = %e, "Could not create config directory");
    }

    let app = building_monitor::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Dashboard server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
