use crate::config::{AppConfig, ConfigStore};
use sea_orm::DatabaseConnection;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    pub files: ConfigStore,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let files = ConfigStore::new(config.config_dir.clone());
        Self { db, config, files }
    }
}
