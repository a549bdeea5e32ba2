use crate::domain::{
    complaint::entity::complaint_311,
    owner::entity::{address_owner, owner},
    status::entity::building_status,
};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Schema, Statement};
use tracing::info;

/// Connect to the SQLite database and, when enabled, synchronize the
/// schema from the entity definitions.
pub async fn establish_connection(
    database_url: &str,
    schema_update: bool,
) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    info!("Successfully connected to the database.");

    if schema_update {
        create_tables(&db).await?;
    } else {
        info!("Skipping database schema synchronization (DB_SCHEMA_UPDATE is not true).");
    }

    Ok(db)
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    info!("Starting database schema synchronization...");

    // Order matters for foreign keys (parent first, then child), even
    // though SQLite does not enforce them by default.
    create_table_if_not_exists(db, &schema, owner::Entity).await?;
    create_table_if_not_exists(db, &schema, building_status::Entity).await?;
    create_table_if_not_exists(db, &schema, address_owner::Entity).await?;
    create_table_if_not_exists(db, &schema, complaint_311::Entity).await?;

    create_index_if_not_exists(
        db,
        "idx_complaint_311_address",
        "complaint_311",
        &["address"],
    )
    .await?;

    // Apply migrations for databases created by older builds
    apply_migrations(db).await?;

    info!("Database schema synchronization completed.");
    Ok(())
}

/// Apply ALTER TABLE migrations for existing tables.
///
/// Mirrors how the snapshot and complaint tables grew columns over time;
/// a fresh database already has all of these.
async fn apply_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    add_column_if_not_exists(db, "building_status", "last_checked", "TEXT NULL").await?;
    add_column_if_not_exists(
        db,
        "building_status",
        "complaints",
        "INTEGER NOT NULL DEFAULT 0",
    )
    .await?;
    add_column_if_not_exists(
        db,
        "building_status",
        "dob_violations",
        "INTEGER NOT NULL DEFAULT 0",
    )
    .await?;
    add_column_if_not_exists(
        db,
        "building_status",
        "ecb_violations",
        "INTEGER NOT NULL DEFAULT 0",
    )
    .await?;

    add_column_if_not_exists(db, "complaint_311", "descriptor", "TEXT NULL").await?;
    add_column_if_not_exists(db, "complaint_311", "closed_date", "TEXT NULL").await?;
    add_column_if_not_exists(db, "complaint_311", "agency", "TEXT NULL").await?;

    Ok(())
}

/// Add a column to a table if it doesn't already exist.
async fn add_column_if_not_exists(
    db: &DatabaseConnection,
    table_name: &str,
    column_name: &str,
    column_definition: &str,
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let sql = format!(
        "ALTER TABLE {} ADD COLUMN {} {}",
        table_name, column_name, column_definition
    );
    let stmt = Statement::from_string(backend, sql);

    match db.execute(stmt).await {
        Ok(_) => {
            info!("Added column '{}' to table '{}'", column_name, table_name);
            Ok(())
        }
        Err(e) => {
            // Ignore "column already exists" errors for idempotency
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("duplicate")
                || err_str.contains("already exists")
                || err_str.contains("duplicate column")
            {
                Ok(())
            } else {
                tracing::error!(
                    "Failed to add column '{}' to table '{}': {}",
                    column_name,
                    table_name,
                    e
                );
                Err(e)
            }
        }
    }
}

async fn create_index_if_not_exists(
    db: &DatabaseConnection,
    index_name: &str,
    table_name: &str,
    columns: &[&str],
) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let cols = columns.join(", ");
    let sql = format!("CREATE INDEX {} ON {} ({})", index_name, table_name, cols);
    let stmt = Statement::from_string(backend, sql);
    match db.execute(stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            let err_str = e.to_string().to_lowercase();
            if err_str.contains("duplicate")
                || err_str.contains("already exists")
                || err_str.contains("exists")
            {
                Ok(())
            } else {
                tracing::error!("Failed to create index {}: {}", index_name, e);
                Err(e)
            }
        }
    }
}

async fn create_table_if_not_exists<E>(
    db: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<(), DbErr>
where
    E: sea_orm::EntityTrait,
{
    let backend = db.get_database_backend();
    let create_stmt: Statement =
        backend.build(schema.create_table_from_entity(entity).if_not_exists());

    match db.execute(create_stmt).await {
        Ok(_) => Ok(()),
        Err(e) => {
            tracing::error!("Failed to create table: {}", e);
            Err(e)
        }
    }
}
