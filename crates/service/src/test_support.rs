#![cfg(test)]
use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Fresh in-memory database with migrations applied.
/// Every call returns an isolated store, so tests never see each other's rows.
pub async fn get_db() -> Result<DatabaseConnection> {
    // One pooled connection: an in-memory SQLite database lives and dies
    // with its connection.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}
