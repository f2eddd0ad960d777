use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};
use tracing::debug;

use crate::error::StoreResult;

const SQLITE_PRAGMAS: &[&str] = &["PRAGMA journal_mode=WAL", "PRAGMA synchronous=NORMAL"];

/// Opens a pool against `database_url`. Any failure to reach the store is
/// reported as [`StoreError::StoreUnavailable`](crate::error::StoreError).
pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<DatabaseConnection> {
    let mut opts = ConnectOptions::new(database_url);
    opts.max_connections(max_connections.max(1)).sqlx_logging(false);

    let db = Database::connect(opts).await?;
    debug!(backend = ?db.get_database_backend(), max_connections, "connected to store");

    if db.get_database_backend() == DatabaseBackend::Sqlite && !database_url.contains(":memory:") {
        for pragma in SQLITE_PRAGMAS {
            db.execute(Statement::from_string(DatabaseBackend::Sqlite, pragma.to_string())).await?;
        }
    }

    Ok(db)
}

pub async fn migrate(db: &DatabaseConnection) -> StoreResult<()> {
    Migrator::up(db, None).await?;
    debug!("schema migrations applied");
    Ok(())
}

pub async fn connect_and_migrate(
    database_url: &str,
    max_connections: u32,
) -> StoreResult<DatabaseConnection> {
    let db = connect(database_url, max_connections).await?;
    migrate(&db).await?;
    Ok(db)
}
