pub mod attendee_repo;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::StoreError;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn connect(database_url: &str) -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new().connect(database_url).await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

/// Private in-memory database. A single connection that never expires, since
/// every new sqlite memory connection starts from an empty database.
pub async fn connect_in_memory() -> Result<SqlitePool, StoreError> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}
