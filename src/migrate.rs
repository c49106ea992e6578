use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::error::Result;

/// Create the `files` table if it does not exist yet.
///
/// Status is stored as an integer (`1` complete, `0` retry, `-1` failed) and
/// `timestamp` as unix seconds. Safe to call any number of times.
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS files (
            source_id INTEGER NOT NULL,
            filename TEXT NOT NULL,
            hashsum TEXT NOT NULL,
            status INTEGER NOT NULL,
            timestamp INTEGER NOT NULL,
            PRIMARY KEY (source_id, filename)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::connect(config).await?;
    create_schema(&pool).await?;
    pool.close().await;
    Ok(())
}
