//! SQLite-backed [`TrackingStore`] implementation.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::config::Config;
use crate::db;
use crate::error::Result;
use crate::migrate;
use crate::models::{FileRecord, FileStatus};

use super::TrackingStore;

/// SQLite implementation of the [`TrackingStore`] trait.
///
/// Wraps a [`SqlitePool`]; each method acquires a pooled connection for one
/// statement and returns it immediately.
pub struct SqliteTrackingStore {
    pool: SqlitePool,
}

impl SqliteTrackingStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the database named in `[db].path` and ensure the schema.
    pub async fn open(config: &Config) -> Result<Self> {
        let store = Self::new(db::connect(config).await?);
        store.ensure_initialized().await?;
        Ok(store)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn row_to_record(row: &sqlx::sqlite::SqliteRow) -> Result<FileRecord> {
    Ok(FileRecord {
        source_id: row.try_get("source_id")?,
        filename: row.try_get("filename")?,
        fingerprint: row.try_get("hashsum")?,
        status: FileStatus::from_i64(row.try_get("status")?)?,
        updated_at: row.try_get("timestamp")?,
    })
}

#[async_trait]
impl TrackingStore for SqliteTrackingStore {
    async fn ensure_initialized(&self) -> Result<()> {
        migrate::create_schema(&self.pool).await
    }

    async fn lookup(&self, source_id: i64, filename: &str) -> Result<Option<FileRecord>> {
        let row = sqlx::query(
            "SELECT source_id, filename, hashsum, status, timestamp FROM files WHERE source_id = ? AND filename = ?",
        )
        .bind(source_id)
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn upsert(
        &self,
        source_id: i64,
        filename: &str,
        fingerprint: &str,
        status: FileStatus,
        timestamp: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO files (source_id, filename, hashsum, status, timestamp)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(source_id, filename) DO UPDATE SET
                hashsum = excluded.hashsum,
                status = excluded.status,
                timestamp = excluded.timestamp
            "#,
        )
        .bind(source_id)
        .bind(filename)
        .bind(fingerprint)
        .bind(status.as_i64())
        .bind(timestamp)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list(&self, source_id: Option<i64>) -> Result<Vec<FileRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT source_id, filename, hashsum, status, timestamp FROM files
            WHERE (? IS NULL OR source_id = ?)
            ORDER BY source_id, filename
            "#,
        )
        .bind(source_id)
        .bind(source_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_record).collect()
    }
}
