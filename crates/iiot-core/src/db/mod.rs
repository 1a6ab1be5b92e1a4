//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `readings` - Sensor reading storage, history and demo data
//! - `alerts` - Alert log for escalated insights

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use tracing::info;

use crate::error::Result;

mod alerts;
mod readings;

#[cfg(test)]
mod tests;

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Format used for every timestamp column
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Parse the datetime text stored in column `idx`
pub(crate) fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| dt.and_utc())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// A text column holding a value the schema does not allow
pub(crate) fn invalid_text(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, msg.into())
}

pub(crate) fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format(DATETIME_FORMAT).to_string()
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because every pooled
    /// connection would otherwise see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir()
            .join(format!("iiot_test_{}_{}.db", std::process::id(), id))
            .to_string_lossy()
            .into_owned();

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block the writer
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;

            -- Sensor readings (one row per observation)
            CREATE TABLE IF NOT EXISTS sensor_readings (
                id INTEGER PRIMARY KEY,
                sensor_type TEXT NOT NULL,
                sensor_name TEXT NOT NULL,
                value REAL NOT NULL,
                unit TEXT NOT NULL DEFAULT '',
                location TEXT,
                observed_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_readings_type_time
                ON sensor_readings(sensor_type, observed_at);
            CREATE INDEX IF NOT EXISTS idx_readings_time ON sensor_readings(observed_at);

            -- Alerts raised from insights
            CREATE TABLE IF NOT EXISTS alerts (
                id INTEGER PRIMARY KEY,
                recipient TEXT NOT NULL,
                sensor_name TEXT NOT NULL,
                message TEXT NOT NULL,
                value REAL,
                unit TEXT,
                alert_level TEXT NOT NULL,
                delivered BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_alerts_created ON alerts(created_at);
            "#,
        )?;

        info!(path = %self.db_path, "Database migrations complete");
        Ok(())
    }
}
