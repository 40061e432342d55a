//! SQLite key/value store for the persisted statistics snapshot
//!
//! A single `cache_entries` table keyed by a well-known string. Values are
//! opaque text (JSON in practice); parsing is the caller's concern so that a
//! corrupt value can be treated as a miss rather than a storage error.
//! Uses r2d2 connection pooling to allow concurrent reads without mutex blocking.

use chrono::{DateTime, TimeZone, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse timestamp string from database to DateTime<Utc>
fn parse_db_timestamp(timestamp_str: &str) -> Option<DateTime<Utc>> {
    chrono::NaiveDateTime::parse_from_str(timestamp_str, TIMESTAMP_FORMAT)
        .or_else(|_| chrono::NaiveDateTime::parse_from_str(timestamp_str, "%Y-%m-%d %H:%M:%S"))
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok()
}

/// A stored value with its last write time
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub value: String,
    /// None when the stored timestamp could not be parsed
    pub updated_at: Option<DateTime<Utc>>,
}

/// Thread-safe database wrapper using connection pooling
///
/// WAL mode enables readers to proceed without blocking each other.
pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Open or create a database at the given path with connection pooling
    pub fn open<P: AsRef<Path>>(path: P) -> DatabaseResult<Self> {
        if let Some(parent) = path.as_ref().parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(path)
            .with_init(|conn| {
                conn.execute_batch("
                    PRAGMA journal_mode=WAL;
                    PRAGMA synchronous=NORMAL;
                ")?;
                Ok(())
            });

        let pool = Pool::builder()
            .max_size(4)
            .build(manager)?;

        let db = Self { pool };
        db.setup_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> DatabaseResult<Self> {
        let manager = SqliteConnectionManager::memory();

        // In-memory needs single connection to maintain state
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)?;

        let db = Self { pool };
        db.setup_schema()?;
        Ok(db)
    }

    /// Get a connection from the pool
    fn get_conn(&self) -> DatabaseResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    fn setup_schema(&self) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        conn.execute_batch(r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updatedAt TEXT NOT NULL
            );
        "#)?;
        Ok(())
    }

    /// Read the entry stored under `key`
    pub fn get_entry(&self, key: &str) -> DatabaseResult<Option<CacheEntry>> {
        let conn = self.get_conn()?;
        let result = conn.query_row(
            "SELECT value, updatedAt FROM cache_entries WHERE key = ?1",
            [key],
            |row| {
                let value: String = row.get(0)?;
                let updated_at: String = row.get(1)?;
                Ok(CacheEntry {
                    value,
                    updated_at: parse_db_timestamp(&updated_at),
                })
            },
        );

        match result {
            Ok(entry) => Ok(Some(entry)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert or replace the entry stored under `key`
    pub fn put_entry(
        &self,
        key: &str,
        value: &str,
        updated_at: DateTime<Utc>,
    ) -> DatabaseResult<()> {
        let conn = self.get_conn()?;
        let timestamp_str = updated_at.format(TIMESTAMP_FORMAT).to_string();
        conn.execute(
            "INSERT INTO cache_entries (key, value, updatedAt) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updatedAt = excluded.updatedAt",
            params![key, value, timestamp_str],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.get_entry("statsCache").unwrap().is_none());
    }

    #[test]
    fn test_put_then_get() {
        let db = Database::open_in_memory().unwrap();
        let now = Utc::now();
        db.put_entry("statsCache", r#"{"a":1}"#, now).unwrap();

        let entry = db.get_entry("statsCache").unwrap().unwrap();
        assert_eq!(entry.value, r#"{"a":1}"#);
        let stored = entry.updated_at.unwrap();
        assert!((stored - now).num_milliseconds().abs() < 1000);
    }

    #[test]
    fn test_put_replaces_single_slot() {
        let db = Database::open_in_memory().unwrap();
        db.put_entry("statsCache", "first", Utc::now()).unwrap();
        db.put_entry("statsCache", "second", Utc::now()).unwrap();

        let rows: i64 = db
            .get_conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM cache_entries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
        assert_eq!(db.get_entry("statsCache").unwrap().unwrap().value, "second");
    }

    #[test]
    fn test_file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dashboard.sqlite");
        {
            let db = Database::open(&path).unwrap();
            db.put_entry("statsCache", "kept", Utc::now()).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.get_entry("statsCache").unwrap().unwrap().value, "kept");
    }

    #[test]
    fn test_parse_db_timestamp_formats() {
        assert!(parse_db_timestamp("2026-01-02 03:04:05.678").is_some());
        assert!(parse_db_timestamp("2026-01-02 03:04:05").is_some());
        assert!(parse_db_timestamp("yesterday").is_none());
    }
}
