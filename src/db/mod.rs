//! SQLite backing store for configuration rows.

use crate::config::ConfigStore;
use crate::error::{ConfigError, Result};
use crate::types::ConfigRecord;
use rusqlite::{Connection, OpenFlags, params};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Query used to fetch every configuration row.
pub const FETCH_ALL_CONFIG: &str = "SELECT Id, Name, Value, Category FROM Config ORDER BY Id ASC";

/// Database handle wrapping a SQLite connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open the database at the given path. The `Config` table is not created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA busy_timeout=5000;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an existing database without write access. Never creates a file.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.execute_batch("PRAGMA busy_timeout=5000;")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory database with an empty `Config` table (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.ensure_table()?;
        Ok(db)
    }

    /// Create the `Config` table if it does not exist.
    pub fn ensure_table(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS Config (
                    Id INTEGER PRIMARY KEY,
                    Name TEXT NOT NULL,
                    Value TEXT NOT NULL DEFAULT '',
                    Category TEXT NOT NULL DEFAULT ''
                );",
            )?;
            Ok(())
        })
    }

    /// Execute a function with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|_| ConfigError::store("connection lock poisoned"))?;
        f(&conn)
    }

    /// Append a configuration row, returning its id.
    pub fn insert_config(&self, name: &str, value: &str, category: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO Config (Name, Value, Category) VALUES (?1, ?2, ?3)",
                params![name, value, category],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }
}

impl ConfigStore for Database {
    fn fetch_all_config(&self) -> Result<Vec<ConfigRecord>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(FETCH_ALL_CONFIG)?;
            let rows = stmt.query_map([], |row| {
                let id: i64 = row.get(0)?;
                let name: String = row.get(1)?;
                let value: Option<String> = row.get(2)?;
                let category: Option<String> = row.get(3)?;
                Ok(ConfigRecord::from_store(
                    id,
                    name,
                    value.unwrap_or_default(),
                    category.unwrap_or_default(),
                ))
            })?;
            let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_orders_by_id() {
        let db = Database::open_in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO Config (Id, Name, Value, Category) VALUES (5, 'B', '2', 'web')",
                [],
            )?;
            conn.execute(
                "INSERT INTO Config (Id, Name, Value, Category) VALUES (1, 'A', '1', 'system')",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let rows = db.fetch_all_config().unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 5]);
        assert_eq!(rows[0].category, "system");
    }

    #[test]
    fn test_missing_table_is_store_unavailable() {
        let temp = tempfile::TempDir::new().unwrap();
        let db = Database::open(temp.path().join("empty.db")).unwrap();
        let err = db.fetch_all_config().unwrap_err();
        assert!(matches!(err, ConfigError::StoreUnavailable(_)));
    }

    #[test]
    fn test_read_only_open_does_not_create_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("zm.db");

        assert!(Database::open_read_only(&path).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_read_only_open_reads_rows() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("zm.db");
        let db = Database::open(&path).unwrap();
        db.ensure_table().unwrap();
        db.insert_config("ZM_LANG_DEFAULT", "en_gb", "system").unwrap();
        drop(db);

        let db = Database::open_read_only(&path).unwrap();
        let rows = db.fetch_all_config().unwrap();
        assert_eq!(rows.len(), 1);
        assert!(db.insert_config("A", "1", "system").is_err());
    }

    #[test]
    fn test_insert_returns_increasing_ids() {
        let db = Database::open_in_memory().unwrap();
        let a = db.insert_config("A", "1", "system").unwrap();
        let b = db.insert_config("B", "2", "system").unwrap();
        assert!(b > a);
    }
}
