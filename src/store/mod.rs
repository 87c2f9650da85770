//! SQLite scan history storage.
//!
//! Persists decoded payloads to a local SQLite database with one table:
//! - scans: id, data (unique), timestamp
//!
//! Supports:
//! - Duplicate-tolerant inserts (the same payload is stored once)
//! - Listing all scans newest first

use rusqlite::{Connection, params};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A persisted scan, as read back for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanRecord {
    pub data: String,
    pub timestamp: i64,
}

/// Whether an insert stored a new row or hit an already-recorded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

/// Get the database path (~/.local/share/qrlog/history.db or platform equivalent)
fn default_db_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let data_dir = directories::ProjectDirs::from("", "", "qrlog")
        .ok_or("Could not determine data directory")?
        .data_dir()
        .to_path_buf();

    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir.join("history.db"))
}

fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS scans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            data TEXT NOT NULL UNIQUE,
            timestamp INTEGER NOT NULL DEFAULT (strftime('%s','now'))
        )",
        [],
    )?;

    Ok(())
}

/// Database handle. Opened once at startup, held for the process lifetime.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        Self::open_at(&default_db_path()?)
    }

    /// Open a database at an explicit path. Used by the config override and tests.
    pub fn open_at(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Store { conn })
    }

    /// Insert a payload with a storage-assigned timestamp.
    ///
    /// The unique constraint on `data` makes this idempotent: scanning the
    /// same code twice leaves the first record untouched and reports
    /// `Duplicate` instead of an error.
    pub fn insert_if_new(&self, data: &str) -> Result<InsertOutcome, Box<dyn std::error::Error>> {
        match self.conn.execute("INSERT INTO scans (data) VALUES (?1)", params![data]) {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// List all scans, newest first. The id tiebreak keeps same-second
    /// inserts in reverse insertion order.
    pub fn list_all_desc(&self) -> Result<Vec<ScanRecord>, Box<dyn std::error::Error>> {
        let mut stmt = self.conn.prepare(
            "SELECT data, timestamp
             FROM scans
             ORDER BY timestamp DESC, id DESC",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(ScanRecord {
                    data: row.get(0)?,
                    timestamp: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp_store() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open_at(&dir.path().join("history.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn insert_assigns_timestamp_in_store() {
        let (_dir, store) = open_temp_store();
        store.insert_if_new("https://example.com").unwrap();

        let records = store.list_all_desc().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "https://example.com");
        assert!(records[0].timestamp > 0);
    }

    #[test]
    fn duplicate_insert_is_a_no_op() {
        let (_dir, store) = open_temp_store();

        assert_eq!(store.insert_if_new("ABC").unwrap(), InsertOutcome::Inserted);
        assert_eq!(store.insert_if_new("ABC").unwrap(), InsertOutcome::Duplicate);

        let records = store.list_all_desc().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data, "ABC");
    }

    #[test]
    fn listing_is_newest_first() {
        let (_dir, store) = open_temp_store();
        store.insert_if_new("first").unwrap();
        store.insert_if_new("second").unwrap();
        store.insert_if_new("third").unwrap();

        let data: Vec<_> = store
            .list_all_desc()
            .unwrap()
            .into_iter()
            .map(|r| r.data)
            .collect();
        assert_eq!(data, vec!["third", "second", "first"]);
    }

    #[test]
    fn empty_store_lists_nothing() {
        let (_dir, store) = open_temp_store();
        assert!(store.list_all_desc().unwrap().is_empty());
    }

    #[test]
    fn schema_creation_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.db");

        let store = Store::open_at(&path).unwrap();
        store.insert_if_new("kept across reopen").unwrap();
        drop(store);

        let reopened = Store::open_at(&path).unwrap();
        assert_eq!(reopened.list_all_desc().unwrap().len(), 1);
    }
}
