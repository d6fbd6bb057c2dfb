//! Local override store (`SQLite`-backed key-value storage)
//!
//! Holds the fields that live only on this device and never round-trip
//! through the server. Today that is a single key: the profile phone number.
//! Last write wins; clearing the store silently drops the override.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::PathBuf;

use crate::paths;

const PHONE_KEY: &str = "phone";

/// Store connection wrapper
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create the store at the default location
    pub fn open() -> Result<Self> {
        let path = Self::default_path()?;
        Self::open_path(&path)
    }

    /// Open or create the store at a specific path
    pub fn open_path(path: &PathBuf) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
        }

        let conn = Connection::open(path).context("Failed to open override store")?;

        let store = Self { conn };
        store.init()?;

        Ok(store)
    }

    /// Get the default store path
    pub fn default_path() -> Result<PathBuf> {
        paths::store_path()
    }

    /// Initialize the schema
    fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS overrides (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        Ok(())
    }

    /// Read the locally stored phone override
    pub fn phone(&self) -> Result<Option<String>> {
        self.get(PHONE_KEY)
    }

    /// Write the phone override; `None` removes it
    pub fn set_phone(&self, phone: Option<&str>) -> Result<()> {
        self.set(PHONE_KEY, phone)
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM overrides WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .context("Failed to read override")
    }

    fn set(&self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => {
                self.conn.execute(
                    "INSERT INTO overrides (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![key, value],
                )?;
            }
            None => {
                self.conn
                    .execute("DELETE FROM overrides WHERE key = ?1", params![key])?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_store_init() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let _store = Store::open_path(&path).unwrap();
        // Should create without error
    }

    #[test]
    fn test_phone_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");
        let store = Store::open_path(&path).unwrap();

        assert_eq!(store.phone().unwrap(), None);

        store.set_phone(Some("+628123456")).unwrap();
        assert_eq!(store.phone().unwrap().as_deref(), Some("+628123456"));

        // Last write wins
        store.set_phone(Some("+15550100")).unwrap();
        assert_eq!(store.phone().unwrap().as_deref(), Some("+15550100"));

        store.set_phone(None).unwrap();
        assert_eq!(store.phone().unwrap(), None);
    }

    #[test]
    fn test_override_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.sqlite");

        {
            let store = Store::open_path(&path).unwrap();
            store.set_phone(Some("+628123456")).unwrap();
        }

        let store = Store::open_path(&path).unwrap();
        assert_eq!(store.phone().unwrap().as_deref(), Some("+628123456"));
    }
}
