//! String key-value persistence.
//!
//! Every record the app keeps is a JSON string under a fixed key, so the
//! backends only need get/set/remove plus one atomic read-modify-write.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

use super::data_dir;
use crate::error::{CoreError, StorageError};

/// Computes the new value for a key from its current one. Returning an
/// error aborts the write.
pub type Modify<'a> = dyn FnMut(Option<String>) -> Result<String, StorageError> + 'a;

pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Read `key`, pass it to `f` and store the result, with no other
    /// writer able to touch `key` in between.
    fn modify(&self, key: &str, f: &mut Modify<'_>) -> Result<(), StorageError>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
    fn modify(&self, key: &str, f: &mut Modify<'_>) -> Result<(), StorageError> {
        (**self).modify(key, f)
    }
}

/// In-process store, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }

    fn modify(&self, key: &str, f: &mut Modify<'_>) -> Result<(), StorageError> {
        let mut entries = self.entries();
        let value = f(entries.get(key).cloned())?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

/// SQLite-backed store with a single `kv` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open the store at `~/.config/rooted/rooted.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("rooted.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open (creating if needed) a database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let value = stmt
            .query_row(params![key], |row| row.get::<_, String>(0))
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        tracing::debug!(key, bytes = value.len(), "kv write");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    fn modify(&self, key: &str, f: &mut Modify<'_>) -> Result<(), StorageError> {
        // IMMEDIATE takes the write lock up front so no other connection can
        // commit between our read and our write.
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let current = tx
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        let value = f(current)?;
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        tx.commit()?;
        tracing::debug!(key, bytes = value.len(), "kv modify");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(store: &dyn KvStore) {
        assert!(store.get("test").unwrap().is_none());
        store.set("test", "hello").unwrap();
        assert_eq!(store.get("test").unwrap().as_deref(), Some("hello"));
        store.set("test", "again").unwrap();
        assert_eq!(store.get("test").unwrap().as_deref(), Some("again"));
        store.remove("test").unwrap();
        assert!(store.get("test").unwrap().is_none());

        store
            .modify("count", &mut |cur| {
                assert!(cur.is_none());
                Ok("1".into())
            })
            .unwrap();
        store
            .modify("count", &mut |cur| {
                let n: u32 = cur.unwrap().parse().unwrap();
                Ok((n + 1).to_string())
            })
            .unwrap();
        assert_eq!(store.get("count").unwrap().as_deref(), Some("2"));

        let err = store
            .modify("count", &mut |_| Err(StorageError::Locked))
            .unwrap_err();
        assert!(matches!(err, StorageError::Locked));
        assert_eq!(store.get("count").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn memory_store() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn sqlite_store() {
        exercise(&SqliteStore::open_in_memory().unwrap());
    }

    #[test]
    fn sqlite_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooted.db");
        SqliteStore::open_at(&path)
            .unwrap()
            .set("rootedUser", "{}")
            .unwrap();
        let reopened = SqliteStore::open_at(&path).unwrap();
        assert_eq!(reopened.get("rootedUser").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn sqlite_modify_holds_write_lock() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rooted.db");
        let first = SqliteStore::open_at(&path).unwrap();
        let second = SqliteStore::open_at(&path).unwrap();
        second.conn.busy_timeout(std::time::Duration::ZERO).unwrap();
        first.set("k", "a").unwrap();

        first
            .modify("k", &mut |cur| {
                assert!(matches!(second.set("k", "other"), Err(StorageError::Locked)));
                Ok(format!("{}b", cur.unwrap_or_default()))
            })
            .unwrap();
        assert_eq!(second.get("k").unwrap().as_deref(), Some("ab"));
    }

    #[test]
    fn open_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = SqliteStore::open_at(dir.path()).err().unwrap();
        assert!(matches!(err, StorageError::OpenFailed { .. } | StorageError::QueryFailed(_)));
    }
}
