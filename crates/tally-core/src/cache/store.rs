use super::schema::{DB_FILE, DDL};
use super::CacheError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// 10 GiB.
pub const DEFAULT_SIZE_LIMIT: u64 = 10 * (1 << 30);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub path: PathBuf,
    pub entries: u64,
    pub volume: u64,
    pub size_limit: u64,
}

/// Size-bounded key/value store for model responses.
///
/// When the stored volume (key + value bytes) exceeds `size_limit`, entries are
/// evicted least-recently-stored first.
pub struct ResponseCache {
    conn: Connection,
    dir: PathBuf,
    size_limit: u64,
}

impl ResponseCache {
    pub fn open(dir: &Path, size_limit: u64) -> Result<Self, CacheError> {
        std::fs::create_dir_all(dir).map_err(|source| CacheError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let conn = Connection::open(dir.join(DB_FILE))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        let _ = conn.execute("PRAGMA journal_mode = WAL", []);
        conn.execute_batch(DDL)?;
        Ok(Self {
            conn,
            dir: dir.to_path_buf(),
            size_limit,
        })
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM responses WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Store `value` under `key`, replacing any previous value, then evict until
    /// the volume is back under the limit.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CacheError> {
        let size = (key.len() + value.len()) as i64;
        let stored_at = chrono::Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM responses WHERE key = ?1", params![key])?;
        tx.execute(
            "INSERT INTO responses (key, value, size, stored_at) VALUES (?1, ?2, ?3, ?4)",
            params![key, value, size, stored_at],
        )?;

        let mut volume: i64 =
            tx.query_row("SELECT COALESCE(SUM(size), 0) FROM responses", [], |r| {
                r.get(0)
            })?;
        let mut evicted = 0u64;
        while volume.max(0) as u64 > self.size_limit {
            let removed: Option<i64> = tx
                .query_row(
                    "DELETE FROM responses WHERE id = (SELECT MIN(id) FROM responses) RETURNING size",
                    [],
                    |r| r.get(0),
                )
                .optional()?;
            let Some(size) = removed else { break };
            volume -= size;
            evicted += 1;
        }
        tx.commit()?;

        if evicted > 0 {
            debug!(evicted, size_limit = self.size_limit, "cache eviction");
        }
        Ok(())
    }

    pub fn len(&self) -> Result<u64, CacheError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |r| r.get(0))?;
        Ok(n as u64)
    }

    pub fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len()? == 0)
    }

    /// Bytes of keys and values currently stored.
    pub fn volume(&self) -> Result<u64, CacheError> {
        let v: i64 = self
            .conn
            .query_row("SELECT COALESCE(SUM(size), 0) FROM responses", [], |r| {
                r.get(0)
            })?;
        Ok(v as u64)
    }

    /// Remove every entry; returns how many were removed.
    pub fn clear(&mut self) -> Result<u64, CacheError> {
        let removed = self.conn.execute("DELETE FROM responses", [])?;
        Ok(removed as u64)
    }

    pub fn stats(&self) -> Result<CacheStats, CacheError> {
        Ok(CacheStats {
            path: self.dir.clone(),
            entries: self.len()?,
            volume: self.volume()?,
            size_limit: self.size_limit,
        })
    }
}
