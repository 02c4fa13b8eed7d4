//! Database module for Online Clipboard
//! Keeps a local SQLite history of keys saved from this machine

use crate::constants::{HISTORY_PREVIEW_CHARS, SERVER_TTL_SECS};
use crate::utils::preview_snippet;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Result};
use std::path::Path;
use tracing::debug;

/// A key this client received from the backend
#[derive(Debug, Clone, PartialEq)]
pub struct SavedKey {
    pub key: String,
    pub preview: String,
    pub saved_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SavedKey {
    pub fn remaining(&self, now: DateTime<Utc>) -> chrono::Duration {
        self.expires_at - now
    }
}

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path = %path.display(), "Database opened");
        Ok(db)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS saved_keys (
                key TEXT PRIMARY KEY,
                preview TEXT NOT NULL,
                saved_at INTEGER NOT NULL,
                expires_at INTEGER NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_saved_keys_saved_at ON saved_keys(saved_at);",
        )?;
        Ok(())
    }

    /// Remember a key issued for `text` at `now`. A reissued key replaces the old row.
    pub fn record_saved(&self, key: &str, text: &str, now: DateTime<Utc>) -> Result<SavedKey> {
        let entry = SavedKey {
            key: key.to_string(),
            preview: preview_snippet(text, HISTORY_PREVIEW_CHARS),
            saved_at: now,
            expires_at: now + chrono::Duration::seconds(SERVER_TTL_SECS),
        };
        self.conn.execute(
            "INSERT INTO saved_keys (key, preview, saved_at, expires_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                preview = excluded.preview,
                saved_at = excluded.saved_at,
                expires_at = excluded.expires_at",
            params![
                entry.key,
                entry.preview,
                entry.saved_at.timestamp(),
                entry.expires_at.timestamp()
            ],
        )?;
        debug!(key = %entry.key, "Saved key recorded");
        Ok(entry)
    }

    /// Unexpired keys, newest first
    pub fn recent_keys(&self, now: DateTime<Utc>, limit: usize) -> Result<Vec<SavedKey>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, preview, saved_at, expires_at
             FROM saved_keys
             WHERE expires_at > ?1
             ORDER BY saved_at DESC, rowid DESC
             LIMIT ?2",
        )?;

        let keys = stmt
            .query_map(params![now.timestamp(), limit as i64], |row| {
                Ok(SavedKey {
                    key: row.get(0)?,
                    preview: row.get(1)?,
                    saved_at: from_timestamp(row.get(2)?),
                    expires_at: from_timestamp(row.get(3)?),
                })
            })?
            .collect::<Result<Vec<_>>>()?;

        Ok(keys)
    }

    /// Delete expired rows, returning how many went
    pub fn prune_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let removed = self.conn.execute(
            "DELETE FROM saved_keys WHERE expires_at <= ?1",
            params![now.timestamp()],
        )?;
        if removed > 0 {
            debug!(removed = removed, "Expired keys pruned");
        }
        Ok(removed)
    }

    pub fn clear_history(&self) -> Result<()> {
        self.conn.execute("DELETE FROM saved_keys", [])?;
        Ok(())
    }
}

fn from_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(DateTime::UNIX_EPOCH)
}
