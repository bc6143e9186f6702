// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{KhataError, KhataResult};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "MandiKhata", "mandi"));

/// Key-value persistence for the serialized collections.
///
/// `put_many` must apply all entries or none.
pub trait BlobStore {
    fn get(&self, key: &str) -> KhataResult<Option<String>>;
    fn put_many(&mut self, entries: &[(&str, String)]) -> KhataResult<()>;

    fn put(&mut self, key: &str, value: String) -> KhataResult<()> {
        self.put_many(&[(key, value)])
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}

/// `MANDI_DB` wins over the configured directory, which wins over the platform default.
pub fn db_path(data_dir: Option<&Path>) -> Result<PathBuf> {
    if let Ok(p) = std::env::var("MANDI_DB") {
        if !p.trim().is_empty() {
            return Ok(PathBuf::from(p.trim()));
        }
    }
    let dir = match data_dir {
        Some(d) => d.to_path_buf(),
        None => default_data_dir()?,
    };
    fs::create_dir_all(&dir).context("Failed to create data dir")?;
    Ok(dir.join("mandi.sqlite"))
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn =
            Connection::open(path).with_context(|| format!("Open DB at {}", path.display()))?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    CREATE TABLE IF NOT EXISTS kv(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    )?;
    Ok(())
}

impl BlobStore for SqliteStore {
    fn get(&self, key: &str) -> KhataResult<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        Ok(v)
    }

    fn put_many(&mut self, entries: &[(&str, String)]) -> KhataResult<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT INTO kv(key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

/// In-process backend. `set_failing(true)` makes every write fail, the way a
/// full or unavailable storage would.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    failing: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    pub fn insert_raw(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> KhataResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put_many(&mut self, entries: &[(&str, String)]) -> KhataResult<()> {
        if self.failing {
            return Err(KhataError::Persistence("storage unavailable".into()));
        }
        for (key, value) in entries {
            self.entries.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
