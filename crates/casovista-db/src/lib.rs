// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use casovista_app::SettingKey;
use rusqlite::{Connection, OptionalExtension, params};
use std::env;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS settings (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  updated_at TEXT NOT NULL
);
";

const REQUIRED_SCHEMA: [(&str, &[&str]); 1] = [("settings", &["key", "value", "updated_at"])];

/// Directory name under the platform config and data roots.
pub const APP_NAME: &str = "casovista";

/// SQLite-backed store for the viewer's persistent settings. One table,
/// last write wins.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open(path: &Path) -> Result<Self> {
        validate_db_path(&path.to_string_lossy())?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create data directory {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("open database {}", path.display()))?;
        configure(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory database")?;
        configure(&conn)?;
        Ok(Self { conn })
    }

    /// Creates the schema when absent and verifies the required columns
    /// exist. Safe to call on every startup.
    pub fn bootstrap(&self) -> Result<()> {
        self.conn
            .execute_batch(SCHEMA)
            .context("create settings schema")?;
        self.validate_schema()
    }

    fn validate_schema(&self) -> Result<()> {
        for (table, required) in REQUIRED_SCHEMA {
            let mut statement = self
                .conn
                .prepare(&format!("PRAGMA table_info({table})"))
                .with_context(|| format!("inspect table `{table}`"))?;
            let present: Vec<String> = statement
                .query_map([], |row| row.get::<_, String>(1))
                .with_context(|| format!("read columns of `{table}`"))?
                .collect::<rusqlite::Result<_>>()?;

            let missing: Vec<&str> = required
                .iter()
                .copied()
                .filter(|column| !present.iter().any(|name| name == column))
                .collect();
            if !missing.is_empty() {
                bail!(
                    "table `{table}` is missing required columns: {} -- delete the database file and restart",
                    missing.join(", ")
                );
            }
        }
        Ok(())
    }

    pub fn get_setting_raw(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("read setting {key}"))
    }

    pub fn put_setting_raw(&self, key: &str, value: &str) -> Result<()> {
        let updated_at = now_text()?;
        self.conn
            .execute(
                "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value,
                                                updated_at = excluded.updated_at",
                params![key, value, updated_at],
            )
            .with_context(|| format!("write setting {key}"))?;
        Ok(())
    }

    pub fn delete_setting_raw(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM settings WHERE key = ?", params![key])
            .with_context(|| format!("delete setting {key}"))?;
        Ok(())
    }

    /// The persisted active-user name; empty string when never set.
    pub fn active_user(&self) -> Result<String> {
        Ok(self
            .get_setting_raw(SettingKey::UserDisplayName.as_str())?
            .unwrap_or_default())
    }

    pub fn set_active_user(&self, name: &str) -> Result<()> {
        self.put_setting_raw(SettingKey::UserDisplayName.as_str(), name)
    }

    pub fn clear_active_user(&self) -> Result<()> {
        self.delete_setting_raw(SettingKey::UserDisplayName.as_str())
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }
}

fn configure(conn: &Connection) -> Result<()> {
    conn.pragma_update(None, "journal_mode", "WAL")
        .context("enable WAL journal mode")?;
    conn.pragma_update(None, "busy_timeout", 5_000)
        .context("set busy timeout")?;
    Ok(())
}

fn now_text() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format timestamp")
}

pub fn default_db_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("CASOVISTA_DB_PATH") {
        return Ok(PathBuf::from(override_path));
    }
    let base = dirs::data_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set CASOVISTA_DB_PATH to a writable database path")
    })?;
    Ok(base.join(APP_NAME).join("casovista.db"))
}

/// Plain filesystem paths only; SQLite URI forms and query strings change
/// open semantics and are rejected up front.
pub fn validate_db_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        bail!("database path must not be empty");
    }
    if path.starts_with("file:") || path.contains("://") {
        bail!("database path {path:?} looks like a URI -- use a plain file path");
    }
    if path.contains('?') {
        bail!("database path {path:?} must not carry query parameters");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Store;

    #[test]
    fn unset_active_user_reads_as_empty() {
        let store = Store::open_memory().expect("open in-memory store");
        store.bootstrap().expect("bootstrap");
        assert_eq!(store.active_user().expect("read user"), "");
    }

    #[test]
    fn active_user_round_trip_and_delete() {
        let store = Store::open_memory().expect("open in-memory store");
        store.bootstrap().expect("bootstrap");

        store.set_active_user("Jordan").expect("write user");
        assert_eq!(store.active_user().expect("read user"), "Jordan");

        store.set_active_user("Riley").expect("overwrite user");
        assert_eq!(store.active_user().expect("read user"), "Riley");

        store.clear_active_user().expect("delete user");
        assert_eq!(store.active_user().expect("read user"), "");
    }

    #[test]
    fn bootstrap_is_idempotent() {
        let store = Store::open_memory().expect("open in-memory store");
        store.bootstrap().expect("first bootstrap");
        store.set_active_user("Jordan").expect("write user");
        store.bootstrap().expect("second bootstrap");
        assert_eq!(store.active_user().expect("read user"), "Jordan");
    }
}
