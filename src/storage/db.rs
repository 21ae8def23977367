//! SQLite storage layer.
//!
//! `Database` wraps a single connection and is the only way the rest of
//! the program touches the store. It is an explicit owned value: callers
//! that need the store take it as a parameter, and dropping it closes the
//! connection.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::path::Path;

use super::models::ImageRecord;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens the database at `path`, creating the file if absent. The
    /// `images` table is not created here; schema setup happens at the
    /// start of each import (see [`Database::ensure_schema`]).
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open database {}", path.display()))?;
        Ok(Self { conn })
    }

    /// Closes the connection, surfacing any pending SQLite error.
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_conn, err)| anyhow::Error::new(err).context("failed to close database"))
    }

    // ==================== Schema ====================

    /// Creates the `images` table if it does not exist. Safe to call on
    /// every import.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS images (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    category TEXT,
                    data BLOB NOT NULL
                );
                "#,
            )
            .context("failed to create images table")
    }

    /// Reports whether the `images` table exists yet. A freshly opened
    /// store has no tables until the first import runs.
    pub fn has_images_table(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'images'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ==================== Transactions ====================
    //
    // Explicit statements rather than rusqlite's scoped transaction type:
    // the import walk stages inserts across a long loop and decides
    // commit/rollback itself.

    /// Begins a transaction. Inserts issued before [`Database::commit`]
    /// are invisible to other connections and are discarded by
    /// [`Database::rollback`].
    pub fn begin(&self) -> Result<()> {
        self.conn
            .execute_batch("BEGIN")
            .context("failed to begin transaction")
    }

    pub fn commit(&self) -> Result<()> {
        self.conn
            .execute_batch("COMMIT")
            .context("failed to commit transaction")
    }

    pub fn rollback(&self) -> Result<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .context("failed to roll back transaction")
    }

    // ==================== Images ====================

    /// Inserts a new image record. The id is assigned by SQLite.
    pub fn insert_image(&self, name: &str, category: &str, data: &[u8]) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO images (name, category, data) VALUES (?1, ?2, ?3)",
                params![name, category, data],
            )
            .with_context(|| format!("failed to insert image '{name}'"))?;
        Ok(())
    }

    /// Total number of stored image records.
    pub fn image_count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }

    /// All image records, in insertion (id) order.
    pub fn list_images(&self) -> Result<Vec<ImageRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, category, data FROM images ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(ImageRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                category: row.get(2)?,
                data: row.get(3)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>()
            .context("failed to list images")
    }
}
