//! Database connection management
//!
//! This module provides the connection handle passed to every component.
//! There is exactly one per run; it is acquired when the storage file is
//! opened and released by [`DatabaseConn::close`].

use anyhow::{anyhow, Result};
use rusqlite::Connection;
use tracing::debug;

/// Core database connection wrapper
///
/// `DatabaseConn` provides a thin wrapper around a SQLite connection,
/// handling both file-based and in-memory databases with consistent
/// configuration and error handling.
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created. A missing
    /// file is created by the storage engine.
    pub fn open(path: Option<&str>, enforce_foreign_keys: bool) -> Result<Self> {
        let conn = match path {
            Some(p) => Connection::open(p)
                .map_err(|e| anyhow!("Failed to open database at '{}': {}", p, e))?,
            None => Connection::open_in_memory()
                .map_err(|e| anyhow!("Failed to create in-memory database: {}", e))?,
        };

        let db = DatabaseConn { conn };
        db.configure(enforce_foreign_keys)?;
        Ok(db)
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None, false)
    }

    fn configure(&self, enforce_foreign_keys: bool) -> Result<()> {
        let pragma = if enforce_foreign_keys {
            "PRAGMA foreign_keys=ON"
        } else {
            "PRAGMA foreign_keys=OFF"
        };
        self.conn
            .execute(pragma, [])
            .map_err(|e| anyhow!("Failed to configure foreign keys: {}", e))?;
        debug!(enforce_foreign_keys, "configured database connection");
        Ok(())
    }

    /// Execute a SQL statement
    pub fn execute(&self, sql: &str) -> Result<usize> {
        self.conn
            .execute(sql, [])
            .map_err(|e| anyhow!("Failed to execute SQL: {}", e))
    }

    /// Count rows whose foreign keys point at a missing parent row
    ///
    /// Works whether or not enforcement is turned on for this connection.
    pub fn foreign_key_violations(&self) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare("PRAGMA foreign_key_check")
            .map_err(|e| anyhow!("Failed to prepare foreign key check: {}", e))?;
        let mut rows = stmt
            .query([])
            .map_err(|e| anyhow!("Failed to run foreign key check: {}", e))?;

        let mut count = 0;
        while rows
            .next()
            .map_err(|e| anyhow!("Failed to read foreign key check: {}", e))?
            .is_some()
        {
            count += 1;
        }
        Ok(count)
    }

    /// Close the connection, surfacing any error from the storage engine
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| anyhow!("Failed to close database: {}", e))
    }
}

/// Quote a table or column name so it is never parsed as SQL
///
/// Grave accents are used because SQLite may read an unknown double-quoted
/// name as a string literal.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
