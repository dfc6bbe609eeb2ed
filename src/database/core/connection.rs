//! Database connection management
//!
//! Every data-access operation opens its own connection through
//! [`DatabaseConn::connect`] and releases it when the wrapper is dropped, so
//! the connection is closed on every exit path, including early returns via `?`.

use super::error::DataError;
use rusqlite::Connection;
use serde::Serialize;
use tracing::debug;

/// Connection parameters, built once from configuration and passed explicitly
/// to every operation that needs the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionParams {
    /// Path to the SQLite database file
    pub path: String,
}

impl ConnectionParams {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Standard database file inside a data directory: `{data_dir}/{name}.sqlite3`
    pub fn in_dir(data_dir: &str, database_name: &str) -> Self {
        let data_dir = data_dir.trim_end_matches('/');
        Self::new(format!("{}/{}.sqlite3", data_dir, database_name))
    }
}

/// Core database connection wrapper
///
/// `DatabaseConn` is a thin scoped wrapper around a SQLite connection with the
/// settings foodshare relies on (most importantly, enforced foreign keys).
pub struct DatabaseConn {
    pub conn: Connection,
}

impl DatabaseConn {
    /// Open a fresh connection described by `params`
    ///
    /// Failure to open or configure the file is reported as
    /// [`DataError::Connectivity`].
    pub fn connect(params: &ConnectionParams) -> Result<Self, DataError> {
        debug!(path = %params.path, "opening database connection");
        let conn =
            Connection::open(&params.path).map_err(|e| DataError::connect(&params.path, e))?;

        let db = DatabaseConn { conn };
        db.configure()
            .map_err(|e| DataError::connect(&params.path, e))?;
        Ok(db)
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self, DataError> {
        let conn = Connection::open_in_memory().map_err(|e| DataError::connect(":memory:", e))?;
        let db = DatabaseConn { conn };
        db.configure()
            .map_err(|e| DataError::connect(":memory:", e))?;
        Ok(db)
    }

    fn configure(&self) -> rusqlite::Result<()> {
        // WAL for concurrent readers; in-memory databases answer "memory"
        let _: String = self
            .conn
            .query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;

        self.conn.execute("PRAGMA synchronous=NORMAL", [])?;
        self.conn.execute("PRAGMA temp_store=MEMORY", [])?;

        // Cascading deletes and reference checks are the store's job
        self.conn.execute("PRAGMA foreign_keys=ON", [])?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = DatabaseConn::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_connect_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let params = ConnectionParams::in_dir(dir.path().to_str().unwrap(), "test");

        let db = DatabaseConn::connect(&params);
        assert!(db.is_ok());
        assert!(std::path::Path::new(&params.path).exists());
    }

    #[test]
    fn test_connect_unreachable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("nested").join("db.sqlite3");
        let params = ConnectionParams::new(path.to_str().unwrap());

        match DatabaseConn::connect(&params) {
            Err(e) => assert!(e.is_connectivity()),
            Ok(_) => panic!("expected connectivity error"),
        }
    }

    #[test]
    fn test_connect_not_a_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.sqlite3");
        std::fs::write(&path, b"this is definitely not a sqlite file, just plain text")
            .unwrap();
        let params = ConnectionParams::new(path.to_str().unwrap());

        match DatabaseConn::connect(&params) {
            Err(e) => assert!(e.is_connectivity()),
            Ok(_) => panic!("expected connectivity error"),
        }
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let enabled: i32 = db
            .conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_in_dir_trims_trailing_slash() {
        let params = ConnectionParams::in_dir("/tmp/data/", "foodshare");
        assert_eq!(params.path, "/tmp/data/foodshare.sqlite3");
    }
}
