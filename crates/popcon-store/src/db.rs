//! Database connection management

#![allow(clippy::result_large_err)]

use crate::errors::{from_rusqlite, Result};
use crate::migrations::apply_migrations;
use popcon_core::errors::{ExError, ExErrorKind};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Connection-string schemes that resolve to a local SQLite file
const SQLITE_SCHEMES: [&str; 2] = ["sqlite_file:", "sqlite:"];

/// Open a SQLite database at the given path
pub fn open<P: AsRef<Path>>(path: P) -> Result<Connection> {
    Connection::open(path).map_err(from_rusqlite)
}

/// Open an in-memory SQLite database (for testing)
pub fn open_in_memory() -> Result<Connection> {
    Connection::open_in_memory().map_err(from_rusqlite)
}

/// Configure a connection with ledger settings
pub fn configure(conn: &Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(from_rusqlite)?;

    // WAL keeps readers going while a cycle commits
    conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
        .map_err(from_rusqlite)?;

    Ok(())
}

/// Open, configure and migrate a ledger file
pub fn open_ledger<P: AsRef<Path>>(path: P) -> Result<Connection> {
    let mut conn = open(path)?;
    configure(&conn)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

/// Resolve a destination connection string to a SQLite file path.
///
/// Only local SQLite destinations are supported (`sqlite_file:<path>` or
/// `sqlite:<path>`); remote schemes such as `oracle://` or `frontier://`
/// are rejected.
pub fn resolve_connect(connect: &str) -> Result<PathBuf> {
    SQLITE_SCHEMES
        .iter()
        .find_map(|scheme| connect.strip_prefix(scheme))
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| {
            let scheme = connect.split(':').next().unwrap_or_default();
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("resolve_connect")
                .with_message(format!("Unsupported destination scheme '{}'", scheme))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_sqlite_file() {
        assert_eq!(
            resolve_connect("sqlite_file:conditions.db").unwrap(),
            PathBuf::from("conditions.db")
        );
        assert_eq!(
            resolve_connect("sqlite:/tmp/c.db").unwrap(),
            PathBuf::from("/tmp/c.db")
        );
    }

    #[test]
    fn test_resolve_rejects_remote_without_leaking_credentials() {
        let err = resolve_connect("oracle://writer:pw@cms_orcoff_prep/CMS_COND_STRIP").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidInput);
        assert!(!err.message().contains("pw"));
    }

    #[test]
    fn test_resolve_rejects_empty_path() {
        assert!(resolve_connect("sqlite_file:").is_err());
    }

    #[test]
    fn test_open_ledger_in_tempdir() {
        let dir = tempfile::TempDir::new().unwrap();
        let conn = open_ledger(dir.path().join("ledger.db")).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert!(count >= 1);
    }
}
