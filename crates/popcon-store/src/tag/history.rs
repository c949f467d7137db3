//! SQLite-backed tag history reader.

#![allow(clippy::result_large_err)]

use crate::errors::Result;
use popcon_core::errors::{ExError, ExErrorKind};
use popcon_core::model::{LogDbEntry, TagState};
use popcon_core::TagHistoryReader;
use rusqlite::{Connection, OptionalExtension, Row};

/// Reads `TagState` snapshots from the ledger tables.
///
/// The "last" IOV and log entry are the most recently inserted ones, which
/// is the order uploads happened in.
pub struct SqliteTagHistory<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteTagHistory<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl TagHistoryReader for SqliteTagHistory<'_> {
    /// The count and both "last" reads share one read transaction, so a
    /// commit from another connection cannot land between them.
    fn read_tag_state(&self, tag: &str) -> std::result::Result<TagState, ExError> {
        let tx = self
            .conn
            .unchecked_transaction()
            .map_err(|e| persistence("read_tag_state", tag, e))?;

        let size = count_iovs(&tx, tag)?;
        if size == 0 {
            return Ok(TagState::empty(tag));
        }

        let (last_since, last_payload_token) = match last_iov(&tx, tag)? {
            Some((since, token)) => (since, Some(token)),
            None => (0, None),
        };
        let log = last_log(&tx, tag)?;
        tx.commit()
            .map_err(|e| persistence("read_tag_state", tag, e))?;

        tracing::debug!(
            op = "read_tag_state",
            tag = tag,
            size = size,
            last_since = last_since,
            "read tag state"
        );

        Ok(TagState::from_parts(
            tag,
            size,
            last_since,
            last_payload_token,
            log,
        ))
    }
}

fn count_iovs(conn: &Connection, tag: &str) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM iovs WHERE tag = ?1", [tag], |row| {
            row.get(0)
        })
        .map_err(|e| persistence("count_iovs", tag, e))?;
    Ok(count.max(0) as u64)
}

fn last_iov(conn: &Connection, tag: &str) -> Result<Option<(u64, String)>> {
    conn.query_row(
        r#"
        SELECT since, payload_token
        FROM iovs
        WHERE tag = ?1
        ORDER BY id DESC
        LIMIT 1
        "#,
        [tag],
        |row| Ok((row.get::<_, i64>(0)?.max(0) as u64, row.get(1)?)),
    )
    .optional()
    .map_err(|e| persistence("last_iov", tag, e))
}

fn last_log(conn: &Connection, tag: &str) -> Result<Option<LogDbEntry>> {
    conn.query_row(
        r#"
        SELECT log_id, destination_db, provenance, user_text, iov_tag,
               iov_time_type, payload_idx, payload_name, payload_token,
               payload_container, exec_time, exec_message, fingerprint
        FROM log_entries
        WHERE iov_tag = ?1
        ORDER BY log_id DESC
        LIMIT 1
        "#,
        [tag],
        log_entry_from_row,
    )
    .optional()
    .map_err(|e| persistence("last_log", tag, e))
}

fn log_entry_from_row(row: &Row<'_>) -> rusqlite::Result<LogDbEntry> {
    Ok(LogDbEntry {
        log_id: row.get::<_, i64>(0)?.max(0) as u64,
        destination_db: row.get(1)?,
        provenance: row.get(2)?,
        user_text: row.get(3)?,
        iov_tag: row.get(4)?,
        iov_time_type: row.get(5)?,
        payload_idx: row.get::<_, i64>(6)?.max(0) as u64,
        payload_name: row.get(7)?,
        payload_token: row.get(8)?,
        payload_container: row.get(9)?,
        exec_time: row.get(10)?,
        exec_message: row.get(11)?,
        fingerprint: row.get(12)?,
    })
}

fn persistence(op: &str, tag: &str, err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op(op.to_string())
        .with_tag(tag)
        .with_message(err.to_string())
}
