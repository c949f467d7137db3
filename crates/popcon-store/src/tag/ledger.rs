//! Upload ledger: append staged transfers to a tag.

#![allow(clippy::result_large_err)]

use crate::errors::{
    from_rusqlite, serialization_error, since_not_increasing, since_out_of_range, Result,
};
use crate::migrations::compute_checksum;
use popcon_core::errors::{ExError, ExErrorKind};
use popcon_core::model::TransferItem;
use rusqlite::{Connection, OptionalExtension, Transaction};
use serde::Serialize;

pub const DEFAULT_TIME_TYPE: &str = "runnumber";
pub const DEFAULT_PROVENANCE: &str = "popcon";
const EXEC_MESSAGE_OK: &str = "OK";

/// Log entry written once per committed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadLog {
    pub tag: String,
    /// `<handler>@<fingerprint>`
    pub user_text: String,
    pub fingerprint: String,
    pub destination_db: String,
    pub provenance: String,
    pub time_type: String,
    pub payload_name: String,
    pub record: Option<String>,
}

impl UploadLog {
    pub fn new(
        tag: impl Into<String>,
        user_text: impl Into<String>,
        fingerprint: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            user_text: user_text.into(),
            fingerprint: fingerprint.into(),
            destination_db: String::new(),
            provenance: DEFAULT_PROVENANCE.to_string(),
            time_type: DEFAULT_TIME_TYPE.to_string(),
            payload_name: String::new(),
            record: None,
        }
    }

    /// Destination as shown in logs; never the raw connect string
    pub fn with_destination_db(mut self, destination_db: impl Into<String>) -> Self {
        self.destination_db = destination_db.into();
        self
    }

    pub fn with_payload_name(mut self, payload_name: impl Into<String>) -> Self {
        self.payload_name = payload_name.into();
        self
    }

    pub fn with_record(mut self, record: Option<String>) -> Self {
        self.record = record;
        self
    }
}

/// Options for a commit.
#[derive(Debug, Clone, Default)]
pub struct CommitOptions {
    /// Number of IOVs the caller saw when it read the tag; a different count
    /// at commit time means another writer got there first
    pub expected_size: Option<u64>,
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResult {
    pub log_id: u64,
    pub iov_count: usize,
    pub last_since: u64,
    pub last_payload_token: String,
}

/// One row of a tag's IOV sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IovRecord {
    pub id: u64,
    pub since: u64,
    pub payload_token: String,
    pub log_id: u64,
    /// Unix seconds
    pub inserted_at: i64,
    pub payload: serde_json::Value,
}

/// Append `items` to the tag and write one log entry for the cycle.
///
/// All rows land in a single transaction. Each payload is stored as JSON and
/// its token is the SHA-256 hex digest of that JSON. A tag is append-only in
/// time: every since must be strictly greater than the tag's last since and
/// than the item before it in `items`.
///
/// # Errors
///
/// - `ExErrorKind::InvalidInput`: `items` is empty or a since exceeds `i64::MAX`
/// - `ExErrorKind::Concurrency`: tag size differs from `expected_size`
/// - `ExErrorKind::ConstraintViolation`: a since does not increase
/// - `ExErrorKind::Serialization`: a payload could not be serialized
/// - `ExErrorKind::Persistence`: database write failed
pub fn commit_transfers<T: Serialize>(
    conn: &mut Connection,
    log: &UploadLog,
    items: &[TransferItem<T>],
    options: &CommitOptions,
) -> Result<CommitResult> {
    if items.is_empty() {
        return Err(ExError::new(ExErrorKind::InvalidInput)
            .with_op("commit_transfers")
            .with_tag(log.tag.clone())
            .with_message("no staged items to commit"));
    }

    let rows = items
        .iter()
        .map(|item| -> Result<(i64, String, String)> {
            let since = i64::try_from(item.since())
                .map_err(|_| since_out_of_range("commit_transfers", item.since()))?;
            let json = serde_json::to_string(item.payload())
                .map_err(|e| serialization_error("commit_transfers", e))?;
            let token = compute_checksum(&json);
            Ok((since, json, token))
        })
        .collect::<Result<Vec<_>>>()?;

    let tx = conn.transaction().map_err(from_rusqlite)?;

    if let Some(expected) = options.expected_size {
        let actual = tag_size(&tx, &log.tag)?;
        if actual != expected {
            return Err(ExError::new(ExErrorKind::Concurrency)
                .with_op("commit_transfers")
                .with_tag(log.tag.clone())
                .with_message(format!(
                    "tag size changed: expected {}, found {}",
                    expected, actual
                )));
        }
    }

    let mut previous = last_since(&tx, &log.tag)?;
    for (since, _, _) in &rows {
        if let Some(prev) = previous {
            if *since <= prev {
                return Err(since_not_increasing(
                    "commit_transfers",
                    &log.tag,
                    *since as u64,
                    prev as u64,
                ));
            }
        }
        previous = Some(*since);
    }

    let now = chrono::Utc::now();
    tx.execute(
        "INSERT OR IGNORE INTO tags (name, time_type, record, created_at) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![log.tag, log.time_type, log.record, now.timestamp()],
    )
    .map_err(from_rusqlite)?;

    // rows is non-empty, checked above
    let (last_since, _, last_token) = &rows[rows.len() - 1];
    let log_id = insert_log_entry(&tx, log, rows.len() - 1, last_token, &now)?;

    for (since, json, token) in &rows {
        tx.execute(
            r#"
            INSERT INTO iovs (tag, since, payload_token, payload_json, log_id, inserted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            rusqlite::params![log.tag, since, token, json, log_id, now.timestamp()],
        )
        .map_err(from_rusqlite)?;
    }

    let result = CommitResult {
        log_id: log_id as u64,
        iov_count: rows.len(),
        last_since: *last_since as u64,
        last_payload_token: last_token.clone(),
    };

    tx.commit().map_err(from_rusqlite)?;

    tracing::debug!(
        op = "commit_transfers",
        tag = %log.tag,
        log_id = result.log_id,
        iov_count = result.iov_count,
        last_since = result.last_since,
        "committed transfers"
    );

    Ok(result)
}

/// IOVs of a tag in insertion order; an unknown tag has none.
///
/// # Errors
///
/// - `ExErrorKind::Persistence`: query failed
/// - `ExErrorKind::Serialization`: a stored payload is not valid JSON
pub fn list_iovs(conn: &Connection, tag: &str) -> Result<Vec<IovRecord>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT id, since, payload_token, log_id, inserted_at, payload_json
            FROM iovs
            WHERE tag = ?1
            ORDER BY id ASC
            "#,
        )
        .map_err(from_rusqlite)?;

    let rows = stmt
        .query_map([tag], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, i64>(4)?,
                row.get::<_, String>(5)?,
            ))
        })
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    rows.into_iter()
        .map(|(id, since, payload_token, log_id, inserted_at, json)| {
            let payload =
                serde_json::from_str(&json).map_err(|e| serialization_error("list_iovs", e))?;
            Ok(IovRecord {
                id: id as u64,
                since: since as u64,
                payload_token,
                log_id: log_id as u64,
                inserted_at,
                payload,
            })
        })
        .collect()
}

fn tag_size(tx: &Transaction, tag: &str) -> Result<u64> {
    let count: i64 = tx
        .query_row("SELECT COUNT(*) FROM iovs WHERE tag = ?1", [tag], |row| {
            row.get(0)
        })
        .map_err(from_rusqlite)?;
    Ok(count.max(0) as u64)
}

/// Since of the most recently inserted IOV
fn last_since(tx: &Transaction, tag: &str) -> Result<Option<i64>> {
    tx.query_row(
        "SELECT since FROM iovs WHERE tag = ?1 ORDER BY id DESC LIMIT 1",
        [tag],
        |row| row.get(0),
    )
    .optional()
    .map_err(from_rusqlite)
}

fn insert_log_entry(
    tx: &Transaction,
    log: &UploadLog,
    payload_idx: usize,
    payload_token: &str,
    now: &chrono::DateTime<chrono::Utc>,
) -> Result<i64> {
    tx.execute(
        r#"
        INSERT INTO log_entries (
            destination_db,
            provenance,
            user_text,
            iov_tag,
            iov_time_type,
            payload_idx,
            payload_name,
            payload_token,
            payload_container,
            exec_time,
            exec_message,
            fingerprint
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
        rusqlite::params![
            log.destination_db,
            log.provenance,
            log.user_text,
            log.tag,
            log.time_type,
            payload_idx as i64,
            log.payload_name,
            payload_token,
            log.payload_name,
            now.to_rfc3339(),
            EXEC_MESSAGE_OK,
            log.fingerprint,
        ],
    )
    .map_err(from_rusqlite)?;

    Ok(tx.last_insert_rowid())
}
