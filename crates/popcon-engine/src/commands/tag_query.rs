//! Engine-level read-only query surface.
//!
//! `apply_engine_query` takes a shared connection and never writes.

#![allow(clippy::result_large_err)]

use popcon_core::config::validate_tag_name;
use popcon_core::errors::ExError;
use popcon_core::fingerprint::recorded_fingerprint;
use popcon_core::{log_op_end, log_op_error, log_op_start};
use popcon_core::{TagHistoryReader, TagState};
use popcon_store::errors::Result;
use popcon_store::{list_iovs, IovRecord, SqliteTagHistory};
use rusqlite::Connection;
use serde::Serialize;

/// Read-only queries supported by the engine.
#[derive(Debug, Clone)]
pub enum EngineQuery {
    /// Current snapshot of a tag, as a cycle would see it
    TagState { tag: String },
    /// Every IOV of a tag in upload order
    TagHistory { tag: String },
}

impl EngineQuery {
    fn op(&self) -> &'static str {
        match self {
            EngineQuery::TagState { .. } => "tag_state",
            EngineQuery::TagHistory { .. } => "tag_history",
        }
    }

    fn tag(&self) -> &str {
        match self {
            EngineQuery::TagState { tag } | EngineQuery::TagHistory { tag } => tag,
        }
    }
}

/// Snapshot plus the fingerprint the decision step would compare against.
#[derive(Debug, Clone, Serialize)]
pub struct TagStateResult {
    pub state: TagState,
    pub fingerprint: String,
}

/// Result of an engine query.
#[derive(Debug, Clone)]
pub enum EngineQueryResult {
    TagState(TagStateResult),
    TagHistory(Vec<IovRecord>),
}

/// Apply a read-only query.
///
/// ## Errors
///
/// - `InvalidInput`: tag name is empty or contains whitespace
/// - `Persistence`: database error
/// - `Serialization`: a stored payload is not valid JSON
pub fn apply_engine_query(query: EngineQuery, conn: &Connection) -> Result<EngineQueryResult> {
    let op = query.op();
    log_op_start!(op, tag = query.tag());
    let start = std::time::Instant::now();

    let result = apply_engine_query_impl(&query, conn).map_err(|e| {
        log_op_error!(op, e.clone(), duration_ms = start.elapsed().as_millis() as u64);
        e
    })?;

    log_op_end!(op, duration_ms = start.elapsed().as_millis() as u64);
    Ok(result)
}

fn apply_engine_query_impl(query: &EngineQuery, conn: &Connection) -> Result<EngineQueryResult> {
    validate_tag_name(query.tag()).map_err(|e| ExError::from(e).with_op(query.op()))?;

    match query {
        EngineQuery::TagState { tag } => {
            let state = SqliteTagHistory::new(conn).read_tag_state(tag)?;
            let fingerprint = recorded_fingerprint(&state).to_string();
            Ok(EngineQueryResult::TagState(TagStateResult { state, fingerprint }))
        }
        EngineQuery::TagHistory { tag } => Ok(EngineQueryResult::TagHistory(list_iovs(conn, tag)?)),
    }
}
