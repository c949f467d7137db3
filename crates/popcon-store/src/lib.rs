//! PopCon store - SQLite conditions ledger
//!
//! Provides:
//! - SQLite schema with an embedded, checksummed migrations framework
//! - `SqliteTagHistory`, the tag snapshot reader used by the decision step
//! - Upload ledger: appends staged (payload, since) pairs plus one log entry
//!   per cycle

pub mod db;
pub mod errors;
pub mod migrations;
pub mod tag;

// Re-export key types
pub use errors::Result;
pub use tag::{commit_transfers, list_iovs, CommitOptions, CommitResult, IovRecord, SqliteTagHistory, UploadLog};
