//! Tag history and upload ledger operations.
//!
//! `history` reads the snapshot a cycle decides against; `ledger` appends
//! the cycle's staged items plus its log entry.

mod history;
mod ledger;

pub use history::SqliteTagHistory;
pub use ledger::{commit_transfers, list_iovs, CommitOptions, CommitResult, IovRecord, UploadLog};
