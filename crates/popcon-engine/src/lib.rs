//! PopCon Engine - Orchestration layer
//!
//! Runs transfer cycles against the SQLite ledger: reads the tag snapshot,
//! drives the source handler, and commits what it staged.

pub mod commands;

pub use commands::cycle::{run_cycle, RunOptions, RunReport};
pub use commands::tag_query::{apply_engine_query, EngineQuery, EngineQueryResult, TagStateResult};
