//! Command orchestration layer.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use plain `tracing` events for internal details.

pub mod cycle;
pub mod tag_query;
