//! Core types shared across the PopCon transfer gate crates
//!
//! This crate provides foundational types used by both error handling
//! and logging facilities:
//!
//! - **Correlation types**: CycleId, CycleContext
//! - **Sensitive data**: Sensitive<T> marker for connection strings
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::{CycleContext, CycleId};
pub use sensitive::Sensitive;
