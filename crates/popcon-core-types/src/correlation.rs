//! Correlation types for transfer cycles
//!
//! Every invocation of a handler's cycle gets its own `CycleId` so the
//! read/decide/stage/commit events of one cycle can be grouped in the logs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single transfer cycle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CycleId(String);

impl CycleId {
    /// Generate a new CycleId using UUIDv7 (time ordered)
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for CycleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CycleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context carried through one cycle for correlation
#[derive(Debug, Clone)]
pub struct CycleContext {
    pub cycle_id: CycleId,
    /// Handler instance name (the `name` configuration value)
    pub handler: String,
    /// Destination tag the cycle reads and writes
    pub tag: String,
}

impl CycleContext {
    /// Create a new context with a fresh CycleId
    pub fn new(handler: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            cycle_id: CycleId::new(),
            handler: handler.into(),
            tag: tag.into(),
        }
    }

    /// Replace the generated CycleId with an existing one
    pub fn with_cycle_id(mut self, cycle_id: CycleId) -> Self {
        self.cycle_id = cycle_id;
        self
    }
}
