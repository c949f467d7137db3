//! Canonical schema constants for structured logging and events
//!
//! `tracing` macros take field names as literal tokens, so emitters spell
//! them out; these constants are for code that reads events back (the test
//! capture layer and log assertions).

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Cycle context, emitted by the `ctx = ...` arms of the op macros
pub const FIELD_CYCLE_ID: &str = "cycle_id";
pub const FIELD_HANDLER: &str = "handler";
pub const FIELD_TAG: &str = "tag";
pub const FIELD_SINCE: &str = "since";

// Error fields
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
