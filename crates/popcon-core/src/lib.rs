//! PopCon core - conditions transfer gate
//!
//! Decides whether a freshly built calibration payload differs from the
//! last upload to a conditions tag and, if so, stages it with the right
//! `since`:
//! - Tag snapshot and transfer queue models
//! - Fingerprint comparison (decision step)
//! - Since assignment and payload retrieval (staging step)
//! - Source handler running one cycle per call
//! - Configuration, error facility and structured logging

pub mod builder;
pub mod config;
pub mod decision;
pub mod errors;
pub mod fingerprint;
pub mod handler;
pub mod history;
pub mod logging_facility;
pub mod model;
pub mod selection;
pub mod staging;

pub use popcon_core_types as core_types;

// Re-export commonly used types
pub use builder::{PayloadBuilder, StaticPayloadBuilder};
pub use config::{HandlerConfig, PopConConfig, SincePolicy};
pub use decision::{is_transfer_needed, TransferDecision};
pub use errors::{ExError, ExErrorKind, PopConError, Result, StagingError};
pub use handler::{CycleOutcome, DbObjHandler, PopConSourceHandler};
pub use history::{InMemoryTagHistory, TagHistoryReader};
pub use model::{DataType, LogDbEntry, TagState, TransferItem, TransferQueue};
pub use selection::SelectionParams;
pub use staging::stage;
