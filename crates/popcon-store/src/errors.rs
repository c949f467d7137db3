//! Error handling for popcon-store
//!
//! Wraps popcon-core ExError with store-specific helpers

use popcon_core::errors::{ExError, ExErrorKind};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a database error from rusqlite::Error
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a payload serialization error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Values above i64::MAX cannot be stored in an INTEGER column
pub fn since_out_of_range(operation: &str, since: u64) -> ExError {
    ExError::new(ExErrorKind::InvalidInput)
        .with_op(operation.to_string())
        .with_since(since)
        .with_message("since does not fit in a SQLite INTEGER")
}

/// A since at or below the previous one would reorder the tag
pub fn since_not_increasing(operation: &str, tag: &str, since: u64, previous: u64) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op(operation.to_string())
        .with_tag(tag)
        .with_since(since)
        .with_message(format!(
            "since {} does not follow the previous since {}",
            since, previous
        ))
}
