//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

/// Migration metadata
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

/// Get all embedded migrations in order
pub fn get_migrations() -> Vec<Migration> {
    vec![
        Migration {
            id: "001_tags_and_iovs",
            sql: include_str!("../../migrations/001_tags_and_iovs.sql"),
        },
        Migration {
            id: "002_log_fingerprint",
            sql: include_str!("../../migrations/002_log_fingerprint.sql"),
        },
    ]
}
