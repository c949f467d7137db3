use serde::{Deserialize, Serialize};

use super::LogDbEntry;

/// Read-only snapshot of a destination tag at decision time.
///
/// Built fresh for every cycle; the handler never keeps one across cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagState {
    tag: String,
    size: u64,
    last_since: u64,
    last_payload_token: Option<String>,
    last_log: Option<LogDbEntry>,
}

impl TagState {
    /// A tag with no IOVs yet
    pub fn empty(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            size: 0,
            last_since: 0,
            last_payload_token: None,
            last_log: None,
        }
    }

    /// A tag whose last upload started at `last_since` and logged `log_text`
    pub fn with_last_upload(tag: impl Into<String>, last_since: u64, log_text: impl Into<String>) -> Self {
        Self::from_parts(
            tag,
            1,
            last_since,
            None,
            Some(LogDbEntry::with_user_text(log_text)),
        )
    }

    /// Full constructor used by tag history readers
    pub fn from_parts(
        tag: impl Into<String>,
        size: u64,
        last_since: u64,
        last_payload_token: Option<String>,
        last_log: Option<LogDbEntry>,
    ) -> Self {
        Self {
            tag: tag.into(),
            size,
            last_since,
            last_payload_token,
            last_log,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Number of IOVs recorded in the tag
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Start of the last validity interval; meaningless when empty
    pub fn last_since(&self) -> u64 {
        self.last_since
    }

    pub fn last_payload_token(&self) -> Option<&str> {
        self.last_payload_token.as_deref()
    }

    pub fn last_log(&self) -> Option<&LogDbEntry> {
        self.last_log.as_ref()
    }

    /// Free-text log of the last upload, `""` if none was recorded
    pub fn last_log_text(&self) -> &str {
        self.last_log
            .as_ref()
            .map(|l| l.user_text.as_str())
            .unwrap_or("")
    }

    /// Structured fingerprint of the last upload, if the ledger stored one
    pub fn last_fingerprint(&self) -> Option<&str> {
        self.last_log.as_ref().and_then(|l| l.fingerprint.as_deref())
    }
}
