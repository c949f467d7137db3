use serde::{Deserialize, Serialize};

/// Log row written alongside the most recent upload to a tag.
///
/// `user_text` is free text (`<handler>@<fingerprint>` for rows written by
/// this workspace). `fingerprint` carries the same fingerprint as a separate
/// field; it is `None` for rows that predate the column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogDbEntry {
    pub log_id: u64,
    pub destination_db: String,
    pub provenance: String,
    pub user_text: String,
    pub iov_tag: String,
    pub iov_time_type: String,
    pub payload_idx: u64,
    pub payload_name: String,
    pub payload_token: String,
    pub payload_container: String,
    pub exec_time: String,
    pub exec_message: String,
    pub fingerprint: Option<String>,
}

impl LogDbEntry {
    /// Entry carrying only user text, as written by legacy uploads
    pub fn with_user_text(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            ..Self::default()
        }
    }

    /// Attach the structured fingerprint
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }
}
