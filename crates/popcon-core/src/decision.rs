//! Transfer decision: has the payload's fingerprint changed since the last
//! upload?

use crate::fingerprint::recorded_fingerprint;
use crate::model::TagState;

/// Result of comparing the current fingerprint with the recorded one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferDecision {
    /// The tag already holds an upload built from the same inputs
    UpToDate { fingerprint: String },
    /// The fingerprint differs (or the tag is empty)
    Needed { current: String, previous: String },
}

impl TransferDecision {
    pub fn is_needed(&self) -> bool {
        matches!(self, TransferDecision::Needed { .. })
    }
}

/// Compare `current_fingerprint` with the last recorded fingerprint.
///
/// Byte-exact comparison. A log text without a delimiter is compared whole,
/// so malformed history always reads as "different".
pub fn decide(tag_state: &TagState, current_fingerprint: &str) -> TransferDecision {
    let previous = recorded_fingerprint(tag_state);
    if previous == current_fingerprint {
        TransferDecision::UpToDate {
            fingerprint: current_fingerprint.to_string(),
        }
    } else {
        TransferDecision::Needed {
            current: current_fingerprint.to_string(),
            previous: previous.to_string(),
        }
    }
}

/// `true` iff a new payload must be staged
pub fn is_transfer_needed(tag_state: &TagState, current_fingerprint: &str) -> bool {
    decide(tag_state, current_fingerprint).is_needed()
}
