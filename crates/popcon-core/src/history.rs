//! Tag history interface.

use std::collections::HashMap;

use crate::errors::ExError;
use crate::model::TagState;

/// Read access to the current state of destination tags.
pub trait TagHistoryReader {
    /// Snapshot of `tag`; an unknown tag reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the backing store cannot be read.
    #[allow(clippy::result_large_err)]
    fn read_tag_state(&self, tag: &str) -> Result<TagState, ExError>;
}

/// Tag history held in memory; for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTagHistory {
    tags: HashMap<String, TagState>,
}

impl InMemoryTagHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot returned for its tag
    pub fn set(&mut self, state: TagState) {
        self.tags.insert(state.tag().to_string(), state);
    }
}

impl TagHistoryReader for InMemoryTagHistory {
    fn read_tag_state(&self, tag: &str) -> Result<TagState, ExError> {
        Ok(self
            .tags
            .get(tag)
            .cloned()
            .unwrap_or_else(|| TagState::empty(tag)))
    }
}
