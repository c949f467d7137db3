//! Builder selection parameters and their metadata string.
//!
//! The metadata string is what the decision step compares against the last
//! upload, so it must be a pure function of the selection: keys are kept
//! sorted and values are rendered without float or map reordering.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Sorted key/value description of what a builder reads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionParams {
    params: BTreeMap<String, Value>,
}

impl SelectionParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Canonical `key=value` list, space separated, keys in sorted order.
    ///
    /// Strings are written bare; every other value uses its JSON form.
    pub fn metadata_string(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| match value {
                Value::String(s) => format!("{}={}", key, s),
                other => format!("{}={}", key, other),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<BTreeMap<String, Value>> for SelectionParams {
    fn from(params: BTreeMap<String, Value>) -> Self {
        Self { params }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_string_is_sorted() {
        let params = SelectionParams::new()
            .with("run", 128714)
            .with("partition", "TI_27-JAN-2010_2")
            .with("fec_version", Value::from(vec![73, 0]));
        assert_eq!(
            params.metadata_string(),
            "fec_version=[73,0] partition=TI_27-JAN-2010_2 run=128714"
        );
    }

    #[test]
    fn test_insertion_order_irrelevant() {
        let a = SelectionParams::new().with("a", 1).with("b", "x");
        let b = SelectionParams::new().with("b", "x").with("a", 1);
        assert_eq!(a.metadata_string(), b.metadata_string());
    }

    #[test]
    fn test_empty_selection() {
        assert_eq!(SelectionParams::new().metadata_string(), "");
    }
}
