//! Handler and job configuration
//!
//! Configuration is read once from TOML and is immutable afterwards:
//!
//! ```toml
//! [handler]
//! name = "SiStripNoiseHandler"
//! since = 5
//! debug = false
//! data_type = "noise"
//! since_policy = "debug_only"
//!
//! [destination]
//! connect = "sqlite_file:conditions.db"
//! tag = "SiStripNoise_Fake_PeakMode_20X"
//! record = "SiStripNoisesRcd"
//!
//! [selection]
//! partition = "TI_27-JAN-2010_2"
//! run = 128714
//! ```

use popcon_core_types::Sensitive;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{ExError, ExErrorKind, PopConError, Result};
use crate::model::DataType;
use crate::selection::SelectionParams;

pub const DEFAULT_HANDLER_NAME: &str = "SiStripPopConDbObjHandler";
pub const DEFAULT_SINCE: u64 = 5;

/// When a non-empty tag advances the `since` of the next upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SincePolicy {
    /// `last_since + 1` only in debug mode; otherwise the carried `since`
    /// is reused as-is.
    #[default]
    DebugOnly,
    /// `last_since + 1` on every upload to a non-empty tag.
    AlwaysAdvance,
}

impl SincePolicy {
    /// Whether a non-empty tag advances `since` under this policy
    pub fn advances(&self, debug: bool) -> bool {
        match self {
            SincePolicy::DebugOnly => debug,
            SincePolicy::AlwaysAdvance => true,
        }
    }
}

/// Per-handler settings supplied at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerConfig {
    /// Identifies the handler instance in logs
    pub name: String,
    /// Initial `since`, also the value reused when the policy does not advance
    pub since: u64,
    /// Verbose diagnostics and, under `DebugOnly`, the `last_since + 1` path
    pub debug: bool,
    pub data_type: DataType,
    pub since_policy: SincePolicy,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_HANDLER_NAME.to_string(),
            since: DEFAULT_SINCE,
            debug: false,
            data_type: DataType::Undefined,
            since_policy: SincePolicy::DebugOnly,
        }
    }
}

impl HandlerConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_since(mut self, since: u64) -> Self {
        self.since = since;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_since_policy(mut self, since_policy: SincePolicy) -> Self {
        self.since_policy = since_policy;
        self
    }

    /// Reject configurations no handler can run with
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PopConError::InvalidConfig {
                reason: "handler name cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Where staged payloads are committed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DestinationConfig {
    /// Connection string; may embed credentials
    pub connect: Sensitive<String>,
    pub tag: String,
    /// Record name; defaults to the handler data type's record
    #[serde(default)]
    pub record: Option<String>,
}

impl DestinationConfig {
    pub fn validate(&self) -> Result<()> {
        validate_tag_name(&self.tag)
    }
}

/// Tag names must be non-empty and contain no whitespace
pub fn validate_tag_name(tag: &str) -> Result<()> {
    if tag.is_empty() || tag.chars().any(char::is_whitespace) {
        return Err(PopConError::InvalidTagName {
            tag: tag.to_string(),
        });
    }
    Ok(())
}

/// A complete job: handler, destination and builder selection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PopConConfig {
    #[serde(default)]
    pub handler: HandlerConfig,
    pub destination: DestinationConfig,
    #[serde(default)]
    pub selection: SelectionParams,
}

impl PopConConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: PopConConfig = toml::from_str(text)?;
        config.handler.validate()?;
        config.destination.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    #[allow(clippy::result_large_err)]
    pub fn load(path: impl AsRef<Path>) -> std::result::Result<Self, ExError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_config")
                .with_message(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text).map_err(|e| ExError::from(e).with_op("load_config"))
    }

    /// Record name, falling back to the data type's default
    pub fn record(&self) -> Option<&str> {
        self.destination
            .record
            .as_deref()
            .or_else(|| self.handler.data_type.record_name())
    }
}
