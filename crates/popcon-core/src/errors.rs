use crate::model::DataType;
use popcon_core_types::CycleId;
use thiserror::Error;

/// Result type alias using PopConError
pub type Result<T> = std::result::Result<T, PopConError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidInput,
    InvalidConfig,

    // Transfer cycle
    /// The builder produced no payload on a cycle where a transfer was needed
    MissingPayload,

    // Ledger
    ConstraintViolation,
    Concurrency,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidConfig => "ERR_INVALID_CONFIG",
            ExErrorKind::MissingPayload => "ERR_MISSING_PAYLOAD",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
        }
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the
/// transfer context (handler, tag, since, cycle) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    handler: Option<String>,
    tag: Option<String>,
    since: Option<u64>,
    cycle_id: Option<CycleId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            handler: None,
            tag: None,
            since: None,
            cycle_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add handler name context
    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Add destination tag context
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Add since context
    pub fn with_since(mut self, since: u64) -> Self {
        self.since = Some(since);
        self
    }

    /// Add cycle ID context
    pub fn with_cycle_id(mut self, cycle_id: CycleId) -> Self {
        self.cycle_id = Some(cycle_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the handler context, if any
    pub fn handler(&self) -> Option<&str> {
        self.handler.as_deref()
    }

    /// Get the tag context, if any
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Get the since context, if any
    pub fn since(&self) -> Option<u64> {
        self.since
    }

    /// Get the cycle ID context, if any
    pub fn cycle_id(&self) -> Option<&CycleId> {
        self.cycle_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(handler) = &self.handler {
            write!(f, " (handler: {})", handler)?;
        }
        if let Some(tag) = &self.tag {
            write!(f, " (tag: {})", tag)?;
        }
        if let Some(since) = self.since {
            write!(f, " (since: {})", since)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

// ========== End Error Facility ==========

/// Failure of the staging step within one transfer cycle.
///
/// Staging failures are per-cycle: the queue is left untouched and the next
/// cycle re-evaluates from scratch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StagingError {
    /// The builder yielded no object although a transfer was needed
    #[error("NULL payload of {data_type} reported by the builder for {handler}: transfer aborted")]
    MissingPayload { handler: String, data_type: DataType },

    /// `last_since + 1` is not representable
    #[error("since after {last_since} overflows for {handler}: transfer aborted")]
    SinceOverflow { handler: String, last_since: u64 },
}

/// Domain errors for configuration and handler setup
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PopConError {
    /// Configuration value is out of range or missing
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration: {reason}")]
    ConfigParse { reason: String },

    /// Tag names must be non-empty and free of whitespace
    #[error("Invalid tag name: {tag:?}")]
    InvalidTagName { tag: String },

    /// Staging failed for the current cycle
    #[error(transparent)]
    Staging(#[from] StagingError),

    /// Payload or log entry serialization failed
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl From<StagingError> for ExError {
    fn from(err: StagingError) -> Self {
        let message = err.to_string();
        match err {
            StagingError::MissingPayload { handler, .. } => {
                ExError::new(ExErrorKind::MissingPayload)
                    .with_op("set_for_transfer")
                    .with_handler(handler)
                    .with_message(message)
            }
            StagingError::SinceOverflow {
                handler,
                last_since,
            } => ExError::new(ExErrorKind::ConstraintViolation)
                .with_op("set_for_transfer")
                .with_handler(handler)
                .with_since(last_since)
                .with_message(message),
        }
    }
}

impl From<PopConError> for ExError {
    fn from(err: PopConError) -> Self {
        let message = err.to_string();
        match err {
            PopConError::InvalidConfig { .. } | PopConError::ConfigParse { .. } => {
                ExError::new(ExErrorKind::InvalidConfig).with_message(message)
            }
            PopConError::InvalidTagName { tag } => ExError::new(ExErrorKind::InvalidInput)
                .with_tag(tag)
                .with_message(message),
            PopConError::Staging(staging) => staging.into(),
            PopConError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for PopConError {
    fn from(err: serde_json::Error) -> Self {
        PopConError::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PopConError {
    fn from(err: toml::de::Error) -> Self {
        PopConError::ConfigParse {
            reason: err.to_string(),
        }
    }
}
