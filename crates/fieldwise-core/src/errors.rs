use thiserror::Error;

/// Result type alias using FieldwiseError
pub type Result<T> = std::result::Result<T, FieldwiseError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error raised while configuring or running a comparison maps to one
/// of these kinds. Each kind has a stable error code usable by callers and
/// by the CLI exit path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Configuration
    InvalidInput,
    InvalidRegex,
    UnknownComparedField,
    InvalidSettings,

    // Documents / IO
    Io,
    Serialization,
    UnsupportedFormat,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidRegex => "ERR_INVALID_REGEX",
            ExErrorKind::UnknownComparedField => "ERR_UNKNOWN_COMPARED_FIELD",
            ExErrorKind::InvalidSettings => "ERR_INVALID_SETTINGS",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::UnsupportedFormat => "ERR_UNSUPPORTED_FORMAT",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus the
/// comparison context (operation, field path) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    field: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            field: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add field path context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
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

    /// Get the field path context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
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
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Error taxonomy for configuring and running recursive comparisons
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldwiseError {
    // ===== Configuration Errors =====
    /// A field or type regex failed to compile
    #[error("Invalid regex '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },

    /// A field passed to `comparing_only_fields` does not exist in actual
    #[error("{message}")]
    UnknownComparedFields { fields: Vec<String>, message: String },

    /// Invalid argument given to a configuration method
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Settings could not be loaded or deserialized
    #[error("Invalid settings: {reason}")]
    InvalidSettings { reason: String },

    // ===== Document Errors =====
    /// A file could not be read
    #[error("IO error on {path}: {reason}")]
    Io { path: String, reason: String },

    /// Document encoding/decoding failure
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// File extension not recognized as a document format
    #[error("Unsupported document format: {extension}")]
    UnsupportedFormat { extension: String },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FieldwiseError {
    /// Build an `InvalidRegex` error from a `regex` compile failure
    pub fn invalid_regex(pattern: &str, err: &regex::Error) -> Self {
        FieldwiseError::InvalidRegex {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }
}

/// Conversion from FieldwiseError to ExError
impl From<FieldwiseError> for ExError {
    fn from(err: FieldwiseError) -> Self {
        match err {
            FieldwiseError::InvalidRegex { pattern, reason } => {
                ExError::new(ExErrorKind::InvalidRegex)
                    .with_message(format!("'{}' is not a valid regex: {}", pattern, reason))
            }
            FieldwiseError::UnknownComparedFields { fields, message } => {
                ExError::new(ExErrorKind::UnknownComparedField)
                    .with_field(fields.join(", "))
                    .with_message(message)
            }
            FieldwiseError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }
            FieldwiseError::InvalidSettings { reason } => {
                ExError::new(ExErrorKind::InvalidSettings).with_message(reason)
            }
            FieldwiseError::Io { path, reason } => ExError::new(ExErrorKind::Io)
                .with_message(format!("{}: {}", path, reason)),
            FieldwiseError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            FieldwiseError::UnsupportedFormat { extension } => {
                ExError::new(ExErrorKind::UnsupportedFormat)
                    .with_message(format!("unsupported document format '{}'", extension))
            }
            FieldwiseError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<config::ConfigError> for FieldwiseError {
    fn from(err: config::ConfigError) -> Self {
        FieldwiseError::InvalidSettings {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for FieldwiseError {
    fn from(err: serde_json::Error) -> Self {
        FieldwiseError::Serialization {
            message: err.to_string(),
        }
    }
}
