use thiserror::Error;

/// Errors returned by the writers, readers and the dispatcher.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// The requested version/profile/format combination is not supported.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The input is not well-formed XML, or not a document of a known syntax.
    #[error("XML parse error at byte {position}: {message}")]
    Parse {
        /// Byte offset into the input where the reader gave up.
        position: u64,
        /// Human-readable error description.
        message: String,
    },

    /// A value in the document is not part of the expected code list.
    #[error("validation error: {0}")]
    Validation(ValidationError),

    /// A structurally mandatory element is missing.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// Writing to the in-memory XML sink failed.
    #[error("XML write error: {0}")]
    Xml(String),
}

impl InvoiceError {
    pub(crate) fn parse(position: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::SchemaViolation(format!("missing required element {}", path.into()))
    }

    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(ValidationError::new(field, message))
    }
}

/// A single validation error with the offending field and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path of the offending element (e.g. "ApplicableTradeTax/CategoryCode").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
