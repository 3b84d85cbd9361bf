//! Error types for the matrix processing pipeline.
//!
//! - [`ErrorKind`] - Classification labels with their status codes
//! - [`MatrixError`] - Classified pipeline errors (plus cancellation)
//! - [`ConfigError`] - Configuration loading errors
//! - [`ServerError`] - HTTP server lifecycle errors
//!
//! Classification survives wrapping: a [`MatrixError::Context`] layer keeps
//! the wrapped error as its source, and [`MatrixError::kind`] walks down to
//! the innermost classified error.

use thiserror::Error;

// =============================================================================
// Classification
// =============================================================================

/// Classification of a pipeline failure.
///
/// Cancellation and deadline expiry are deliberately absent: they are not
/// business failures and never map to one of these kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or disallowed request parameters.
    InvalidInput,
    /// Referenced file is absent.
    NotFound,
    /// Resource exceeds the size ceiling.
    PayloadTooLarge,
    /// Content is readable but semantically invalid.
    UnprocessableEntity,
    /// Anything unclassified.
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this classification.
    pub fn status_code(self) -> u16 {
        match self {
            ErrorKind::InvalidInput => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::PayloadTooLarge => 413,
            ErrorKind::UnprocessableEntity => 422,
            ErrorKind::Internal => 500,
        }
    }
}

// =============================================================================
// Pipeline Errors
// =============================================================================

/// Errors produced by the validate → transform pipeline.
#[derive(Debug, Error)]
pub enum MatrixError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("internal error: {0}")]
    Internal(String),

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The request deadline passed before the work finished.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    /// Another error with extra context attached.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<MatrixError>,
    },
}

impl MatrixError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        MatrixError::InvalidInput(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        MatrixError::NotFound(message.into())
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        MatrixError::PayloadTooLarge(message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        MatrixError::UnprocessableEntity(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        MatrixError::Internal(message.into())
    }

    /// Wrap this error with a context message, keeping its classification.
    pub fn context(self, context: impl Into<String>) -> Self {
        MatrixError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, below every context layer.
    pub fn root(&self) -> &MatrixError {
        let mut current = self;
        while let MatrixError::Context { source, .. } = current {
            current = source;
        }
        current
    }

    /// Classification of this error.
    ///
    /// Returns `None` for cancellation and deadline expiry.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            MatrixError::InvalidInput(_) => Some(ErrorKind::InvalidInput),
            MatrixError::NotFound(_) => Some(ErrorKind::NotFound),
            MatrixError::PayloadTooLarge(_) => Some(ErrorKind::PayloadTooLarge),
            MatrixError::UnprocessableEntity(_) => Some(ErrorKind::UnprocessableEntity),
            MatrixError::Internal(_) => Some(ErrorKind::Internal),
            MatrixError::Cancelled | MatrixError::DeadlineExceeded => None,
            MatrixError::Context { source, .. } => source.kind(),
        }
    }

    /// Whether this error, through any wrapping, is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == Some(kind)
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self.root(), MatrixError::Cancelled)
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self.root(), MatrixError::DeadlineExceeded)
    }
}

/// Attach context to the error side of a [`MatrixResult`].
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> MatrixResult<T>;
}

impl<T> ResultExt<T> for MatrixResult<T> {
    fn context(self, context: impl Into<String>) -> MatrixResult<T> {
        self.map_err(|e| e.context(context))
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading [`crate::config::ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment value could not be parsed.
    #[error("Invalid value for {key}: '{value}' ({message})")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Failed to bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Server task failed.
    #[error("Internal server error: {0}")]
    Internal(String),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for pipeline operations.
pub type MatrixResult<T> = Result<T, MatrixError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::InvalidInput.status_code(), 400);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::PayloadTooLarge.status_code(), 413);
        assert_eq!(ErrorKind::UnprocessableEntity.status_code(), 422);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }

    #[test]
    fn test_classification_survives_wrapping() {
        let err = MatrixError::invalid_input("bad path")
            .context("validating request")
            .context("processing matrix");

        assert!(err.is(ErrorKind::InvalidInput));
        assert!(!err.is(ErrorKind::NotFound));
        assert_eq!(err.kind(), Some(ErrorKind::InvalidInput));

        let msg = err.to_string();
        assert!(msg.starts_with("processing matrix: validating request"));
        assert!(msg.contains("bad path"));
    }

    #[test]
    fn test_cancellation_is_not_classified() {
        let err = MatrixError::Cancelled.context("reading file");
        assert!(err.is_cancelled());
        assert!(!err.is_deadline_exceeded());
        assert_eq!(err.kind(), None);

        let err = MatrixError::DeadlineExceeded;
        assert!(err.is_deadline_exceeded());
        assert!(!err.is_cancelled());
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_result_context() {
        let result: MatrixResult<()> = Err(MatrixError::unprocessable("ragged"));
        let err = result.context("validating matrix").unwrap_err();
        assert!(err.is(ErrorKind::UnprocessableEntity));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_config_error_format() {
        let err = ConfigError::InvalidValue {
            key: "MATRIX_PORT".into(),
            value: "eighty".into(),
            message: "invalid digit found in string".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("MATRIX_PORT"));
        assert!(msg.contains("eighty"));
    }
}
