//! Unified application error types for MediaHub.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator. The [`ErrorKind`] decides whether an
//! error is retried, surfaced to the operator, or turned into a fallback.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The candidate file violates a bucket constraint (size, MIME type).
    Validation,
    /// The asset category is not declared in the bucket registry.
    UnknownCategory,
    /// A storage path was rejected by normalization.
    InvalidPath,
    /// The object store refused the operation because of its access policy.
    PolicyDenied,
    /// The object store refused the payload size.
    SizeExceeded,
    /// An object already exists at the target path.
    Conflict,
    /// A network or availability failure that may succeed on retry.
    Transient,
    /// A reference value is not a recognized public URL.
    UnrecognizedUrl,
    /// The record owning a reference field no longer exists.
    RecordNotFound,
    /// Any other object store failure.
    Storage,
    /// A configuration error occurred.
    Configuration,
    /// A serialization/deserialization error occurred.
    Serialization,
}

impl ErrorKind {
    /// Whether an operation failing with this kind may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "VALIDATION"),
            Self::UnknownCategory => write!(f, "UNKNOWN_CATEGORY"),
            Self::InvalidPath => write!(f, "INVALID_PATH"),
            Self::PolicyDenied => write!(f, "POLICY_DENIED"),
            Self::SizeExceeded => write!(f, "SIZE_EXCEEDED"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::UnrecognizedUrl => write!(f, "UNRECOGNIZED_URL"),
            Self::RecordNotFound => write!(f, "RECORD_NOT_FOUND"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Serialization => write!(f, "SERIALIZATION"),
        }
    }
}

/// The unified application error used throughout MediaHub.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create an unknown-category error.
    pub fn unknown_category(category: &str) -> Self {
        Self::new(
            ErrorKind::UnknownCategory,
            format!("Unknown asset category '{category}'"),
        )
    }

    /// Create an invalid-path error.
    pub fn invalid_path(path: &str, reason: &str) -> Self {
        Self::new(
            ErrorKind::InvalidPath,
            format!("Invalid storage path '{path}': {reason}"),
        )
    }

    /// Create a policy-denied error naming the bucket and the fix the
    /// operator has to apply.
    pub fn policy_denied(bucket: &str, path: &str, detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::PolicyDenied,
            format!(
                "Storage policy denied access to '{bucket}/{path}' ({detail}). \
                 Grant the service role insert/select rights on bucket '{bucket}' \
                 in the storage access policies, then retry the upload"
            ),
        )
    }

    /// Create a size-exceeded error.
    pub fn size_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::SizeExceeded, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create a transient (retryable) error.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    /// Create an unrecognized-url error.
    pub fn unrecognized_url(url: &str) -> Self {
        Self::new(
            ErrorKind::UnrecognizedUrl,
            format!("Not a recognized public asset URL: '{url}'"),
        )
    }

    /// Create a record-not-found error.
    pub fn record_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RecordNotFound, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether the operation that produced this error may be retried.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
