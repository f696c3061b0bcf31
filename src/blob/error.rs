//! Storage errors and their classification
//!
//! Callers decide what to do with a failure from [`StorageError::class`] and
//! never look at status codes or service error codes themselves.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Might succeed if attempted again (throttling, timeouts, 5xx).
    Transient,
    /// The resource a create call targeted is already there.
    AlreadyExists,
    /// Will not succeed without a change on the caller's side.
    Fatal,
    Unknown,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage service returned HTTP {status} {code}: {message}")]
    Service {
        status: u16,
        code: String,
        message: String,
    },
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("local I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl StorageError {
    pub fn service(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Service {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            StorageError::Service { status, code, .. } => classify_service(*status, code),
            StorageError::Request(e) if e.is_timeout() || e.is_connect() => ErrorClass::Transient,
            StorageError::Request(e) => match e.status() {
                Some(status) => classify_service(status.as_u16(), ""),
                None => ErrorClass::Unknown,
            },
            StorageError::Io(_) => ErrorClass::Unknown,
            StorageError::Malformed(_) => ErrorClass::Fatal,
        }
    }
}

/// Classify a service response from its HTTP status and service error code.
pub fn classify_service(status: u16, code: &str) -> ErrorClass {
    match status {
        409 if code.ends_with("AlreadyExists") => ErrorClass::AlreadyExists,
        408 | 429 | 500 | 502 | 503 | 504 => ErrorClass::Transient,
        400..=499 => ErrorClass::Fatal,
        _ => ErrorClass::Unknown,
    }
}
