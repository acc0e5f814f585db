//! Transport-agnostic domain errors.
//!
//! Handlers raise these at the point of detection; they propagate unchanged
//! through the pipeline behaviors and are only translated into an HTTP
//! envelope by the inbound adapter.

use serde::{Deserialize, Serialize};

/// Stable machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Input failed shape or constraint validation (aggregated).
    ValidationFailed,
    /// Missing or invalid credential.
    Unauthenticated,
    /// Authenticated but not permitted to act on the resource.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// A uniqueness invariant would be violated.
    Conflict,
    /// Anything else; details are logged server-side, never returned.
    Internal,
}

/// A single validation failure attached to a [`ValidationFailed`] error.
///
/// [`ValidationFailed`]: ErrorCode::ValidationFailed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    /// Name of the offending request field.
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl FieldViolation {
    /// Build a violation for `field` with the given message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Domain error payload: a code, a message, and (for validation failures)
/// the collected field violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    violations: Vec<FieldViolation>,
}

impl Error {
    /// Create an error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Aggregate validation failure carrying every collected violation.
    pub fn validation(violations: Vec<FieldViolation>) -> Self {
        Self {
            code: ErrorCode::ValidationFailed,
            message: "Validation failed.".to_owned(),
            violations,
        }
    }

    /// Convenience constructor for [`ErrorCode::Unauthenticated`].
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthenticated, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Convenience constructor for [`ErrorCode::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Field violations; empty unless the code is `ValidationFailed`.
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}
