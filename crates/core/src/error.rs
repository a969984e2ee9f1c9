//! Domain error model.

use thiserror::Error;

/// Result type used across the analytical layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Only caller contract violations end up here (negative quantities, malformed
/// identifiers, inconsistent inputs). Degenerate-but-valid data such as an
/// all-zero demand history is handled by the calculators themselves and never
/// produces an error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. a negative cost).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
