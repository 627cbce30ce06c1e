//! Domain error model.

use thiserror::Error;

use crate::id::ProductId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing references, stock exhaustion). Storage failures belong to the
/// collaborators that perform IO.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// One or more input rules failed. Every violated rule is listed.
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// A referenced product or cart line does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A unit was requested from a product with no available stock.
    #[error("out of stock: {0}")]
    OutOfStock(ProductId),

    /// A domain invariant was violated (e.g. restoring inconsistent state).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation<I, S>(violations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Validation(violations.into_iter().map(Into::into).collect())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn out_of_stock(product_id: &ProductId) -> Self {
        Self::OutOfStock(product_id.clone())
    }

    /// Violated rules, when this is a validation failure.
    pub fn violations(&self) -> &[String] {
        match self {
            Self::Validation(v) => v,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_joins_every_violation() {
        let err = DomainError::validation(["name too short", "price must be positive"]);
        assert_eq!(
            err.to_string(),
            "validation failed: name too short; price must be positive"
        );
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn non_validation_errors_have_no_violations() {
        let err = DomainError::out_of_stock(&"p1".parse::<ProductId>().unwrap());
        assert!(err.violations().is_empty());
        assert_eq!(err.to_string(), "out of stock: p1");
    }
}
