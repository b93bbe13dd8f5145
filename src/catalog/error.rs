//! Catalog validation errors.

use thiserror::Error;

/// A single problem found while validating a catalog.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogViolation {
    #[error("catalog has no coins; change could never be returned")]
    NoCoins,

    #[error("coin '{token}' has zero value")]
    ZeroCoinValue { token: String },

    #[error("product '{token}' has zero price")]
    ZeroProductPrice { token: String },

    #[error("token '{token}' is used more than once")]
    DuplicateToken { token: String },

    #[error("token '{token}' is reserved for the return signal")]
    ReservedToken { token: String },

    #[error("catalog contains a blank token")]
    BlankToken,
}

/// Errors returned by [`CatalogBuilder::build`](super::CatalogBuilder::build).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Every violation found, in the order the checks ran.
    #[error("catalog is invalid ({} problem(s)): {}", .violations.len(), summarize(.violations))]
    Invalid { violations: Vec<CatalogViolation> },
}

fn summarize(violations: &[CatalogViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
