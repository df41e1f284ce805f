//! Error types for the criteria crate.

use thiserror::Error;

/// Errors that can occur when compiling criteria into a query.
#[derive(Debug, Error)]
pub enum CriteriaError {
    /// The operator suffix of a criteria key is not recognized.
    #[error("unknown operator '{token}' in criteria key '{key}'")]
    UnknownOperator { key: String, token: String },

    /// The value cannot be used with the operator of its key.
    #[error("invalid value for '{field}' ({op}): {reason}")]
    InvalidValue {
        field: String,
        op: &'static str,
        reason: &'static str,
    },

    /// No collection is registered under the requested document name.
    #[error("no collection registered for document '{0}'")]
    UnknownCollection(String),
}

/// Result type for criteria operations.
pub type Result<T> = std::result::Result<T, CriteriaError>;
