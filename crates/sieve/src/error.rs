//! Error types for filter forms.

use sieve_criteria::CriteriaError;
use sieve_form::FormError;

/// Errors that can occur when applying a filter form.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    /// The operation needs a valid submitted form.
    #[error("{0}")]
    InvalidState(String),

    /// The form is missing its backend configuration.
    #[error("{0}")]
    Configuration(String),

    /// An argument cannot be used by the operation.
    #[error("{0}")]
    InvalidArgument(String),

    /// Filling the criteria failed.
    #[error(transparent)]
    Form(#[from] FormError),

    /// The criteria were rejected by the query.
    #[error(transparent)]
    Criteria(#[from] CriteriaError),
}

impl FilterError {
    /// The form was not submitted, or its submission was rejected.
    pub fn not_valid() -> Self {
        Self::InvalidState("the form is not valid".to_string())
    }

    /// Create a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result type for filter form operations.
pub type Result<T> = std::result::Result<T, FilterError>;
