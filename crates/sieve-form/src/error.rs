//! Error types for form hydration.

use std::error::Error;

/// Errors that can occur while filling or generating a form value.
///
/// Validation failures are not errors: they are collected on the children
/// and reported through [`Form::errors`](crate::Form::errors).
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    /// The hydration target is not of the type the hydrator writes into.
    #[error("hydration target must be a {expected}")]
    TypeMismatch { expected: &'static str },

    /// The value generator of the form failed.
    #[error("cannot generate the form value: {0}")]
    Generation(#[source] Box<dyn Error + Send + Sync>),
}

impl FormError {
    /// Create a type mismatch error naming `T` as the expected target.
    pub fn type_mismatch<T: ?Sized>() -> Self {
        Self::TypeMismatch {
            expected: std::any::type_name::<T>(),
        }
    }

    /// Create a generation error.
    pub fn generation(err: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::Generation(err.into())
    }
}
