//! Error types for property and provider operations.

use thiserror::Error;

use crate::value::ValueType;

/// Errors raised by reads and writes on properties and providers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
  /// A forced read found no value. Never raised by `get_or_null`, `get_or_else`
  /// or `is_present`.
  #[error("Cannot query the value of {display_name} because it has no value available.")]
  MissingValue { display_name: String },

  /// A value or provider was not acceptable for the declared type, or a
  /// transform in a provider chain failed.
  #[error(transparent)]
  InvalidValue(#[from] InvalidValueError),

  /// A mutation guard refused a write. Only produced by non-default policies.
  #[error("Cannot {operation} {display_name}: {reason}")]
  Rejected {
    display_name: String,
    operation: &'static str,
    reason: String,
  },
}

impl PropertyError {
  /// A missing-value error naming `display_name`.
  pub fn missing(display_name: impl Into<String>) -> Self {
    PropertyError::MissingValue {
      display_name: display_name.into(),
    }
  }

  /// Whether this is a missing-value error.
  pub fn is_missing(&self) -> bool {
    matches!(self, PropertyError::MissingValue { .. })
  }

  /// Whether this is an invalid-value error.
  pub fn is_invalid(&self) -> bool {
    matches!(self, PropertyError::InvalidValue(_))
  }
}

/// A value that cannot enter, or be produced by, a typed slot.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidValueError {
  /// A concrete value failed the post-sanitization type check.
  #[error("Cannot set the value of a property of type {declared} using an instance of type {actual}.")]
  ValueType { declared: ValueType, actual: ValueType },

  /// A provider's declared type is not assignable to the property's type.
  #[error("Cannot set the value of a property of type {declared} using a provider of type {actual}.")]
  ProviderType { declared: ValueType, actual: ValueType },

  /// An untyped provider produced a value of the wrong type when evaluated.
  #[error(
    "Cannot get the value of a property of type {declared} as the provider associated with this property returned a value of type {actual}."
  )]
  ProducedType { declared: ValueType, actual: ValueType },

  #[error("Cannot set the value of a property using a null provider.")]
  NullProvider,

  /// A user transform in a provider chain failed.
  #[error("Failed to compute value: {0}")]
  Transform(#[from] TransformError),
}

impl InvalidValueError {
  /// The declared and actual type names, when the error is a type mismatch.
  pub fn types(&self) -> Option<(ValueType, ValueType)> {
    match self {
      InvalidValueError::ValueType { declared, actual }
      | InvalidValueError::ProviderType { declared, actual }
      | InvalidValueError::ProducedType { declared, actual } => Some((*declared, *actual)),
      InvalidValueError::NullProvider | InvalidValueError::Transform(_) => None,
    }
  }
}

/// Failure returned by a fallible provider transform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransformError {
  pub message: String,
}

impl TransformError {
  /// A transform failure with `message`.
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
    }
  }
}
