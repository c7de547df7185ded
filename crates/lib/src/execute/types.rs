//! Types for unit-of-work execution.
//!
//! This module defines the unit-of-work contract, the error types and the
//! outcome reported by the execution pipeline.

use thiserror::Error;

use crate::error::PropertyError;
use crate::property::Property;
use crate::value::Value;

/// Errors reported by a unit of work's `validate()`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
  /// A required property has no value.
  #[error("{work}: no value has been specified for {property}")]
  MissingValue { work: String, property: String },

  /// Reading a property failed for another reason.
  #[error("{work}: {source}")]
  Property {
    work: String,
    #[source]
    source: PropertyError,
  },

  /// A work-specific rule was violated.
  #[error("{work}: {message}")]
  Invalid { work: String, message: String },
}

impl ValidationError {
  /// A work-specific validation failure.
  pub fn invalid(work: impl Into<String>, message: impl Into<String>) -> Self {
    ValidationError::Invalid {
      work: work.into(),
      message: message.into(),
    }
  }
}

/// Errors that can occur while running a unit of work through the pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecuteError {
  /// Validation rejected the unit of work before it ran.
  #[error("validation failed: {0}")]
  Validation(#[from] ValidationError),

  /// Finalizing or reading a property failed.
  #[error("property error: {0}")]
  Property(#[from] PropertyError),

  /// The unit of work itself failed.
  #[error("{work} failed: {message}")]
  Failed { work: String, message: String },
}

/// Result of running a unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkOutcome {
  /// The work ran and did something.
  Executed,
  /// The work ran and had nothing to do, or a stage decided it need not run.
  NoWork,
}

/// Something the pipeline can validate, finalize and execute.
pub trait UnitOfWork {
  /// Name used in logs and error messages.
  fn display_name(&self) -> &str;

  /// Check the work's configuration. Must not have side effects.
  fn validate(&self) -> Result<(), ValidationError> {
    Ok(())
  }

  /// The properties the pipeline finalizes before execution.
  fn properties_mut(&mut self) -> Vec<&mut Property> {
    Vec::new()
  }

  fn execute(&mut self) -> Result<WorkOutcome, ExecuteError>;
}

/// Validation helper: read a required property, mapping absence to
/// [`ValidationError::MissingValue`].
pub fn require(work: &str, property: &Property) -> Result<Value, ValidationError> {
  match property.get_or_null() {
    Ok(Some(value)) => Ok(value),
    Ok(None) => Err(ValidationError::MissingValue {
      work: work.to_string(),
      property: property.display_name().to_string(),
    }),
    Err(source) => Err(ValidationError::Property {
      work: work.to_string(),
      source,
    }),
  }
}
