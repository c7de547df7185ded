use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::CACHE_FORMAT_VERSION;
use crate::error::PropertyError;
use crate::property::{Property, PropertyFactory};
use crate::value::{Value, ValueType};

/// Errors that can occur when capturing, restoring or storing cache entries.
#[derive(Debug, Error)]
pub enum CacheError {
  /// Only finalized properties can be captured.
  #[error("cannot capture {0}: the property has not been finalized")]
  NotFinalized(String),

  /// Reading or restoring a property failed.
  #[error(transparent)]
  Property(#[from] PropertyError),

  /// Cache keys become file names and must be plain.
  #[error("invalid cache key: {0:?}")]
  InvalidKey(String),

  #[error("failed to read cache entry: {0}")]
  Read(#[source] io::Error),

  #[error("failed to write cache entry: {0}")]
  Write(#[source] io::Error),

  #[error("failed to create cache directory: {0}")]
  CreateDir(#[source] io::Error),

  #[error("failed to remove cache entry: {0}")]
  Remove(#[source] io::Error),

  #[error("failed to parse cache entry: {0}")]
  Parse(#[source] serde_json::Error),

  #[error("failed to serialize cache entry: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("unsupported cache entry version: {0}")]
  UnsupportedVersion(u32),

  /// JSON has no representation for NaN or infinity.
  #[error("cannot cache {0}: its value contains a non-finite float")]
  NonFiniteFloat(String),
}

/// The serialized state of one finalized property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySnapshot {
  pub display_name: String,
  pub value_type: ValueType,
  /// `None` when the property had no value.
  pub value: Option<Value>,
}

impl PropertySnapshot {
  /// Capture the final value of `property`.
  pub fn capture(property: &Property) -> Result<Self, CacheError> {
    if !property.is_final() {
      return Err(CacheError::NotFinalized(property.display_name().to_string()));
    }
    let snapshot = Self {
      display_name: property.display_name().to_string(),
      value_type: property.value_type(),
      value: property.get_or_null()?,
    };
    snapshot.validate()?;
    Ok(snapshot)
  }

  /// Check that the value can be written and read back losslessly.
  pub fn validate(&self) -> Result<(), CacheError> {
    match &self.value {
      Some(value) if !is_finite(value) => Err(CacheError::NonFiniteFloat(self.display_name.clone())),
      _ => Ok(()),
    }
  }

  /// Rebuild a finalized property from this snapshot.
  ///
  /// The value goes through the same sanitization and type check as any
  /// other write, so a tampered entry fails here rather than at a later read.
  pub fn restore(&self, factory: &PropertyFactory) -> Result<Property, CacheError> {
    let mut property = factory.property(self.display_name.clone(), self.value_type);
    property.set_value(self.value.clone())?;
    property.finalize()?;
    Ok(property)
  }
}

/// A versioned group of property snapshots stored under one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
  pub version: u32,
  pub key: String,
  pub properties: Vec<PropertySnapshot>,
}

impl CacheEntry {
  /// An entry at the current format version.
  pub fn new(key: impl Into<String>, properties: Vec<PropertySnapshot>) -> Self {
    Self {
      version: CACHE_FORMAT_VERSION,
      key: key.into(),
      properties,
    }
  }

  /// Capture every property in `properties`. All of them must be finalized.
  pub fn capture<'a>(
    key: impl Into<String>,
    properties: impl IntoIterator<Item = &'a Property>,
  ) -> Result<Self, CacheError> {
    let snapshots = properties
      .into_iter()
      .map(PropertySnapshot::capture)
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self::new(key, snapshots))
  }

  /// Rebuild every captured property, in capture order.
  pub fn restore(&self, factory: &PropertyFactory) -> Result<Vec<Property>, CacheError> {
    self.properties.iter().map(|snapshot| snapshot.restore(factory)).collect()
  }

  /// Validate every snapshot. Fails on the first one that cannot be stored.
  pub fn validate(&self) -> Result<(), CacheError> {
    self.properties.iter().try_for_each(PropertySnapshot::validate)
  }
}

/// Whether every float in `value`, including nested ones, is finite.
fn is_finite(value: &Value) -> bool {
  match value {
    Value::Float(n) => n.is_finite(),
    Value::List(items) => items.iter().all(is_finite),
    Value::Map(entries) => entries.values().all(is_finite),
    Value::String(_) | Value::Integer(_) | Value::Boolean(_) | Value::Path(_) => true,
  }
}
