use std::fmt;
use std::sync::Arc;

use crate::consts::DEFAULT_PROVIDER_NAME;
use crate::error::{InvalidValueError, PropertyError, TransformError};
use crate::value::{Value, ValueType};

use super::supplier::{Transform, ValueSupplier};

/// A read-only, lazily evaluated producer of an optional value.
///
/// Providers are immutable: [`Provider::map`] and friends return new providers
/// that wrap the existing chain. Nothing is evaluated until a terminal read
/// (`get`, `get_or_null`, `get_or_else`, `is_present`).
///
/// A provider may carry a declared element type. Providers built from a
/// concrete value are typed; providers built from closures or by mapping are
/// untyped until [`Provider::with_type`] declares one.
#[derive(Clone)]
pub struct Provider {
  supplier: ValueSupplier,
  value_type: Option<ValueType>,
}

impl Provider {
  /// A provider of a fixed value, typed with the value's runtime type.
  pub fn of(value: impl Into<Value>) -> Self {
    let value = value.into();
    let value_type = Some(value.value_type());
    Self {
      supplier: ValueSupplier::fixed(value),
      value_type,
    }
  }

  /// A provider with no value.
  pub fn absent() -> Self {
    Self {
      supplier: ValueSupplier::Absent,
      value_type: None,
    }
  }

  /// A provider whose value is computed by `f` on every read.
  ///
  /// Returning `None` means "no value".
  pub fn from_fn<F>(f: F) -> Self
  where
    F: Fn() -> Option<Value> + Send + Sync + 'static,
  {
    Self {
      supplier: ValueSupplier::Computed(Arc::new(f)),
      value_type: None,
    }
  }

  pub(crate) fn from_supplier(supplier: ValueSupplier, value_type: Option<ValueType>) -> Self {
    Self { supplier, value_type }
  }

  /// The declared element type, if known.
  pub fn value_type(&self) -> Option<ValueType> {
    self.value_type
  }

  /// Declare the element type of this provider.
  ///
  /// Produced values are checked against `value_type` when read, so a
  /// declaration that does not match the produced value fails at evaluation
  /// time instead of leaking a mistyped value into a property.
  pub fn with_type(&self, value_type: ValueType) -> Provider {
    let check: Transform = Arc::new(move |value: Value| {
      if value_type.is_instance(&value) {
        Ok(value)
      } else {
        Err(InvalidValueError::ProducedType {
          declared: value_type,
          actual: value.value_type(),
        })
      }
    });
    Provider::from_supplier(self.supplier.map(check), Some(value_type))
  }

  /// Whether a read would produce a value. Does not run transforms.
  pub fn is_present(&self) -> bool {
    self.supplier.is_present()
  }

  /// Evaluate and return the value, failing when there is none.
  pub fn get(&self) -> Result<Value, PropertyError> {
    self.supplier.get(DEFAULT_PROVIDER_NAME)
  }

  /// Evaluate and return the value, or `None` when there is none.
  pub fn get_or_null(&self) -> Result<Option<Value>, PropertyError> {
    Ok(self.supplier.get_or_null()?)
  }

  /// Evaluate and return the value, or `default` when there is none.
  pub fn get_or_else(&self, default: impl Into<Value>) -> Result<Value, PropertyError> {
    Ok(self.supplier.get_or_null()?.unwrap_or_else(|| default.into()))
  }

  /// A new provider that applies `f` to this provider's value when read.
  pub fn map<F>(&self, f: F) -> Provider
  where
    F: Fn(Value) -> Value + Send + Sync + 'static,
  {
    let transform: Transform = Arc::new(move |value: Value| -> Result<Value, InvalidValueError> { Ok(f(value)) });
    Provider::from_supplier(self.supplier.map(transform), None)
  }

  /// Like [`Provider::map`], for transforms that can fail.
  ///
  /// A failure surfaces as [`InvalidValueError::Transform`] from whichever
  /// read forces evaluation.
  pub fn try_map<F>(&self, f: F) -> Provider
  where
    F: Fn(Value) -> Result<Value, TransformError> + Send + Sync + 'static,
  {
    let transform: Transform = Arc::new(move |value: Value| f(value).map_err(InvalidValueError::from));
    Provider::from_supplier(self.supplier.map(transform), None)
  }

  pub(crate) fn as_supplier(&self) -> ValueSupplier {
    self.supplier.clone()
  }
}

impl Default for Provider {
  fn default() -> Self {
    Self::absent()
  }
}

impl fmt::Display for Provider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.value_type {
      Some(value_type) => write!(f, "provider({}, {})", value_type, self.supplier),
      None => write!(f, "provider(?, {})", self.supplier),
    }
  }
}

impl fmt::Debug for Provider {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Provider")
      .field("value_type", &self.value_type)
      .field("supplier", &self.supplier)
      .finish()
  }
}
