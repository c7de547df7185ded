//! Internal representation of "how to produce a value on demand".

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::debug;

use crate::error::{InvalidValueError, PropertyError};
use crate::value::Value;

/// A transform applied to the value produced by a base supplier.
pub(crate) type Transform = Arc<dyn Fn(Value) -> Result<Value, InvalidValueError> + Send + Sync>;

/// A lazily computed source with no base supplier.
pub(crate) type Source = Arc<dyn Fn() -> Option<Value> + Send + Sync>;

/// An immutable node in a supplier chain.
///
/// Chains compose by wrapping: [`ValueSupplier::map`] returns a new `Derived`
/// node that shares its base, and nothing evaluates until a read forces it.
#[derive(Clone)]
pub(crate) enum ValueSupplier {
  /// Produces no value.
  Absent,
  /// Produces the held value unconditionally.
  Fixed(Value),
  /// Evaluates the source on every read.
  Computed(Source),
  /// Applies `transform` to whatever `base` produces.
  Derived { base: Arc<ValueSupplier>, transform: Transform },
  /// Caches the first value (or absence) successfully produced by the inner supplier.
  Memoized(Arc<Memo>),
}

pub(crate) struct Memo {
  inner: ValueSupplier,
  cell: OnceLock<Option<Value>>,
}

impl Memo {
  fn is_present(&self) -> bool {
    match self.cell.get() {
      Some(cached) => cached.is_some(),
      None => self.inner.is_present(),
    }
  }

  fn get_or_null(&self) -> Result<Option<Value>, InvalidValueError> {
    if let Some(cached) = self.cell.get() {
      return Ok(cached.clone());
    }
    let produced = self.inner.get_or_null()?;
    Ok(self.cell.get_or_init(|| produced).clone())
  }
}

impl ValueSupplier {
  pub(crate) fn fixed(value: Value) -> Self {
    ValueSupplier::Fixed(value)
  }

  pub(crate) fn is_absent(&self) -> bool {
    matches!(self, ValueSupplier::Absent)
  }

  /// Whether a read would produce a value. Never fails.
  pub(crate) fn is_present(&self) -> bool {
    match self {
      ValueSupplier::Absent => false,
      ValueSupplier::Fixed(_) => true,
      ValueSupplier::Computed(source) => source().is_some(),
      ValueSupplier::Derived { base, .. } => base.is_present(),
      ValueSupplier::Memoized(memo) => memo.is_present(),
    }
  }

  /// Evaluate the chain. Absence is `Ok(None)`; transform failures are errors.
  pub(crate) fn get_or_null(&self) -> Result<Option<Value>, InvalidValueError> {
    match self {
      ValueSupplier::Absent => Ok(None),
      ValueSupplier::Fixed(value) => Ok(Some(value.clone())),
      ValueSupplier::Computed(source) => Ok(source()),
      ValueSupplier::Derived { base, transform } => match base.get_or_null()? {
        Some(value) => transform(value).map(Some),
        None => Ok(None),
      },
      ValueSupplier::Memoized(memo) => memo.get_or_null(),
    }
  }

  /// Evaluate the chain, failing with a missing-value error naming `display_name`.
  pub(crate) fn get(&self, display_name: &str) -> Result<Value, PropertyError> {
    self
      .get_or_null()?
      .ok_or_else(|| PropertyError::missing(display_name))
  }

  /// Wrap this supplier in a `Derived` node. Does not evaluate anything.
  pub(crate) fn map(&self, transform: Transform) -> ValueSupplier {
    ValueSupplier::Derived {
      base: Arc::new(self.clone()),
      transform,
    }
  }

  /// Wrap this supplier so its first successful result is cached.
  pub(crate) fn memoize(&self) -> ValueSupplier {
    match self {
      ValueSupplier::Absent => ValueSupplier::Absent,
      ValueSupplier::Memoized(_) => self.clone(),
      other => ValueSupplier::Memoized(Arc::new(Memo {
        inner: other.clone(),
        cell: OnceLock::new(),
      })),
    }
  }

  /// Force one evaluation now and return a memoized supplier holding the result.
  ///
  /// `Absent` stays `Absent` without evaluating anything.
  pub(crate) fn with_final_value(&self) -> Result<ValueSupplier, InvalidValueError> {
    if self.is_absent() {
      return Ok(ValueSupplier::Absent);
    }
    let memoized = self.memoize();
    let value = memoized.get_or_null()?;
    debug!(present = value.is_some(), "memoized final value");
    Ok(memoized)
  }
}

impl fmt::Display for ValueSupplier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValueSupplier::Absent => f.write_str("undefined"),
      ValueSupplier::Fixed(value) => write!(f, "fixed({})", value),
      ValueSupplier::Computed(_) => f.write_str("computed()"),
      ValueSupplier::Derived { base, .. } => write!(f, "map({})", base),
      ValueSupplier::Memoized(memo) => match memo.cell.get() {
        Some(Some(value)) => write!(f, "final({})", value),
        Some(None) => f.write_str("final(undefined)"),
        None => write!(f, "final({})", memo.inner),
      },
    }
  }
}

impl fmt::Debug for ValueSupplier {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ValueSupplier({})", self)
  }
}
