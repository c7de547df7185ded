use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::consts::DEFAULT_PROPERTY_NAME;
use crate::error::{InvalidValueError, PropertyError};
use crate::provider::{Provider, Transform, ValueSupplier};
use crate::sanitize::{SanitizerRegistry, ValueSanitizer, sanitizer_for};
use crate::value::{Value, ValueType};

use super::lifecycle::{GuardContext, GuardPolicy, LifecycleState, Mutation, MutationGuard};

/// Either a concrete value, a provider, or nothing. Input to [`Property::set_from_any`].
#[derive(Debug, Clone)]
pub enum AnyValue {
  Null,
  Value(Value),
  Provider(Provider),
}

impl From<Value> for AnyValue {
  fn from(value: Value) -> Self {
    AnyValue::Value(value)
  }
}

impl From<Provider> for AnyValue {
  fn from(provider: Provider) -> Self {
    AnyValue::Provider(provider)
  }
}

impl From<Option<Value>> for AnyValue {
  fn from(value: Option<Value>) -> Self {
    value.map_or(AnyValue::Null, AnyValue::Value)
  }
}

/// A typed, convention-aware, lazily evaluated configuration slot.
///
/// The effective value comes from the current supplier, which is one of: no
/// value, a fixed (already sanitized and type-checked) value, a provider
/// chain, or the convention. A convention applies for as long as no explicit
/// value has been set; an explicit value always wins until it is reset with
/// [`Property::unset`].
///
/// After [`Property::finalize`] the current supplier is memoized, the
/// convention is released and further writes go through the mutation guard,
/// which by default ignores them.
///
/// Writes take `&mut self`; reads take `&self`, so a finalized property can be
/// shared across threads for reading.
pub struct Property {
  display_name: String,
  value_type: ValueType,
  sanitizer: Arc<dyn ValueSanitizer>,
  guard: Arc<dyn MutationGuard>,
  value: ValueSupplier,
  convention: ValueSupplier,
  has_explicit_value: bool,
  state: LifecycleState,
  queried: AtomicBool,
}

impl Property {
  /// A property of `value_type` with the built-in sanitizer and default guard.
  pub fn new(display_name: impl Into<String>, value_type: ValueType) -> Self {
    Self::with_sanitizer(display_name, value_type, sanitizer_for(value_type))
  }

  /// A property whose sanitizer is looked up in `registry`.
  pub fn with_registry(display_name: impl Into<String>, value_type: ValueType, registry: &SanitizerRegistry) -> Self {
    Self::with_sanitizer(display_name, value_type, registry.sanitizer_for(value_type))
  }

  /// A property with an explicit sanitizer. An empty display name falls back to "this property".
  pub fn with_sanitizer(
    display_name: impl Into<String>,
    value_type: ValueType,
    sanitizer: Arc<dyn ValueSanitizer>,
  ) -> Self {
    let mut display_name = display_name.into();
    if display_name.is_empty() {
      display_name = DEFAULT_PROPERTY_NAME.to_string();
    }
    Self {
      display_name,
      value_type,
      sanitizer,
      guard: Arc::new(GuardPolicy::default()),
      value: ValueSupplier::Absent,
      convention: ValueSupplier::Absent,
      has_explicit_value: false,
      state: LifecycleState::Mutable,
      queried: AtomicBool::new(false),
    }
  }

  /// Replace the mutation guard.
  pub fn with_guard(mut self, guard: Arc<dyn MutationGuard>) -> Self {
    self.guard = guard;
    self
  }

  /// Name used in error messages and logs.
  pub fn display_name(&self) -> &str {
    &self.display_name
  }

  /// The declared type every stored value must be an instance of.
  pub fn value_type(&self) -> ValueType {
    self.value_type
  }

  /// Current lifecycle state.
  pub fn state(&self) -> LifecycleState {
    self.state
  }

  /// Whether [`Property::finalize`] has succeeded.
  pub fn is_final(&self) -> bool {
    self.state == LifecycleState::Finalized
  }

  /// Whether an explicit value or provider is in effect, as opposed to the convention.
  pub fn has_explicit_value(&self) -> bool {
    self.has_explicit_value
  }

  // === Writes ===

  /// Set an explicit value. Shorthand for `set_value(Some(value))`.
  pub fn set(&mut self, value: impl Into<Value>) -> Result<(), PropertyError> {
    self.set_value(Some(value.into()))
  }

  /// Discard any explicit value and fall back to the convention. Shorthand for `set_value(None)`.
  pub fn unset(&mut self) -> Result<(), PropertyError> {
    self.set_value(None)
  }

  /// Set an explicit value, or with `None` revert to the convention.
  ///
  /// A value is sanitized first and then checked against the declared type,
  /// so a coercing sanitizer can make an otherwise mismatched value acceptable.
  pub fn set_value(&mut self, value: Option<Value>) -> Result<(), PropertyError> {
    let Some(value) = value else {
      if self.permit(Mutation::Reset)? {
        debug!(property = %self.display_name, "reverting to convention");
        self.value = self.convention.clone();
        self.has_explicit_value = false;
      }
      return Ok(());
    };

    if self.permit(Mutation::Set)? {
      self.value = self.accept_value(value)?;
      self.has_explicit_value = true;
    }
    Ok(())
  }

  /// Set the value from a provider. `None` is rejected as a null provider.
  ///
  /// A provider with a declared type must be assignable to this property's
  /// type or the call fails immediately. An untyped provider is accepted and
  /// its values are sanitized and type-checked lazily, on each read.
  pub fn set_provider(&mut self, provider: impl Into<Option<Provider>>) -> Result<(), PropertyError> {
    if !self.permit(Mutation::Set)? {
      return Ok(());
    }
    let provider = provider.into().ok_or(InvalidValueError::NullProvider)?;
    self.value = self.accept_provider(&provider)?;
    self.has_explicit_value = true;
    Ok(())
  }

  /// Dispatch on whether `value` is a provider, a value or null.
  pub fn set_from_any(&mut self, value: impl Into<AnyValue>) -> Result<(), PropertyError> {
    match value.into() {
      AnyValue::Null => self.unset(),
      AnyValue::Value(value) => self.set(value),
      AnyValue::Provider(provider) => self.set_provider(provider),
    }
  }

  /// Chainable form of [`Property::set_value`].
  pub fn value(&mut self, value: Option<Value>) -> Result<&mut Self, PropertyError> {
    self.set_value(value)?;
    Ok(self)
  }

  /// Chainable form of [`Property::set_provider`].
  pub fn value_provider(&mut self, provider: Provider) -> Result<&mut Self, PropertyError> {
    self.set_provider(provider)?;
    Ok(self)
  }

  /// Declare a fixed convention.
  pub fn convention(&mut self, value: impl Into<Value>) -> Result<&mut Self, PropertyError> {
    if self.permit(Mutation::Convention)? {
      let supplier = self.accept_value(value.into())?;
      self.apply_convention(supplier);
    }
    Ok(self)
  }

  /// Declare a convention computed by a provider.
  pub fn convention_provider(&mut self, provider: Provider) -> Result<&mut Self, PropertyError> {
    if self.permit(Mutation::Convention)? {
      let supplier = self.accept_provider(&provider)?;
      self.apply_convention(supplier);
    }
    Ok(self)
  }

  /// Memoize the current value and release the convention. Idempotent.
  ///
  /// The current supplier is evaluated once here. If that evaluation fails the
  /// error is returned and the property stays mutable.
  pub fn finalize(&mut self) -> Result<(), PropertyError> {
    if self.is_final() {
      return Ok(());
    }
    self.value = self.value.with_final_value()?;
    self.convention = ValueSupplier::Absent;
    self.state = LifecycleState::Finalized;
    info!(property = %self.display_name, present = self.value.is_present(), "finalized property");
    debug!(property = %self.display_name, value = %self.value, "final value");
    Ok(())
  }

  // === Reads ===

  /// Evaluate the current supplier, failing with a missing-value error when there is no value.
  pub fn get(&self) -> Result<Value, PropertyError> {
    self.before_read();
    self.value.get(&self.display_name)
  }

  /// Evaluate the current supplier. Absence is `Ok(None)`.
  pub fn get_or_null(&self) -> Result<Option<Value>, PropertyError> {
    self.before_read();
    Ok(self.value.get_or_null()?)
  }

  /// Evaluate the current supplier, or return `default` when there is no value.
  pub fn get_or_else(&self, default: impl Into<Value>) -> Result<Value, PropertyError> {
    self.before_read();
    Ok(self.value.get_or_null()?.unwrap_or_else(|| default.into()))
  }

  /// Whether a read would produce a value. Does not run transforms.
  pub fn is_present(&self) -> bool {
    self.before_read();
    self.value.is_present()
  }

  /// A provider over the current supplier, typed with the declared type.
  ///
  /// The provider captures the supplier in effect now; later writes to the
  /// property do not affect it.
  pub fn as_provider(&self) -> Provider {
    Provider::from_supplier(self.value.clone(), Some(self.value_type))
  }

  // === Internals ===

  fn guard_context(&self) -> GuardContext<'_> {
    GuardContext {
      display_name: &self.display_name,
      state: self.state,
      queried: self.queried.load(Ordering::Relaxed),
    }
  }

  fn permit(&self, mutation: Mutation) -> Result<bool, PropertyError> {
    let ctx = self.guard_context();
    let permitted = match mutation {
      Mutation::Reset => self.guard.before_reset(&ctx)?,
      Mutation::Set | Mutation::Convention => self.guard.before_mutate(&ctx, mutation)?,
    };
    if !permitted {
      debug!(
        property = %self.display_name,
        operation = mutation.describe(),
        state = ?self.state,
        "ignoring write"
      );
    }
    Ok(permitted)
  }

  fn before_read(&self) {
    self.guard.before_read(&self.guard_context());
    self.queried.store(true, Ordering::Relaxed);
  }

  fn apply_convention(&mut self, supplier: ValueSupplier) {
    if !self.has_explicit_value {
      debug!(property = %self.display_name, convention = %supplier, "applying convention");
      self.value = supplier.clone();
    }
    self.convention = supplier;
  }

  fn accept_value(&self, value: Value) -> Result<ValueSupplier, InvalidValueError> {
    let value = self.sanitizer.sanitize(value);
    if !self.value_type.is_instance(&value) {
      return Err(InvalidValueError::ValueType {
        declared: self.value_type,
        actual: value.value_type(),
      });
    }
    Ok(ValueSupplier::fixed(value))
  }

  fn accept_provider(&self, provider: &Provider) -> Result<ValueSupplier, InvalidValueError> {
    match provider.value_type() {
      Some(actual) if !self.value_type.is_assignable_from(actual) => Err(InvalidValueError::ProviderType {
        declared: self.value_type,
        actual,
      }),
      Some(_) => Ok(provider.as_supplier()),
      None => {
        let declared = self.value_type;
        let sanitizer = Arc::clone(&self.sanitizer);
        let check: Transform = Arc::new(move |value: Value| {
          let value = sanitizer.sanitize(value);
          if declared.is_instance(&value) {
            Ok(value)
          } else {
            Err(InvalidValueError::ProducedType {
              declared,
              actual: value.value_type(),
            })
          }
        });
        Ok(provider.as_supplier().map(check))
      }
    }
  }
}

impl fmt::Display for Property {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Must not evaluate the supplier.
    write!(f, "property({}, {})", self.value_type, self.value)
  }
}

impl fmt::Debug for Property {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Property")
      .field("display_name", &self.display_name)
      .field("value_type", &self.value_type)
      .field("value", &self.value)
      .field("convention", &self.convention)
      .field("has_explicit_value", &self.has_explicit_value)
      .field("state", &self.state)
      .finish_non_exhaustive()
  }
}
