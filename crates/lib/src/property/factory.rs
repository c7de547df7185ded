use std::sync::Arc;

use crate::sanitize::SanitizerRegistry;
use crate::value::ValueType;

use super::lifecycle::{GuardPolicy, MutationGuard};
use super::types::Property;

/// Creates properties that share a sanitizer registry and a mutation guard.
#[derive(Debug, Clone)]
pub struct PropertyFactory {
  registry: SanitizerRegistry,
  guard: Arc<dyn MutationGuard>,
}

impl Default for PropertyFactory {
  fn default() -> Self {
    Self::new(SanitizerRegistry::default(), Arc::new(GuardPolicy::default()))
  }
}

impl PropertyFactory {
  /// A factory with an explicit registry and guard.
  pub fn new(registry: SanitizerRegistry, guard: Arc<dyn MutationGuard>) -> Self {
    Self { registry, guard }
  }

  /// A factory using the guard policy named by `LAZYPROP_GUARD_POLICY`.
  pub fn from_env() -> Self {
    Self::new(SanitizerRegistry::default(), Arc::new(GuardPolicy::from_env()))
  }

  /// The registry consulted for new properties' sanitizers.
  pub fn registry(&self) -> &SanitizerRegistry {
    &self.registry
  }

  /// Mutable access to the registry. Registrations only affect properties created afterwards.
  pub fn registry_mut(&mut self) -> &mut SanitizerRegistry {
    &mut self.registry
  }

  /// Create a property using the factory's registry and guard.
  pub fn property(&self, display_name: impl Into<String>, value_type: ValueType) -> Property {
    Property::with_registry(display_name, value_type, &self.registry).with_guard(Arc::clone(&self.guard))
  }
}
