use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::thread;

use lazyprop_lib::error::{InvalidValueError, PropertyError};
use lazyprop_lib::property::{AnyValue, GuardPolicy, LifecycleState, Property, PropertyFactory};
use lazyprop_lib::provider::Provider;
use lazyprop_lib::sanitize::ValueSanitizer;
use lazyprop_lib::value::{Value, ValueType};

use super::common::counted;

#[test]
fn string_property_lifecycle() {
  let mut prop = Property::new("property 'greeting'", ValueType::String);
  prop.convention("default").unwrap();
  assert_eq!(prop.get().unwrap(), Value::from("default"));

  prop.set("custom").unwrap();
  assert_eq!(prop.get().unwrap(), Value::from("custom"));

  prop.finalize().unwrap();
  prop.set("ignored").unwrap();
  assert_eq!(prop.get().unwrap(), Value::from("custom"));
  assert_eq!(prop.state(), LifecycleState::Finalized);
}

#[test]
fn integer_property_without_convention() {
  let prop = Property::new("property 'retries'", ValueType::Integer);
  assert!(!prop.is_present());
  assert_eq!(prop.get_or_else(42).unwrap(), Value::from(42));

  let err = prop.get().unwrap_err();
  assert!(err.is_missing());
  assert!(err.to_string().contains("property 'retries'"));
}

#[test]
fn reset_reverts_to_latest_convention() {
  let mut prop = Property::new("property 'mode'", ValueType::String);
  prop.set("fast").unwrap();
  prop.convention("safe").unwrap();
  assert_eq!(prop.get().unwrap(), Value::from("fast"));

  prop.unset().unwrap();
  assert_eq!(prop.get().unwrap(), Value::from("safe"));
  assert!(!prop.has_explicit_value());
}

#[test]
fn reset_without_convention_is_absent() {
  let mut prop = Property::new("property 'mode'", ValueType::String);
  prop.set("fast").unwrap();
  prop.set_value(None).unwrap();
  assert!(!prop.is_present());
}

#[test]
fn path_values_are_sanitized_before_type_check() {
  let mut prop = Property::new("property 'outputDir'", ValueType::Path);
  prop.set("build/./classes").unwrap();
  assert_eq!(prop.get().unwrap(), Value::Path("build/classes".into()));
}

#[test]
fn mistyped_value_is_rejected_immediately() {
  let mut prop = Property::new("property 'enabled'", ValueType::Boolean);
  let err = prop.set("yes").unwrap_err();
  assert_eq!(
    err.to_string(),
    "Cannot set the value of a property of type Boolean using an instance of type String."
  );
  assert!(!prop.is_present());
}

#[test]
fn mistyped_provider_is_rejected_without_reading() {
  let mut prop = Property::new("property 'label'", ValueType::String);
  let (provider, calls) = counted(7);
  let err = prop.set_provider(provider.with_type(ValueType::Integer)).unwrap_err();

  assert_eq!(
    err,
    PropertyError::InvalidValue(InvalidValueError::ProviderType {
      declared: ValueType::String,
      actual: ValueType::Integer,
    })
  );
  assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn null_provider_is_rejected() {
  let mut prop = Property::new("property 'label'", ValueType::String);
  let err = prop.set_provider(None::<Provider>).unwrap_err();
  assert_eq!(err, PropertyError::InvalidValue(InvalidValueError::NullProvider));
}

#[test]
fn untyped_provider_is_checked_on_read() {
  let mut prop = Property::new("property 'count'", ValueType::Integer);
  prop.set_provider(Provider::from_fn(|| Some(Value::from("ten")))).unwrap();

  assert!(prop.is_present());
  let err = prop.get().unwrap_err();
  assert!(matches!(
    err,
    PropertyError::InvalidValue(InvalidValueError::ProducedType {
      declared: ValueType::Integer,
      actual: ValueType::String,
    })
  ));
}

#[test]
fn set_from_any_dispatches() {
  let mut prop = Property::new("property 'ratio'", ValueType::Float);
  prop.convention(0.5).unwrap();

  prop.set_from_any(Value::from(2)).unwrap();
  assert_eq!(prop.get().unwrap(), Value::Float(2.0));

  prop.set_from_any(Provider::of(0.25)).unwrap();
  assert_eq!(prop.get().unwrap(), Value::Float(0.25));

  prop.set_from_any(AnyValue::Null).unwrap();
  assert_eq!(prop.get().unwrap(), Value::Float(0.5));
}

#[test]
fn finalize_evaluates_provider_once() {
  let mut prop = Property::new("property 'version'", ValueType::String);
  let (provider, calls) = counted("1.2.3");
  prop.set_provider(provider).unwrap();
  assert_eq!(calls.load(Ordering::SeqCst), 0);

  prop.finalize().unwrap();
  prop.finalize().unwrap();
  for _ in 0..3 {
    assert_eq!(prop.get().unwrap(), Value::from("1.2.3"));
  }
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn as_provider_feeds_another_property() {
  let mut base = Property::new("property 'baseDir'", ValueType::Path);
  base.set("project").unwrap();

  let mut out = Property::new("property 'outDir'", ValueType::Path);
  let derived = base.as_provider().map(|v| match v {
    Value::Path(p) => Value::Path(p.join("out")),
    other => other,
  });
  out.set_provider(derived).unwrap();

  assert_eq!(out.get().unwrap(), Value::Path("project/out".into()));
}

#[test]
fn strict_policy_rejects_late_writes() {
  let mut prop = Property::new("property 'jobs'", ValueType::Integer).with_guard(Arc::new(GuardPolicy::StrictAfterFinalize));
  prop.set(4).unwrap();
  prop.finalize().unwrap();

  let err = prop.set(8).unwrap_err();
  assert_eq!(err.to_string(), "Cannot set the value of property 'jobs': the value is final");
  assert_eq!(prop.get().unwrap(), Value::from(4));
}

#[test]
fn lock_on_read_policy_rejects_writes_after_query() {
  let mut prop = Property::new("property 'jobs'", ValueType::Integer).with_guard(Arc::new(GuardPolicy::LockOnRead));
  prop.set(4).unwrap();
  prop.set(5).unwrap();
  assert_eq!(prop.get().unwrap(), Value::from(5));

  assert!(matches!(prop.set(6).unwrap_err(), PropertyError::Rejected { .. }));
}

#[derive(Debug)]
struct Lowercase;

impl ValueSanitizer for Lowercase {
  fn sanitize(&self, value: Value) -> Value {
    match value {
      Value::String(s) => Value::String(s.to_lowercase()),
      other => other,
    }
  }
}

#[test]
fn factory_applies_registered_sanitizer() {
  let mut factory = PropertyFactory::default();
  factory.registry_mut().register(ValueType::String, Arc::new(Lowercase));

  let mut prop = factory.property("property 'profile'", ValueType::String);
  prop.convention("RELEASE").unwrap();
  assert_eq!(prop.get().unwrap(), Value::from("release"));
}

#[test]
fn finalized_property_reads_from_many_threads() {
  let mut prop = Property::new("property 'target'", ValueType::String);
  let (provider, calls) = counted("x86_64");
  prop.set_provider(provider).unwrap();
  prop.finalize().unwrap();

  let prop = Arc::new(prop);
  let handles: Vec<_> = (0..4)
    .map(|_| {
      let prop = Arc::clone(&prop);
      thread::spawn(move || prop.get().unwrap())
    })
    .collect();

  for handle in handles {
    assert_eq!(handle.join().unwrap(), Value::from("x86_64"));
  }
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}
