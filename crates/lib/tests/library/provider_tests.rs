use std::sync::atomic::Ordering;

use lazyprop_lib::error::{InvalidValueError, PropertyError, TransformError};
use lazyprop_lib::provider::Provider;
use lazyprop_lib::value::{Value, ValueType};

use super::common::counted;

#[test]
fn map_chain_is_not_evaluated_until_read() {
  let (source, calls) = counted(2);
  let chained = source
    .map(|v| Value::Integer(v.as_i64().unwrap_or_default() + 3))
    .map(|v| Value::Integer(v.as_i64().unwrap_or_default() * 2));
  assert_eq!(calls.load(Ordering::SeqCst), 0);

  assert_eq!(chained.get().unwrap(), Value::from(10));
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn map_over_absent_stays_absent() {
  let mapped = Provider::absent().map(|_| Value::from("never"));
  assert!(!mapped.is_present());
  assert_eq!(mapped.get_or_null().unwrap(), None);
  assert_eq!(mapped.get_or_else("fallback").unwrap(), Value::from("fallback"));
}

#[test]
fn transform_failure_is_reported_by_the_read() {
  let parsed = Provider::of("eight").try_map(|v| {
    v.as_str()
      .and_then(|s| s.parse::<i64>().ok())
      .map(Value::Integer)
      .ok_or_else(|| TransformError::new(format!("not a number: {}", v)))
  });

  let err = parsed.get().unwrap_err();
  assert_eq!(
    err,
    PropertyError::InvalidValue(InvalidValueError::Transform(TransformError::new(r#"not a number: "eight""#)))
  );
  assert_eq!(
    err.to_string(),
    r#"Failed to compute value: not a number: "eight""#
  );
}

#[test]
fn with_type_declares_and_checks() {
  let typed = Provider::from_fn(|| Some(Value::from(true))).with_type(ValueType::Boolean);
  assert_eq!(typed.value_type(), Some(ValueType::Boolean));
  assert_eq!(typed.get().unwrap(), Value::from(true));
}

#[test]
fn computed_provider_may_produce_nothing() {
  let provider = Provider::from_fn(|| None);
  assert!(!provider.is_present());
  assert!(provider.get().unwrap_err().is_missing());
}
