//! Test utilities for lazyprop-lib.
//!
//! Counting sources and transforms let tests assert exactly when, and how
//! often, a lazy chain is evaluated.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::InvalidValueError;
use crate::provider::{Provider, Source, Transform};
use crate::value::Value;

/// An identity transform that counts its invocations.
pub fn counting_transform() -> (Transform, Arc<AtomicUsize>) {
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&calls);
  let transform: Transform = Arc::new(move |value: Value| -> Result<Value, InvalidValueError> {
    counter.fetch_add(1, Ordering::SeqCst);
    Ok(value)
  });
  (transform, calls)
}

/// A computed source returning `value` that counts its invocations.
pub fn counting_source(value: Option<Value>) -> (Source, Arc<AtomicUsize>) {
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&calls);
  let source: Source = Arc::new(move || {
    counter.fetch_add(1, Ordering::SeqCst);
    value.clone()
  });
  (source, calls)
}

/// An untyped provider of `value` that counts how often it is evaluated.
pub fn counting_provider(value: Value) -> (Provider, Arc<AtomicUsize>) {
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = Arc::clone(&calls);
  let provider = Provider::from_fn(move || {
    counter.fetch_add(1, Ordering::SeqCst);
    Some(value.clone())
  });
  (provider, calls)
}
