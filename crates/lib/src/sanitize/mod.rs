//! Per-type value coercion applied whenever a concrete value enters a property.
//!
//! A sanitizer may change the representation of a value (numeric widening,
//! path normalization) but callers always re-check type membership afterwards,
//! since a coercion on an `Any`-typed or mismatched value can produce a type
//! the property does not accept.

use std::collections::HashMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::value::{Value, ValueType};

/// Coerces values of a declared type into their canonical representation.
pub trait ValueSanitizer: Send + Sync + fmt::Debug {
  fn sanitize(&self, value: Value) -> Value;
}

/// Leaves values untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentitySanitizer;

impl ValueSanitizer for IdentitySanitizer {
  fn sanitize(&self, value: Value) -> Value {
    value
  }
}

/// Widens integers into floats.
#[derive(Debug, Clone, Copy, Default)]
pub struct FloatSanitizer;

impl ValueSanitizer for FloatSanitizer {
  fn sanitize(&self, value: Value) -> Value {
    match value {
      Value::Integer(n) => Value::Float(n as f64),
      other => other,
    }
  }
}

/// Converts strings into paths and normalizes them lexically.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathSanitizer;

impl ValueSanitizer for PathSanitizer {
  fn sanitize(&self, value: Value) -> Value {
    match value {
      Value::String(s) => Value::Path(normalize_path(Path::new(&s))),
      Value::Path(p) => Value::Path(normalize_path(&p)),
      other => other,
    }
  }
}

/// Converts paths into their string form.
///
/// A path that is not valid UTF-8 is left as a path, so the type check that
/// follows sanitization rejects it instead of storing a lossy string.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringSanitizer;

impl ValueSanitizer for StringSanitizer {
  fn sanitize(&self, value: Value) -> Value {
    match value {
      Value::Path(p) => match p.to_str() {
        Some(s) => Value::String(s.to_string()),
        None => Value::Path(p),
      },
      other => other,
    }
  }
}

/// Lexically normalize a path without touching the filesystem.
///
/// Repeated separators and `.` segments are dropped and verbatim Windows
/// prefixes are simplified. `..` segments are kept as written: folding them
/// against the preceding segment changes the target when that segment is a
/// symlink. A path made only of `.` segments becomes `.`; an empty path stays
/// empty.
pub fn normalize_path(path: &Path) -> PathBuf {
  let simplified = dunce::simplified(path);
  let mut out = PathBuf::new();

  for component in simplified.components() {
    match component {
      Component::CurDir => {}
      other => out.push(other.as_os_str()),
    }
  }

  if out.as_os_str().is_empty() && !path.as_os_str().is_empty() {
    out.push(".");
  }
  out
}

/// The built-in sanitizer for a declared type. Identity when no coercion is registered.
pub fn sanitizer_for(value_type: ValueType) -> Arc<dyn ValueSanitizer> {
  match value_type {
    ValueType::Float => Arc::new(FloatSanitizer),
    ValueType::Path => Arc::new(PathSanitizer),
    ValueType::String => Arc::new(StringSanitizer),
    ValueType::Any | ValueType::Integer | ValueType::Boolean | ValueType::List | ValueType::Map => {
      Arc::new(IdentitySanitizer)
    }
  }
}

/// Host-registered sanitizers, consulted before the built-ins.
#[derive(Debug, Clone, Default)]
pub struct SanitizerRegistry {
  custom: HashMap<ValueType, Arc<dyn ValueSanitizer>>,
}

impl SanitizerRegistry {
  /// An empty registry: every lookup falls through to the built-ins.
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a sanitizer for `value_type`, replacing any earlier registration.
  pub fn register(&mut self, value_type: ValueType, sanitizer: Arc<dyn ValueSanitizer>) {
    debug!(value_type = %value_type, ?sanitizer, "registering sanitizer");
    self.custom.insert(value_type, sanitizer);
  }

  /// The registered sanitizer for `value_type`, else the built-in one.
  pub fn sanitizer_for(&self, value_type: ValueType) -> Arc<dyn ValueSanitizer> {
    match self.custom.get(&value_type) {
      Some(sanitizer) => Arc::clone(sanitizer),
      None => sanitizer_for(value_type),
    }
  }
}
