use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Runtime type descriptor carried by properties and typed providers.
///
/// Values in this crate are dynamically typed, so every property declares the
/// type it accepts and every value reports the type it actually is. The two are
/// compared through [`ValueType::is_assignable_from`] and [`ValueType::is_instance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
  /// Top type: accepts every value.
  Any,
  String,
  Integer,
  Float,
  Boolean,
  Path,
  List,
  Map,
}

impl ValueType {
  /// Returns true when a value declared as `source` can be stored where `self` is expected.
  pub fn is_assignable_from(self, source: ValueType) -> bool {
    self == ValueType::Any || self == source
  }

  /// Returns true when `value` is a member of this type.
  pub fn is_instance(self, value: &Value) -> bool {
    self.is_assignable_from(value.value_type())
  }

  /// The type name used in error messages.
  pub fn name(self) -> &'static str {
    match self {
      ValueType::Any => "Any",
      ValueType::String => "String",
      ValueType::Integer => "Integer",
      ValueType::Float => "Float",
      ValueType::Boolean => "Boolean",
      ValueType::Path => "Path",
      ValueType::List => "List",
      ValueType::Map => "Map",
    }
  }
}

impl fmt::Display for ValueType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// A concrete configuration value.
///
/// There is no null variant: "no value" is a property of the
/// supplier that produces values, not of the values themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Value {
  String(String),
  Integer(i64),
  Float(f64),
  Boolean(bool),
  Path(PathBuf),
  List(Vec<Value>),
  Map(BTreeMap<String, Value>),
}

impl Value {
  /// The runtime type tag of this value. Never [`ValueType::Any`].
  pub fn value_type(&self) -> ValueType {
    match self {
      Value::String(_) => ValueType::String,
      Value::Integer(_) => ValueType::Integer,
      Value::Float(_) => ValueType::Float,
      Value::Boolean(_) => ValueType::Boolean,
      Value::Path(_) => ValueType::Path,
      Value::List(_) => ValueType::List,
      Value::Map(_) => ValueType::Map,
    }
  }

  /// The string, if this is a `String` value.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      Value::String(s) => Some(s),
      _ => None,
    }
  }

  /// The integer, if this is an `Integer` value.
  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Value::Integer(n) => Some(*n),
      _ => None,
    }
  }

  /// The float, if this is a `Float` value. Integers are not widened here.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      Value::Float(n) => Some(*n),
      _ => None,
    }
  }

  /// The boolean, if this is a `Boolean` value.
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Value::Boolean(b) => Some(*b),
      _ => None,
    }
  }

  /// The path, if this is a `Path` value.
  pub fn as_path(&self) -> Option<&Path> {
    match self {
      Value::Path(p) => Some(p),
      _ => None,
    }
  }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Value::String(s) => write!(f, "{:?}", s),
      Value::Integer(n) => write!(f, "{}", n),
      Value::Float(n) => write!(f, "{:?}", n),
      Value::Boolean(b) => write!(f, "{}", b),
      Value::Path(p) => write!(f, "{}", p.display()),
      Value::List(items) => {
        f.write_str("[")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{}", item)?;
        }
        f.write_str("]")
      }
      Value::Map(entries) => {
        f.write_str("{")?;
        for (i, (key, item)) in entries.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          write!(f, "{}: {}", key, item)?;
        }
        f.write_str("}")
      }
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self {
    Value::String(s.to_string())
  }
}

impl From<String> for Value {
  fn from(s: String) -> Self {
    Value::String(s)
  }
}

impl From<i64> for Value {
  fn from(n: i64) -> Self {
    Value::Integer(n)
  }
}

impl From<i32> for Value {
  fn from(n: i32) -> Self {
    Value::Integer(i64::from(n))
  }
}

impl From<f64> for Value {
  fn from(n: f64) -> Self {
    Value::Float(n)
  }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self {
    Value::Boolean(b)
  }
}

impl From<PathBuf> for Value {
  fn from(p: PathBuf) -> Self {
    Value::Path(p)
  }
}

impl From<&Path> for Value {
  fn from(p: &Path) -> Self {
    Value::Path(p.to_path_buf())
  }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
  fn from(items: Vec<T>) -> Self {
    Value::List(items.into_iter().map(Into::into).collect())
  }
}

impl From<BTreeMap<String, Value>> for Value {
  fn from(entries: BTreeMap<String, Value>) -> Self {
    Value::Map(entries)
  }
}

/// Returned when a [`Value`] cannot be converted into the requested Rust type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("expected a value of type {expected}, found {actual}")]
pub struct ValueConversionError {
  pub expected: ValueType,
  pub actual: ValueType,
}

macro_rules! impl_try_from_value {
  ($target:ty, $variant:ident, $tag:ident) => {
    impl TryFrom<Value> for $target {
      type Error = ValueConversionError;

      fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
          Value::$variant(inner) => Ok(inner),
          other => Err(ValueConversionError {
            expected: ValueType::$tag,
            actual: other.value_type(),
          }),
        }
      }
    }
  };
}

impl_try_from_value!(String, String, String);
impl_try_from_value!(i64, Integer, Integer);
impl_try_from_value!(f64, Float, Float);
impl_try_from_value!(bool, Boolean, Boolean);
impl_try_from_value!(PathBuf, Path, Path);
impl_try_from_value!(Vec<Value>, List, List);
