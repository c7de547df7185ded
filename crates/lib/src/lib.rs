//! lazyprop-lib: lazily evaluated, typed, convention-aware configuration properties
//!
//! This crate provides the value model used to configure units of work:
//! - `Provider`: read-only lazy producer of an optional typed value
//! - `Property`: mutable typed container with a convention fallback and a
//!   one-way finalization step
//! - `ValueSanitizer`: per-type coercion applied to values entering a property
//! - `CacheStore`: persistence of finalized property values
//! - `Pipeline`: staged validation, finalization and execution of a unit of work

pub mod cache;
pub mod consts;
pub mod error;
pub mod execute;
pub mod property;
pub mod provider;
pub mod sanitize;
pub mod util;
pub mod value;

pub use error::{InvalidValueError, PropertyError, TransformError};
pub use property::Property;
pub use provider::Provider;
pub use value::{Value, ValueType};
