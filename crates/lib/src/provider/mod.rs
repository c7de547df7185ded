//! Lazy value producers.
//!
//! A [`Provider`] is the public, read-only face of a supplier chain. Every
//! chain bottoms out in one of: no value, a fixed value, or a closure computed
//! on demand; `map` wraps a chain in a transform without evaluating it, and
//! finalization wraps it in a cache so it is computed at most once.
//!
//! # Example
//!
//! ```
//! use lazyprop_lib::provider::Provider;
//! use lazyprop_lib::value::Value;
//!
//! let port = Provider::of(8080);
//! let url = port.map(|v| Value::from(format!("http://localhost:{}", v)));
//! assert_eq!(url.get().unwrap(), Value::from("http://localhost:8080"));
//! ```

mod supplier;
mod types;

#[cfg(test)]
pub(crate) use supplier::Source;
pub(crate) use supplier::{Transform, ValueSupplier};
pub use types::*;
