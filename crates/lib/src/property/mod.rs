//! Mutable, typed, convention-aware properties.
//!
//! A [`Property`] owns two suppliers: the current one, which reads go
//! through, and the convention, which the current one falls back to while no
//! explicit value is set. Writes are gated by a [`MutationGuard`] and the
//! whole thing freezes at [`Property::finalize`].
//!
//! # Example
//!
//! ```
//! use lazyprop_lib::property::Property;
//! use lazyprop_lib::value::{Value, ValueType};
//!
//! let mut greeting = Property::new("property 'greeting'", ValueType::String);
//! greeting.convention("default").unwrap();
//! assert_eq!(greeting.get().unwrap(), Value::from("default"));
//!
//! greeting.set("custom").unwrap();
//! greeting.finalize().unwrap();
//! greeting.set("ignored").unwrap();
//! assert_eq!(greeting.get().unwrap(), Value::from("custom"));
//! ```
//!
//! # Submodules
//!
//! - [`lifecycle`] - lifecycle states, the guard trait and built-in policies

mod factory;
pub mod lifecycle;
mod types;

pub use factory::PropertyFactory;
pub use lifecycle::{GuardPolicy, LifecycleState, MutationGuard};
pub use types::*;
