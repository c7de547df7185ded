//! Dynamically typed configuration values and their type descriptors.
//!
//! Properties hold [`Value`]s and declare a [`ValueType`]. Type membership is
//! checked at runtime by comparing descriptors rather than through reflection.

mod types;

pub use types::*;
