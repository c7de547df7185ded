//! Configuration cache for finalized properties.
//!
//! Once a property is finalized its value can no longer change, so it can be
//! captured as a plain [`PropertySnapshot`] and restored later without
//! re-running the provider chain that produced it. Provider chains themselves
//! hold closures and are never serialized; capture requires finalization.
//!
//! # Submodules
//!
//! - [`storage`] - JSON persistence of [`CacheEntry`] values

pub mod storage;
mod types;

pub use storage::CacheStore;
pub use types::*;
