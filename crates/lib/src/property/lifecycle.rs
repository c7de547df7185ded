//! Property lifecycle and the mutation guard.
//!
//! A property starts [`LifecycleState::Mutable`] and moves once, and for good,
//! to [`LifecycleState::Finalized`]. Every write first asks a [`MutationGuard`]
//! whether it may proceed and every read notifies it, so the point at which a
//! property stops accepting changes is a host policy rather than a fixed rule.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, warn};

use crate::consts::GUARD_POLICY_ENV;
use crate::error::PropertyError;

/// Where a property is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
  /// Writes are permitted, subject to the guard.
  #[default]
  Mutable,
  /// The value is memoized and the convention released. Terminal.
  Finalized,
}

/// The kind of write being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
  /// An explicit value or provider.
  Set,
  /// A `set(null)`, reverting to the convention.
  Reset,
  /// A new convention.
  Convention,
}

impl Mutation {
  /// Phrase used in rejection messages, e.g. "set the value of".
  pub fn describe(self) -> &'static str {
    match self {
      Mutation::Set => "set the value of",
      Mutation::Reset => "reset the value of",
      Mutation::Convention => "set the convention of",
    }
  }
}

/// What a guard can see about the property it protects.
#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
  pub display_name: &'a str,
  pub state: LifecycleState,
  /// Whether the property has been read since it was created.
  pub queried: bool,
}

/// Decides whether writes to a property are allowed.
///
/// `before_mutate` and `before_reset` return `Ok(true)` to let the write
/// proceed, `Ok(false)` to ignore it silently, or an error to reject it.
pub trait MutationGuard: Send + Sync + fmt::Debug {
  fn before_mutate(&self, ctx: &GuardContext<'_>, mutation: Mutation) -> Result<bool, PropertyError>;

  fn before_reset(&self, ctx: &GuardContext<'_>) -> Result<bool, PropertyError> {
    self.before_mutate(ctx, Mutation::Reset)
  }

  /// Called before every read.
  fn before_read(&self, _ctx: &GuardContext<'_>) {}
}

/// Built-in guard policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardPolicy {
  /// Writes after finalization are ignored.
  #[default]
  IgnoreAfterFinalize,
  /// Writes after finalization are rejected with an error.
  StrictAfterFinalize,
  /// Writes after the first read are rejected; writes after finalization are ignored.
  LockOnRead,
}

impl GuardPolicy {
  /// The name accepted by `FromStr` and the environment variable.
  pub fn name(self) -> &'static str {
    match self {
      GuardPolicy::IgnoreAfterFinalize => "ignore-after-finalize",
      GuardPolicy::StrictAfterFinalize => "strict-after-finalize",
      GuardPolicy::LockOnRead => "lock-on-read",
    }
  }

  /// Read the policy from the `LAZYPROP_GUARD_POLICY` environment variable.
  ///
  /// Falls back to the default policy when the variable is unset, empty or
  /// names an unknown policy.
  pub fn from_env() -> Self {
    match std::env::var(GUARD_POLICY_ENV) {
      Ok(raw) if !raw.trim().is_empty() => match raw.parse() {
        Ok(policy) => {
          debug!(policy = %policy, "guard policy from environment");
          policy
        }
        Err(err) => {
          warn!(error = %err, fallback = %GuardPolicy::default(), "ignoring {}", GUARD_POLICY_ENV);
          GuardPolicy::default()
        }
      },
      _ => GuardPolicy::default(),
    }
  }
}

impl fmt::Display for GuardPolicy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown guard policy: {0}")]
pub struct UnknownPolicy(pub String);

impl FromStr for GuardPolicy {
  type Err = UnknownPolicy;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "ignore-after-finalize" => Ok(GuardPolicy::IgnoreAfterFinalize),
      "strict-after-finalize" => Ok(GuardPolicy::StrictAfterFinalize),
      "lock-on-read" => Ok(GuardPolicy::LockOnRead),
      other => Err(UnknownPolicy(other.to_string())),
    }
  }
}

fn rejected(ctx: &GuardContext<'_>, mutation: Mutation, reason: &str) -> PropertyError {
  PropertyError::Rejected {
    display_name: ctx.display_name.to_string(),
    operation: mutation.describe(),
    reason: reason.to_string(),
  }
}

impl MutationGuard for GuardPolicy {
  fn before_mutate(&self, ctx: &GuardContext<'_>, mutation: Mutation) -> Result<bool, PropertyError> {
    match (self, ctx.state) {
      (GuardPolicy::IgnoreAfterFinalize, LifecycleState::Finalized) => Ok(false),
      (GuardPolicy::StrictAfterFinalize, LifecycleState::Finalized) => {
        Err(rejected(ctx, mutation, "the value is final"))
      }
      (GuardPolicy::LockOnRead, LifecycleState::Finalized) => Ok(false),
      (GuardPolicy::LockOnRead, LifecycleState::Mutable) if ctx.queried => {
        Err(rejected(ctx, mutation, "the value has already been queried"))
      }
      (_, LifecycleState::Mutable) => Ok(true),
    }
  }
}
