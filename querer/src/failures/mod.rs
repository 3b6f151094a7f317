//! Failure kinds, failures, and the recovery registry.
//!
//! This module provides:
//! - `FailureKind`, a closed but extensible tree of failure families
//! - `Failure`, the error value stages raise
//! - `FailureRegistry`, which resolves a failure to a recovery action

mod failure;
mod kind;
mod registry;

pub use failure::{BoxError, Failure};
pub use kind::{kinds, FailureKind};
pub use registry::{EffectFn, FailureRegistry, Recovery, ReplaceFn, Resolution};
