//! Declared failure kinds.

use serde::{Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifies a family of failures.
///
/// Kinds form a shallow tree: each kind declares at most one parent. Kinds
/// are plain values built with `const fn`, so callers extend the set by
/// declaring their own statics:
///
/// ```rust
/// use querer::failures::{kinds, FailureKind};
///
/// static QUOTA: FailureKind = FailureKind::child("quota", &kinds::PRECONDITION);
///
/// assert!(QUOTA.is_a(&kinds::HANDLING));
/// ```
///
/// Two kinds are equal when their paths are equal: same name, and equal
/// parents all the way to the root.
#[derive(Debug, Clone, Copy)]
pub struct FailureKind {
    name: &'static str,
    parent: Option<&'static FailureKind>,
}

impl FailureKind {
    /// Declares a kind with no parent.
    #[must_use]
    pub const fn root(name: &'static str) -> Self {
        Self { name, parent: None }
    }

    /// Declares a kind that descends from `parent`.
    #[must_use]
    pub const fn child(name: &'static str, parent: &'static FailureKind) -> Self {
        Self {
            name,
            parent: Some(parent),
        }
    }

    /// Returns the kind's name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared parent, if any.
    #[must_use]
    pub const fn parent(&self) -> Option<&'static FailureKind> {
        self.parent
    }

    /// Iterates over the ancestors of this kind, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = &'static FailureKind> {
        std::iter::successors(self.parent, |kind| kind.parent)
    }

    /// Returns true if this kind equals `other` or descends from it.
    #[must_use]
    pub fn is_a(&self, other: &FailureKind) -> bool {
        self == other || self.ancestors().any(|ancestor| ancestor == other)
    }

    /// Returns the number of ancestors above this kind.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ancestors().count()
    }

    /// Returns the dotted path from the root to this kind.
    #[must_use]
    pub fn path(&self) -> String {
        let mut names: Vec<&str> = self.ancestors().map(FailureKind::name).collect();
        names.reverse();
        names.push(self.name);
        names.join(".")
    }
}

impl PartialEq for FailureKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.parent == other.parent
    }
}

impl Eq for FailureKind {}

impl Hash for FailureKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        for ancestor in self.ancestors() {
            ancestor.name.hash(state);
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl Serialize for FailureKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

/// Built-in failure kinds.
///
/// ```text
/// querer ─┬─ transport
///         └─ handling ─┬─ precondition
///                      ├─ extraction ── decoding
///                      └─ stage
/// ```
pub mod kinds {
    use super::FailureKind;

    /// Root of every failure raised by this crate.
    pub static QUERER: FailureKind = FailureKind::root("querer");

    /// The network exchange failed.
    pub static TRANSPORT: FailureKind = FailureKind::child("transport", &QUERER);

    /// A response stage failed.
    pub static HANDLING: FailureKind = FailureKind::child("handling", &QUERER);

    /// A precondition predicate rejected the response.
    pub static PRECONDITION: FailureKind = FailureKind::child("precondition", &HANDLING);

    /// The extraction stage failed or its confirmation did not hold.
    pub static EXTRACTION: FailureKind = FailureKind::child("extraction", &HANDLING);

    /// A content decoder could not read the response body.
    pub static DECODING: FailureKind = FailureKind::child("decoding", &EXTRACTION);

    /// A caller-supplied stage reported failure.
    pub static STAGE: FailureKind = FailureKind::child("stage", &HANDLING);
}
