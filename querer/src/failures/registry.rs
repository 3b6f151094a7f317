//! Kind-keyed table of recovery actions.

use super::{Failure, FailureKind};
use crate::message::HttpResponse;
use std::fmt;

/// Side-effecting recovery callback.
pub type EffectFn<R = HttpResponse> = Box<dyn Fn(&R, &Failure) + Send + Sync>;

/// Recovery callback producing a replacement result.
pub type ReplaceFn<T, R = HttpResponse> = Box<dyn Fn(&R, &Failure) -> T + Send + Sync>;

/// What to do when a failure of a registered kind is raised.
///
/// `R` is what the recovery sees: a single [`HttpResponse`] by default, or
/// `[HttpResponse]` when handling a batch.
pub enum Recovery<T, R: ?Sized = HttpResponse> {
    /// Perform a side effect; the invocation then yields no value.
    Effect(EffectFn<R>),
    /// Produce a value that becomes the invocation's result.
    Replace(ReplaceFn<T, R>),
}

impl<T, R: ?Sized> Recovery<T, R> {
    /// Runs the recovery action.
    ///
    /// Returns the replacement value for [`Recovery::Replace`], `None` for
    /// [`Recovery::Effect`].
    pub fn apply(&self, response: &R, failure: &Failure) -> Option<T> {
        match self {
            Self::Effect(effect) => {
                effect(response, failure);
                None
            }
            Self::Replace(replace) => Some(replace(response, failure)),
        }
    }

    /// Returns true if this action produces a replacement value.
    #[must_use]
    pub fn replaces(&self) -> bool {
        matches!(self, Self::Replace(_))
    }
}

impl<T, R: ?Sized> fmt::Debug for Recovery<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Effect(_) => f.write_str("Recovery::Effect"),
            Self::Replace(_) => f.write_str("Recovery::Replace"),
        }
    }
}

/// A resolved registry entry.
pub struct Resolution<'a, T, R: ?Sized = HttpResponse> {
    /// The kind the action was registered under.
    pub matched: FailureKind,
    /// True if `matched` is the failure's own kind rather than an ancestor.
    pub exact: bool,
    /// The recovery action.
    pub recovery: &'a Recovery<T, R>,
}

impl<T, R: ?Sized> fmt::Debug for Resolution<'_, T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("matched", &self.matched)
            .field("exact", &self.exact)
            .field("recovery", self.recovery)
            .finish()
    }
}

/// Maps failure kinds to recovery actions.
///
/// Lookup prefers an exact kind match and otherwise walks the failure's
/// parent chain, returning the entry of the nearest registered ancestor.
pub struct FailureRegistry<T, R: ?Sized = HttpResponse> {
    entries: Vec<(FailureKind, Recovery<T, R>)>,
}

impl<T, R: ?Sized> FailureRegistry<T, R> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a side-effecting action for `kind`.
    pub fn on<F>(&mut self, kind: FailureKind, effect: F) -> &mut Self
    where
        F: Fn(&R, &Failure) + Send + Sync + 'static,
    {
        self.insert(kind, Recovery::Effect(Box::new(effect)))
    }

    /// Registers an action producing a replacement value for `kind`.
    pub fn recover<F>(&mut self, kind: FailureKind, replace: F) -> &mut Self
    where
        F: Fn(&R, &Failure) -> T + Send + Sync + 'static,
    {
        self.insert(kind, Recovery::Replace(Box::new(replace)))
    }

    /// Registers `recovery` under `kind`, replacing any earlier entry in place.
    pub fn insert(&mut self, kind: FailureKind, recovery: Recovery<T, R>) -> &mut Self {
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == kind) {
            entry.1 = recovery;
        } else {
            self.entries.push((kind, recovery));
        }
        self
    }

    /// Finds the recovery action for a failure of `kind`.
    pub fn resolve(&self, kind: FailureKind) -> Option<Resolution<'_, T, R>> {
        if let Some(recovery) = self.get(kind) {
            return Some(Resolution {
                matched: kind,
                exact: true,
                recovery,
            });
        }

        kind.ancestors().find_map(|ancestor| {
            self.get(*ancestor).map(|recovery| Resolution {
                matched: *ancestor,
                exact: false,
                recovery,
            })
        })
    }

    /// Returns the action registered exactly under `kind`.
    #[must_use]
    pub fn get(&self, kind: FailureKind) -> Option<&Recovery<T, R>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, recovery)| recovery)
    }

    /// Returns the registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = FailureKind> + '_ {
        self.entries.iter().map(|(kind, _)| *kind)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T, R: ?Sized> Default for FailureRegistry<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: ?Sized> fmt::Debug for FailureRegistry<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(kind, recovery)| (kind.path(), recovery)))
            .finish()
    }
}
