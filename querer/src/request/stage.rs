//! Caller-defined request stages.

use super::draft::RequestDraft;
use super::snapshot::Snapshot;
use std::sync::Arc;

/// A custom stage that compiles into the draft after the built-in stages.
pub trait RequestStage: Send + Sync {
    /// Returns the stage name.
    fn name(&self) -> &str;

    /// Compiles into the draft. `snapshot` holds every configured value.
    fn compile(&self, draft: RequestDraft, snapshot: &Snapshot) -> RequestDraft;
}

impl<S: RequestStage + ?Sized> RequestStage for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compile(&self, draft: RequestDraft, snapshot: &Snapshot) -> RequestDraft {
        (**self).compile(draft, snapshot)
    }
}

/// A request stage backed by a closure.
pub struct FnRequestStage<F> {
    name: String,
    func: F,
}

impl<F> FnRequestStage<F>
where
    F: Fn(RequestDraft, &Snapshot) -> RequestDraft + Send + Sync,
{
    /// Creates a stage from a closure.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> RequestStage for FnRequestStage<F>
where
    F: Fn(RequestDraft, &Snapshot) -> RequestDraft + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn compile(&self, draft: RequestDraft, snapshot: &Snapshot) -> RequestDraft {
        (self.func)(draft, snapshot)
    }
}

impl<F> std::fmt::Debug for FnRequestStage<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnRequestStage")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
