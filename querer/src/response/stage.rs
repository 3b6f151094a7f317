//! The response stage interface.

use crate::failures::{kinds, Failure, FailureKind};
use crate::message::HttpResponse;
use std::sync::Arc;

/// A step of response handling.
///
/// A stage reads its input and may write the value slot shared by the
/// stages of one invocation. Returning `Ok(false)` reports an unsuccessful
/// stage; the caller turns it into a [`Failure`] of [`Self::failure_kind`].
///
/// The input `R` is a single [`HttpResponse`] by default; batch handling
/// uses `[HttpResponse]`.
pub trait ResponseStage<T, R: ?Sized = HttpResponse>: Send + Sync {
    /// Returns the stage name.
    fn name(&self) -> &str;

    /// Returns the kind of failure raised when the stage reports `false`.
    fn failure_kind(&self) -> FailureKind {
        kinds::STAGE
    }

    /// Handles the response.
    ///
    /// # Errors
    ///
    /// Returns the stage's own failure.
    fn handle(&self, response: &R, value: &mut Option<T>) -> Result<bool, Failure>;
}

impl<T, R: ?Sized, S: ResponseStage<T, R> + ?Sized> ResponseStage<T, R> for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn failure_kind(&self) -> FailureKind {
        (**self).failure_kind()
    }

    fn handle(&self, response: &R, value: &mut Option<T>) -> Result<bool, Failure> {
        (**self).handle(response, value)
    }
}

/// Runs one stage and normalizes its outcome into a failure.
pub(crate) fn execute<T, R: ?Sized>(
    stage: &dyn ResponseStage<T, R>,
    response: &R,
    value: &mut Option<T>,
) -> Result<(), Failure> {
    match stage.handle(response, value) {
        Ok(true) => Ok(()),
        Ok(false) => Err(Failure::stage_failed(stage.failure_kind(), stage.name())),
        Err(failure) if failure.stage().is_none() => Err(failure.with_stage(stage.name())),
        Err(failure) => Err(failure),
    }
}

/// A response stage backed by a closure.
pub struct FnResponseStage<F> {
    name: String,
    kind: FailureKind,
    func: F,
}

impl<F> FnResponseStage<F> {
    /// Creates a stage raising [`kinds::STAGE`] failures.
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            kind: kinds::STAGE,
            func,
        }
    }

    /// Sets the kind of failure raised when the closure returns `false`.
    #[must_use]
    pub fn with_failure_kind(mut self, kind: FailureKind) -> Self {
        self.kind = kind;
        self
    }
}

impl<T, R: ?Sized, F> ResponseStage<T, R> for FnResponseStage<F>
where
    F: Fn(&R, &mut Option<T>) -> Result<bool, Failure> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn failure_kind(&self) -> FailureKind {
        self.kind
    }

    fn handle(&self, response: &R, value: &mut Option<T>) -> Result<bool, Failure> {
        (self.func)(response, value)
    }
}

impl<F> std::fmt::Debug for FnResponseStage<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnResponseStage")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}
