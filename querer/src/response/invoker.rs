//! Stage execution with logging and failure dispatch.

use super::input::ResponseInput;
use super::stage::{execute, ResponseStage};
use crate::errors::QuererError;
use crate::failures::{Failure, FailureRegistry};
use crate::message::HttpResponse;
use crate::observers::Observer;
use tracing::{debug, info_span};
use uuid::Uuid;

/// Runs response stages in order and dispatches the first failure.
///
/// Every stage produces a start event and then a success or failure event.
/// The first failing stage halts the invocation: its failure is resolved
/// against the registry and either recovered or returned as
/// [`QuererError::Unrecovered`].
///
/// The input `R` is a single [`HttpResponse`] by default, or the
/// `[HttpResponse]` slice of a batch.
pub struct Invoker<'a, T, R: ?Sized = HttpResponse> {
    id: Uuid,
    registry: &'a FailureRegistry<T, R>,
    observer: &'a dyn Observer,
}

impl<'a, T, R: ResponseInput + ?Sized> Invoker<'a, T, R> {
    /// Creates an invoker with a fresh invocation id.
    pub fn new(registry: &'a FailureRegistry<T, R>, observer: &'a dyn Observer) -> Self {
        Self {
            id: Uuid::new_v4(),
            registry,
            observer,
        }
    }

    /// Returns the invocation id.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Runs `stages` against `input`.
    ///
    /// Returns the value left by the stages, the replacement produced by a
    /// recovery action, or `None` if a side-effect recovery consumed the
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`QuererError::Unrecovered`] carrying the original failure
    /// when no registered kind matches it.
    pub fn invoke(
        &self,
        stages: &[&dyn ResponseStage<T, R>],
        input: &R,
    ) -> Result<Option<T>, QuererError> {
        let span = info_span!(
            "invoke",
            invocation_id = %self.id,
            statuses = ?input.statuses()
        );
        let _guard = span.enter();

        let mut value = None;
        for stage in stages {
            let name = stage.name();
            self.observer.inform(&format!("Stage '{name}' started"));

            if let Err(failure) = execute(*stage, input, &mut value) {
                self.observer
                    .error(&failure, &|f| format!("Stage '{name}' failed: {f}"));
                return self.dispatch(input, failure);
            }
            self.observer.inform(&format!("Stage '{name}' succeeded"));
        }

        debug!("All stages succeeded");
        Ok(value)
    }

    fn dispatch(&self, input: &R, failure: Failure) -> Result<Option<T>, QuererError> {
        let kind = failure.kind();
        let Some(resolution) = self.registry.resolve(kind) else {
            self.observer.warn(&format!(
                "No recovery is registered for '{}' failures",
                kind.path()
            ));
            return Err(QuererError::Unrecovered(failure));
        };

        if resolution.exact {
            self.observer
                .inform(&format!("Recovering from '{kind}' failure"));
        } else {
            self.observer.inform(&format!(
                "Recovering from '{kind}' failure with the '{}' handler",
                resolution.matched
            ));
        }
        Ok(resolution.recovery.apply(input, &failure))
    }
}

impl<T, R: ?Sized> std::fmt::Debug for Invoker<'_, T, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("id", &self.id)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
