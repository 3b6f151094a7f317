//! Handling a batch of responses as one input.

use super::extraction::ExtractionStage;
use super::invoker::Invoker;
use super::kind::HandlerStageKind;
use super::pipeline::Handled;
use super::precondition::PreconditionStage;
use super::stage::ResponseStage;
use super::stage_set::{StageSet, StageSetBuilder};
use crate::errors::{ConfigurationError, QuererError};
use crate::failures::{Failure, FailureRegistry};
use crate::message::HttpResponse;
use crate::observers::Observer;
use crate::scheme::Scheme;
use std::fmt;
use std::sync::Arc;

/// Validates a batch of responses and extracts one typed value from all of
/// them.
///
/// Preconditions see the whole `[HttpResponse]` slice; by default every
/// response must be 2xx. The extraction stage reduces the batch to a single
/// value. Failures are dispatched through a registry whose recovery actions
/// also see the whole batch.
///
/// # Example
///
/// ```rust
/// use querer::message::HttpResponse;
/// use querer::observers::NoOpObserver;
/// use querer::response::ResponsesPipeline;
/// use http::StatusCode;
///
/// let pipeline = ResponsesPipeline::<usize>::builder()
///     .use_extraction(|stage| {
///         stage.map(|responses| responses.iter().map(|r| r.bytes().len()).sum());
///     })
///     .build()
///     .unwrap();
///
/// let responses = vec![
///     HttpResponse::new(StatusCode::OK).with_body("ab"),
///     HttpResponse::new(StatusCode::OK).with_body("cde"),
/// ];
/// let total = pipeline.invoke(&responses, &NoOpObserver).unwrap();
/// assert_eq!(total, Some(5));
/// ```
pub struct ResponsesPipeline<T> {
    stages: StageSet<T, [HttpResponse]>,
    failures: FailureRegistry<T, [HttpResponse]>,
}

impl<T: 'static> ResponsesPipeline<T> {
    /// Returns a new builder.
    #[must_use]
    pub fn builder() -> ResponsesPipelineBuilder<T> {
        ResponsesPipelineBuilder::new()
    }

    /// Returns the stage order.
    #[must_use]
    pub fn scheme(&self) -> &Scheme<HandlerStageKind> {
        self.stages.scheme()
    }

    /// Returns the failure registry.
    #[must_use]
    pub fn failures(&self) -> &FailureRegistry<T, [HttpResponse]> {
        &self.failures
    }

    /// Returns the stages in execution order.
    #[must_use]
    pub fn stages(&self) -> Vec<&dyn ResponseStage<T, [HttpResponse]>> {
        self.stages.ordered()
    }

    /// Evaluates the batch without logging or recovery.
    ///
    /// A rejection by the precondition stage is reported as
    /// `admitted: false`.
    ///
    /// # Errors
    ///
    /// Returns the failure of any other stage.
    pub fn run(&self, responses: &[HttpResponse]) -> Result<Handled<T>, Failure> {
        self.stages.run(responses)
    }

    /// Runs the stages through an [`Invoker`], reporting to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`QuererError::Unrecovered`] when a stage fails and no
    /// registered recovery matches the failure's kind.
    pub fn invoke(
        &self,
        responses: &[HttpResponse],
        observer: &dyn Observer,
    ) -> Result<Option<T>, QuererError> {
        Invoker::new(&self.failures, observer).invoke(&self.stages(), responses)
    }
}

impl<T> fmt::Debug for ResponsesPipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsesPipeline")
            .field("stages", &self.stages)
            .field("failures", &self.failures)
            .finish()
    }
}

/// Builder for [`ResponsesPipeline`].
pub struct ResponsesPipelineBuilder<T> {
    parts: StageSetBuilder<T, [HttpResponse]>,
}

impl<T: 'static> ResponsesPipelineBuilder<T> {
    /// Creates a builder with the standard scheme.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: StageSetBuilder::new(),
        }
    }

    /// Configures the precondition stage.
    ///
    /// The stage starts empty, so the default all-2xx check no longer
    /// applies unless `configure` adds it back.
    #[must_use]
    pub fn use_precondition<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut PreconditionStage<[HttpResponse]>),
    {
        let mut stage = PreconditionStage::new();
        configure(&mut stage);
        self.parts.precondition = Some(stage);
        self
    }

    /// Configures the extraction stage.
    #[must_use]
    pub fn use_extraction<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut ExtractionStage<T, [HttpResponse]>),
    {
        let mut stage = ExtractionStage::new();
        configure(&mut stage);
        self.parts.extraction = Some(stage);
        self
    }

    /// Registers recovery actions.
    #[must_use]
    pub fn use_failures<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut FailureRegistry<T, [HttpResponse]>),
    {
        configure(&mut self.parts.failures);
        self
    }

    /// Replaces the stage order.
    #[must_use]
    pub fn use_scheme(mut self, scheme: Scheme<HandlerStageKind>) -> Self {
        self.parts.scheme = scheme;
        self
    }

    /// Appends a custom stage that runs after the built-in stages.
    #[must_use]
    pub fn use_stage(mut self, stage: Arc<dyn ResponseStage<T, [HttpResponse]>>) -> Self {
        self.parts.extensions.push(stage);
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingStage`] if the scheme includes
    /// extraction but no extraction stage was configured.
    pub fn build(self) -> Result<ResponsesPipeline<T>, ConfigurationError> {
        let (stages, failures) = self.parts.build(PreconditionStage::all_successful)?;
        Ok(ResponsesPipeline { stages, failures })
    }
}

impl<T: 'static> Default for ResponsesPipelineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ResponsesPipelineBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsesPipelineBuilder")
            .field("parts", &self.parts)
            .finish()
    }
}
