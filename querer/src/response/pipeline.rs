//! The response-handling pipeline.

use super::extraction::ExtractionStage;
use super::invoker::Invoker;
use super::kind::HandlerStageKind;
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

/// The outcome of [`ResponsePipeline::run`] and
/// [`crate::response::ResponsesPipeline::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handled<T> {
    /// Whether the precondition stage admitted the input.
    pub admitted: bool,
    /// The extracted value. Always `None` when the input was not admitted.
    pub value: Option<T>,
}

impl<T> Handled<T> {
    /// Returns the extracted value.
    pub fn into_value(self) -> Option<T> {
        self.value
    }
}

/// Validates a response and extracts a typed value from it.
///
/// Stages run in scheme order (precondition, then extraction, by default),
/// followed by custom stages. A rejected precondition halts the pipeline
/// before extraction.
///
/// # Example
///
/// ```rust
/// use querer::decode;
/// use querer::failures::kinds;
/// use querer::message::HttpResponse;
/// use querer::observers::NoOpObserver;
/// use querer::response::ResponsePipeline;
/// use http::StatusCode;
///
/// let pipeline = ResponsePipeline::builder()
///     .use_extraction(|stage| {
///         stage.extract(decode::text(str::to_owned));
///     })
///     .use_failures(|failures| {
///         failures.recover(kinds::PRECONDITION, |response, _| {
///             format!("status {}", response.status().as_u16())
///         });
///     })
///     .build()
///     .unwrap();
///
/// let missing = HttpResponse::new(StatusCode::NOT_FOUND);
/// let value = pipeline.invoke(&missing, &NoOpObserver).unwrap();
/// assert_eq!(value.as_deref(), Some("status 404"));
/// ```
pub struct ResponsePipeline<T> {
    stages: StageSet<T, HttpResponse>,
    failures: FailureRegistry<T>,
}

impl<T: 'static> ResponsePipeline<T> {
    /// Returns a new builder.
    #[must_use]
    pub fn builder() -> ResponsePipelineBuilder<T> {
        ResponsePipelineBuilder::new()
    }

    /// Returns the stage order.
    #[must_use]
    pub fn scheme(&self) -> &Scheme<HandlerStageKind> {
        self.stages.scheme()
    }

    /// Returns the failure registry.
    #[must_use]
    pub fn failures(&self) -> &FailureRegistry<T> {
        &self.failures
    }

    /// Returns the stages in execution order.
    #[must_use]
    pub fn stages(&self) -> Vec<&dyn ResponseStage<T>> {
        self.stages.ordered()
    }

    /// Evaluates the response without logging or recovery.
    ///
    /// A rejection by the precondition stage is reported as
    /// `admitted: false`.
    ///
    /// # Errors
    ///
    /// Returns the failure of any other stage, including a
    /// [`crate::failures::kinds::PRECONDITION`] failure raised elsewhere.
    pub fn run(&self, response: &HttpResponse) -> Result<Handled<T>, Failure> {
        self.stages.run(response)
    }

    /// Runs the stages through an [`Invoker`], reporting to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`QuererError::Unrecovered`] when a stage fails and no
    /// registered recovery matches the failure's kind.
    pub fn invoke(
        &self,
        response: &HttpResponse,
        observer: &dyn Observer,
    ) -> Result<Option<T>, QuererError> {
        Invoker::new(&self.failures, observer).invoke(&self.stages(), response)
    }
}

impl<T> fmt::Debug for ResponsePipeline<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsePipeline")
            .field("stages", &self.stages)
            .field("failures", &self.failures)
            .finish()
    }
}

/// Builder for [`ResponsePipeline`].
pub struct ResponsePipelineBuilder<T> {
    parts: StageSetBuilder<T, HttpResponse>,
}

impl<T: 'static> ResponsePipelineBuilder<T> {
    /// Creates a builder with the standard scheme.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parts: StageSetBuilder::new(),
        }
    }

    /// Configures the precondition stage.
    ///
    /// The stage starts empty, so the default 2xx check no longer applies
    /// unless `configure` adds it back.
    #[must_use]
    pub fn use_precondition<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut PreconditionStage),
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
        F: FnOnce(&mut ExtractionStage<T>),
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
        F: FnOnce(&mut FailureRegistry<T>),
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
    pub fn use_stage(mut self, stage: Arc<dyn ResponseStage<T>>) -> Self {
        self.parts.extensions.push(stage);
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingStage`] if the scheme includes
    /// extraction but no extraction stage was configured.
    pub fn build(self) -> Result<ResponsePipeline<T>, ConfigurationError> {
        let (stages, failures) = self.parts.build(PreconditionStage::standard)?;
        Ok(ResponsePipeline { stages, failures })
    }
}

impl<T: 'static> Default for ResponsePipelineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ResponsePipelineBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsePipelineBuilder")
            .field("parts", &self.parts)
            .finish()
    }
}
