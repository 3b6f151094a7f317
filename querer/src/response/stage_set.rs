//! The ordered stages shared by single and batch response pipelines.

use super::extraction::ExtractionStage;
use super::input::ResponseInput;
use super::kind::HandlerStageKind;
use super::pipeline::Handled;
use super::precondition::PreconditionStage;
use super::stage::{execute, ResponseStage};
use crate::errors::ConfigurationError;
use crate::failures::{Failure, FailureRegistry};
use crate::scheme::{Scheme, SchemeStage};
use std::fmt;
use std::sync::Arc;

/// Built-in stages in scheme order, followed by custom stages.
pub(super) struct StageSet<T, R: ?Sized> {
    scheme: Scheme<HandlerStageKind>,
    precondition: PreconditionStage<R>,
    extraction: ExtractionStage<T, R>,
    extensions: Vec<Arc<dyn ResponseStage<T, R>>>,
}

impl<T: 'static, R: ResponseInput + ?Sized + 'static> StageSet<T, R> {
    pub(super) fn scheme(&self) -> &Scheme<HandlerStageKind> {
        &self.scheme
    }

    /// Pairs each stage with its built-in kind; custom stages have none.
    fn tagged(&self) -> Vec<(Option<HandlerStageKind>, &dyn ResponseStage<T, R>)> {
        let mut stages: Vec<(Option<HandlerStageKind>, &dyn ResponseStage<T, R>)> =
            Vec::with_capacity(self.scheme.len() + self.extensions.len());
        for kind in self.scheme.iter() {
            let stage: &dyn ResponseStage<T, R> = match kind {
                HandlerStageKind::Precondition => &self.precondition,
                HandlerStageKind::Extraction => &self.extraction,
            };
            stages.push((Some(kind), stage));
        }
        stages.extend(
            self.extensions
                .iter()
                .map(|stage| (None, stage.as_ref() as &dyn ResponseStage<T, R>)),
        );
        stages
    }

    pub(super) fn ordered(&self) -> Vec<&dyn ResponseStage<T, R>> {
        self.tagged().into_iter().map(|(_, stage)| stage).collect()
    }

    /// Runs the stages without logging or recovery.
    ///
    /// Only a failure of the built-in precondition stage counts as a
    /// rejection; any other failure is returned, whatever its kind.
    pub(super) fn run(&self, input: &R) -> Result<Handled<T>, Failure> {
        let mut value = None;
        for (kind, stage) in self.tagged() {
            if let Err(failure) = execute(stage, input, &mut value) {
                if kind == Some(HandlerStageKind::Precondition) {
                    return Ok(Handled {
                        admitted: false,
                        value: None,
                    });
                }
                return Err(failure);
            }
        }
        Ok(Handled {
            admitted: true,
            value,
        })
    }
}

impl<T, R: ?Sized> fmt::Debug for StageSet<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSet")
            .field("scheme", &self.scheme.names())
            .field("precondition", &self.precondition)
            .field("extraction", &self.extraction)
            .field(
                "extensions",
                &self.extensions.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Collects stage configuration for a pipeline builder.
pub(super) struct StageSetBuilder<T, R: ?Sized> {
    pub(super) scheme: Scheme<HandlerStageKind>,
    pub(super) precondition: Option<PreconditionStage<R>>,
    pub(super) extraction: Option<ExtractionStage<T, R>>,
    pub(super) extensions: Vec<Arc<dyn ResponseStage<T, R>>>,
    pub(super) failures: FailureRegistry<T, R>,
}

impl<T, R: ?Sized> StageSetBuilder<T, R> {
    pub(super) fn new() -> Self {
        Self {
            scheme: Scheme::standard(),
            precondition: None,
            extraction: None,
            extensions: Vec::new(),
            failures: FailureRegistry::new(),
        }
    }

    /// Builds the stage set, falling back to `standard` when no
    /// precondition was configured.
    pub(super) fn build(
        self,
        standard: fn() -> PreconditionStage<R>,
    ) -> Result<(StageSet<T, R>, FailureRegistry<T, R>), ConfigurationError> {
        let extraction = match self.extraction {
            Some(stage) => stage,
            None if self.scheme.contains(HandlerStageKind::Extraction) => {
                return Err(ConfigurationError::missing(
                    HandlerStageKind::Extraction.name(),
                ));
            }
            None => ExtractionStage::new(),
        };

        let stages = StageSet {
            scheme: self.scheme,
            precondition: self.precondition.unwrap_or_else(standard),
            extraction,
            extensions: self.extensions,
        };
        Ok((stages, self.failures))
    }
}

impl<T, R: ?Sized> fmt::Debug for StageSetBuilder<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageSetBuilder")
            .field("scheme", &self.scheme.names())
            .field("precondition", &self.precondition)
            .field("extraction", &self.extraction)
            .field("failures", &self.failures)
            .finish_non_exhaustive()
    }
}
