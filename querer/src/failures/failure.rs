//! The failure value produced by stages.

use super::FailureKind;
use std::error::Error as StdError;
use std::fmt;

/// Boxed error carried as the cause of a failure.
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// A stage failure tagged with its declared kind.
///
/// Failures are produced by response stages, either explicitly (a stage
/// returns `Err`) or implicitly (a stage reports `false`, in which case the
/// invoker builds one with [`Failure::stage_failed`]).
pub struct Failure {
    kind: FailureKind,
    stage: Option<String>,
    message: String,
    source: Option<BoxError>,
}

impl Failure {
    /// Creates a new failure.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            stage: None,
            message: message.into(),
            source: None,
        }
    }

    /// Creates the generic failure for a stage that reported `false`.
    #[must_use]
    pub fn stage_failed(kind: FailureKind, stage: impl Into<String>) -> Self {
        let stage = stage.into();
        Self {
            kind,
            message: format!("Unsuccessful processing by the '{stage}' stage"),
            stage: Some(stage),
            source: None,
        }
    }

    /// Wraps an error raised inside a stage.
    #[must_use]
    pub fn from_error<E>(kind: FailureKind, error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            kind,
            stage: None,
            message: error.to_string(),
            source: Some(Box::new(error)),
        }
    }

    /// Sets the stage that produced the failure.
    #[must_use]
    pub fn with_stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    /// Sets the underlying cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<BoxError>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the declared kind.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// Returns the stage that produced the failure, if known.
    #[must_use]
    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    /// Returns the failure message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the failure's kind equals or descends from `kind`.
    #[must_use]
    pub fn is_a(&self, kind: &FailureKind) -> bool {
        self.kind.is_a(kind)
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Failure")
            .field("kind", &self.kind.name())
            .field("stage", &self.stage)
            .field("message", &self.message)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Failure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|source| source as &(dyn StdError + 'static))
    }
}
