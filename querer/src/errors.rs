//! Error types for the querer pipelines.
//!
//! Three families exist: configuration errors raised while a request is
//! being compiled, transport errors raised by the network collaborator, and
//! stage failures (see [`crate::failures::Failure`]) which the invoker
//! dispatches to recovery actions before they ever reach the caller.

use crate::failures::Failure;
use thiserror::Error;

/// The umbrella error returned by pipeline invocations and the client.
#[derive(Debug, Error)]
pub enum QuererError {
    /// The request pipeline was misconfigured.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// A stage failed and no registered recovery action matched its kind.
    ///
    /// The failure is carried exactly as the stage produced it.
    #[error(transparent)]
    Unrecovered(#[from] Failure),

    /// The transport could not complete the exchange.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl QuererError {
    /// Returns the unrecovered failure, if this is one.
    #[must_use]
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::Unrecovered(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns true if this error was raised while configuring a request.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// Error raised when a pipeline is built or compiled with a missing or
/// invalid stage configuration.
///
/// These errors are fatal and never routed through a failure registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// A required stage was never supplied a value.
    #[error("The '{stage}' stage is required but was never configured")]
    MissingStage {
        /// The stage name.
        stage: &'static str,
    },

    /// The address stage was given a string that is not a valid URL.
    #[error("Invalid URL '{input}': {reason}")]
    InvalidUrl {
        /// The rejected input.
        input: String,
        /// The parser's explanation.
        reason: String,
    },

    /// The content stage could not serialize its payload.
    #[error("Content serialization failed: {0}")]
    Content(String),

    /// A scheme listed the same stage more than once.
    #[error("Stage '{stage}' appears more than once in the scheme")]
    DuplicateStage {
        /// The stage name.
        stage: &'static str,
    },

    /// A configuration value was rejected.
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigurationError {
    /// Creates a missing stage error.
    #[must_use]
    pub const fn missing(stage: &'static str) -> Self {
        Self::MissingStage { stage }
    }

    /// Creates an invalid URL error.
    #[must_use]
    pub fn invalid_url(input: impl Into<String>, reason: impl ToString) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}

/// Errors raised by a [`crate::transport::Transport`].
#[derive(Debug, Error)]
pub enum TransportError {
    /// The exchange was abandoned because its cancellation token fired.
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// The HTTP client reported an error.
    #[cfg(feature = "http-client")]
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Returns true if the exchange was cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}
