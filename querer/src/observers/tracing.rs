//! Observer backed by the `tracing` ecosystem.

use super::{FailureFormatter, Observer};
use crate::failures::Failure;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// An observer that emits `tracing` events.
///
/// Warnings and failures are always emitted at `WARN` and `ERROR`; the level
/// used for informational events is configurable.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    level: Level,
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl TracingObserver {
    /// Creates an observer emitting informational events at `level`.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level observer.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level observer.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }
}

impl Observer for TracingObserver {
    fn inform(&self, message: &str) {
        if self.level == Level::DEBUG || self.level == Level::TRACE {
            debug!(target: "querer", "{}", message);
        } else {
            info!(target: "querer", "{}", message);
        }
    }

    fn warn(&self, message: &str) {
        warn!(target: "querer", "{}", message);
    }

    fn error(&self, failure: &Failure, format: FailureFormatter<'_>) {
        error!(
            target: "querer",
            failure_kind = %failure.kind().path(),
            stage = failure.stage().unwrap_or("-"),
            "{}",
            format(failure)
        );
    }
}

/// Installs a formatting subscriber filtered by `RUST_LOG`, falling back to
/// `default_filter`.
///
/// Returns false if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
