//! In-memory observer.

use super::{FailureFormatter, Observer};
use crate::failures::Failure;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use std::fmt;

/// The kind of an observed event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventLevel {
    /// An informational event.
    Inform,
    /// A warning.
    Warn,
    /// A failure.
    Error,
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inform => write!(f, "inform"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// An event captured by a [`CollectingObserver`].
#[derive(Debug, Clone, Serialize)]
pub struct ObservedEvent {
    /// The event level.
    pub level: EventLevel,
    /// The rendered message.
    pub message: String,
    /// The failure kind, for error events.
    pub failure_kind: Option<String>,
    /// When the event was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// An observer that keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: RwLock<Vec<ObservedEvent>>,
}

impl CollectingObserver {
    /// Creates an empty collecting observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected events.
    #[must_use]
    pub fn events(&self) -> Vec<ObservedEvent> {
        self.events.read().clone()
    }

    /// Returns the collected messages, in order.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.events.read().iter().map(|e| e.message.clone()).collect()
    }

    /// Returns events of a given level.
    #[must_use]
    pub fn events_of_level(&self, level: EventLevel) -> Vec<ObservedEvent> {
        self.events
            .read()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }

    /// Returns the number of collected events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns true if nothing has been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Clears all collected events.
    pub fn clear(&self) {
        self.events.write().clear();
    }

    fn record(&self, level: EventLevel, message: String, failure_kind: Option<String>) {
        self.events.write().push(ObservedEvent {
            level,
            message,
            failure_kind,
            recorded_at: Utc::now(),
        });
    }
}

impl Observer for CollectingObserver {
    fn inform(&self, message: &str) {
        self.record(EventLevel::Inform, message.to_string(), None);
    }

    fn warn(&self, message: &str) {
        self.record(EventLevel::Warn, message.to_string(), None);
    }

    fn error(&self, failure: &Failure, format: FailureFormatter<'_>) {
        self.record(
            EventLevel::Error,
            format(failure),
            Some(failure.kind().name().to_string()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failures::kinds;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_collects_in_order() {
        let observer = CollectingObserver::new();
        assert!(observer.is_empty());

        observer.inform("one");
        observer.warn("two");
        observer.error(&Failure::new(kinds::EXTRACTION, "three"), &|f| f.to_string());

        assert_eq!(observer.len(), 3);
        assert_eq!(observer.messages(), vec!["one", "two", "three"]);

        let errors = observer.events_of_level(EventLevel::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].failure_kind.as_deref(), Some("extraction"));
    }

    #[test]
    fn test_clear() {
        let observer = CollectingObserver::new();
        observer.inform("x");
        observer.clear();
        assert!(observer.is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let observer = CollectingObserver::new();
        observer.warn("careful");

        let json = serde_json::to_value(&observer.events()[0]).unwrap();
        assert_eq!(json["level"], "warn");
        assert_eq!(json["message"], "careful");
        assert!(json["failure_kind"].is_null());
    }
}
