//! Observer trait and composable implementations.

use crate::failures::Failure;
use std::sync::Arc;

/// Formats a failure into a log message.
pub type FailureFormatter<'a> = &'a dyn Fn(&Failure) -> String;

/// Trait for components that record pipeline events.
///
/// Observers are passed explicitly into each invocation; the pipelines keep
/// no logging state of their own. Implementations must never fail.
pub trait Observer: Send + Sync {
    /// Records an informational event.
    fn inform(&self, message: &str);

    /// Records a warning.
    fn warn(&self, message: &str);

    /// Records a failure; `format` renders it into a message.
    fn error(&self, failure: &Failure, format: FailureFormatter<'_>);
}

impl<O: Observer + ?Sized> Observer for Arc<O> {
    fn inform(&self, message: &str) {
        (**self).inform(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }

    fn error(&self, failure: &Failure, format: FailureFormatter<'_>) {
        (**self).error(failure, format);
    }
}

impl<O: Observer + ?Sized> Observer for &O {
    fn inform(&self, message: &str) {
        (**self).inform(message);
    }

    fn warn(&self, message: &str) {
        (**self).warn(message);
    }

    fn error(&self, failure: &Failure, format: FailureFormatter<'_>) {
        (**self).error(failure, format);
    }
}

/// An observer that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl Observer for NoOpObserver {
    fn inform(&self, _message: &str) {}

    fn warn(&self, _message: &str) {}

    fn error(&self, _failure: &Failure, _format: FailureFormatter<'_>) {}
}

type MessageCallback = Box<dyn Fn(&str) + Send + Sync>;
type ErrorCallback = Box<dyn Fn(&Failure, FailureFormatter<'_>) + Send + Sync>;

/// An observer that forwards events to caller-supplied callbacks.
pub struct CallbackObserver {
    inform: MessageCallback,
    warn: MessageCallback,
    error: ErrorCallback,
}

impl CallbackObserver {
    /// Creates a callback observer.
    pub fn new<I, W, E>(inform: I, warn: W, error: E) -> Self
    where
        I: Fn(&str) + Send + Sync + 'static,
        W: Fn(&str) + Send + Sync + 'static,
        E: Fn(&Failure, FailureFormatter<'_>) + Send + Sync + 'static,
    {
        Self {
            inform: Box::new(inform),
            warn: Box::new(warn),
            error: Box::new(error),
        }
    }
}

impl std::fmt::Debug for CallbackObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackObserver").finish_non_exhaustive()
    }
}

impl Observer for CallbackObserver {
    fn inform(&self, message: &str) {
        (self.inform)(message);
    }

    fn warn(&self, message: &str) {
        (self.warn)(message);
    }

    fn error(&self, failure: &Failure, format: FailureFormatter<'_>) {
        (self.error)(failure, format);
    }
}

/// Broadcasts every event to its observers in registration order.
#[derive(Clone, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn Observer>>,
}

impl CompositeObserver {
    /// Creates a composite over `observers`.
    #[must_use]
    pub fn new(observers: Vec<Arc<dyn Observer>>) -> Self {
        Self { observers }
    }

    /// Appends an observer.
    pub fn push(&mut self, observer: Arc<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Returns the number of observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns true if there are no observers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Observer for CompositeObserver {
    fn inform(&self, message: &str) {
        for observer in &self.observers {
            observer.inform(message);
        }
    }

    fn warn(&self, message: &str) {
        for observer in &self.observers {
            observer.warn(message);
        }
    }

    fn error(&self, failure: &Failure, format: FailureFormatter<'_>) {
        for observer in &self.observers {
            observer.error(failure, format);
        }
    }
}

/// Fluent builder for a [`CompositeObserver`].
#[derive(Default)]
pub struct ObserverBuilder {
    observers: Vec<Arc<dyn Observer>>,
}

impl ObserverBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a [`super::TracingObserver`] at the default level.
    #[must_use]
    pub fn add_tracing(self) -> Self {
        self.add_observer(Arc::new(super::TracingObserver::default()))
    }

    /// Adds an arbitrary observer.
    #[must_use]
    pub fn add_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Adds several observers.
    #[must_use]
    pub fn add_observers(mut self, observers: impl IntoIterator<Item = Arc<dyn Observer>>) -> Self {
        self.observers.extend(observers);
        self
    }

    /// Adds a [`CallbackObserver`].
    #[must_use]
    pub fn add_callback<I, W, E>(self, inform: I, warn: W, error: E) -> Self
    where
        I: Fn(&str) + Send + Sync + 'static,
        W: Fn(&str) + Send + Sync + 'static,
        E: Fn(&Failure, FailureFormatter<'_>) + Send + Sync + 'static,
    {
        self.add_observer(Arc::new(CallbackObserver::new(inform, warn, error)))
    }

    /// Builds the composite observer.
    #[must_use]
    pub fn build(self) -> CompositeObserver {
        CompositeObserver::new(self.observers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failures::kinds;
    use crate::observers::{CollectingObserver, EventLevel};
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        observer.inform("started");
        observer.warn("slow");
        observer.error(&Failure::new(kinds::STAGE, "boom"), &|f| f.to_string());
    }

    #[test]
    fn test_callback_observer_routes_each_kind() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (inform_log, warn_log, error_log) = (Arc::clone(&log), Arc::clone(&log), Arc::clone(&log));

        let observer = CallbackObserver::new(
            move |m| inform_log.lock().push(format!("inform:{m}")),
            move |m| warn_log.lock().push(format!("warn:{m}")),
            move |failure, format| error_log.lock().push(format!("error:{}", format(failure))),
        );

        observer.inform("a");
        observer.warn("b");
        observer.error(&Failure::new(kinds::STAGE, "c"), &|f| f.message().to_uppercase());

        assert_eq!(*log.lock(), vec!["inform:a", "warn:b", "error:C"]);
    }

    #[test]
    fn test_composite_broadcasts_in_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let first = Arc::clone(&order);
        let second = Arc::clone(&order);

        let observer = ObserverBuilder::new()
            .add_callback(move |m| first.lock().push(format!("1:{m}")), |_| {}, |_, _| {})
            .add_callback(move |m| second.lock().push(format!("2:{m}")), |_| {}, |_, _| {})
            .build();

        assert_eq!(observer.len(), 2);
        observer.inform("x");
        assert_eq!(*order.lock(), vec!["1:x", "2:x"]);
    }

    #[test]
    fn test_composite_forwards_errors_to_all() {
        let a = Arc::new(CollectingObserver::new());
        let b = Arc::new(CollectingObserver::new());
        let observer = ObserverBuilder::new()
            .add_observers([a.clone() as Arc<dyn Observer>, b.clone() as Arc<dyn Observer>])
            .build();

        observer.error(&Failure::new(kinds::PRECONDITION, "rejected"), &|f| {
            format!("failed: {f}")
        });

        for collected in [&a, &b] {
            let events = collected.events();
            assert_eq!(events.len(), 1);
            assert_eq!(events[0].level, EventLevel::Error);
            assert_eq!(events[0].message, "failed: rejected");
        }
    }

    #[test]
    fn test_empty_composite() {
        let observer = ObserverBuilder::new().build();
        assert!(observer.is_empty());
        observer.warn("nobody listens");
    }
}
