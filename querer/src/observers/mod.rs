//! Observers for pipeline events.
//!
//! Observers receive three kinds of events (inform, warn, error) from the
//! invoker and the client. They are composable: a [`CompositeObserver`]
//! broadcasts every call to its members in registration order.

mod collecting;
mod observer;
mod tracing;

pub use self::tracing::{init_tracing, TracingObserver};
pub use collecting::{CollectingObserver, EventLevel, ObservedEvent};
pub use observer::{
    CallbackObserver, CompositeObserver, FailureFormatter, NoOpObserver, Observer,
    ObserverBuilder,
};
