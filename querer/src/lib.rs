//! # Querer
//!
//! Stage-based construction of HTTP requests and typed handling of their
//! responses.
//!
//! Querer provides:
//!
//! - **Request pipelines**: an ordered set of configurable stages (method,
//!   url, content, headers, raw mutation) that compile into a request, each
//!   stage able to read what earlier stages configured
//! - **Response pipelines**: precondition predicates and a typed extraction
//!   stage, run by an invoker that logs every stage transition, over a
//!   single response or a whole batch
//! - **Failure dispatch**: recovery actions keyed by failure kind, matched
//!   exactly or through the nearest registered ancestor kind
//! - **Observers**: composable inform/warn/error sinks, passed explicitly
//!   to each invocation
//! - **Transports**: an async sending interface with a `reqwest` backend
//!   and a client that runs sequential batches
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use querer::prelude::*;
//!
//! let request = RequestPipeline::builder()
//!     .use_method(|stage| { stage.set(Method::GET); })
//!     .use_url(|stage| { stage.parse("https://example.com/items/7"); })
//!     .build()?;
//!
//! let handler = ResponsePipeline::<Item>::builder()
//!     .use_extraction(|stage| { stage.extract(decode::json()); })
//!     .use_failures(|failures| {
//!         failures.recover(kinds::PRECONDITION, |_, _| Item::missing());
//!     })
//!     .build()?;
//!
//! let client = Client::new(ReqwestTransport::with_defaults()?);
//! let item = client
//!     .execute(&request, &handler, &TracingObserver::default(), &CancellationToken::new())
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod decode;
pub mod errors;
pub mod failures;
pub mod message;
pub mod observers;
pub mod request;
pub mod response;
pub mod scheme;
pub mod testing;
pub mod transport;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::TransportConfig;
    pub use crate::decode;
    pub use crate::errors::{ConfigurationError, QuererError, TransportError};
    pub use crate::failures::{kinds, Failure, FailureKind, FailureRegistry, Recovery};
    pub use crate::message::{Body, HttpRequest, HttpResponse};
    pub use crate::observers::{
        CallbackObserver, CompositeObserver, NoOpObserver, Observer, ObserverBuilder,
        TracingObserver,
    };
    pub use crate::request::{
        RequestBatch, RequestPipeline, RequestStage, RequestStageKind, Snapshot,
    };
    pub use crate::response::{
        ExtractionStage, HandlerStageKind, PreconditionStage, ResponsePipeline, ResponseStage,
        ResponsesPipeline,
    };
    pub use crate::scheme::Scheme;
    pub use crate::transport::{Client, Transport};
    #[cfg(feature = "http-client")]
    pub use crate::transport::ReqwestTransport;
    pub use http::{Method, StatusCode};
    pub use url::Url;
}
