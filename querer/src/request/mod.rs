//! Request-build pipeline.
//!
//! A [`RequestPipeline`] assembles an [`crate::message::HttpRequest`] from
//! caller-supplied stage callbacks. The built-in stages are listed by
//! [`RequestStageKind`]; custom stages implement [`RequestStage`].

mod batch;
mod configure;
mod draft;
mod kind;
mod pipeline;
mod snapshot;
mod stage;

pub use batch::RequestBatch;
pub use configure::{ContentStage, HeadersStage, MethodStage, MutationStage, UrlStage};
pub use draft::{MutationFn, RequestDraft};
pub use kind::RequestStageKind;
pub use pipeline::{RequestPipeline, RequestPipelineBuilder};
pub use snapshot::Snapshot;
pub use stage::{FnRequestStage, RequestStage};
