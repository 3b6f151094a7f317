//! Response-handling pipelines, stages and invoker.
//!
//! A [`ResponsePipeline`] admits a response through a [`PreconditionStage`],
//! extracts a typed value with an [`ExtractionStage`], and routes the first
//! stage failure through its [`crate::failures::FailureRegistry`]. A
//! [`ResponsesPipeline`] does the same over a whole batch of responses,
//! producing one value from all of them.

mod batch;
mod extraction;
mod input;
mod invoker;
mod kind;
mod pipeline;
mod precondition;
mod stage;
mod stage_set;

#[cfg(test)]
mod integration_tests;

pub use batch::{ResponsesPipeline, ResponsesPipelineBuilder};
pub use extraction::ExtractionStage;
pub use input::ResponseInput;
pub use invoker::Invoker;
pub use kind::HandlerStageKind;
pub use pipeline::{Handled, ResponsePipeline, ResponsePipelineBuilder};
pub use precondition::PreconditionStage;
pub use stage::{FnResponseStage, ResponseStage};
