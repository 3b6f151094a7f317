//! Testing utilities for querer pipelines.
//!
//! This module provides:
//! - An in-memory transport that replays queued responses
//! - Response and pipeline fixtures

mod fixtures;
mod mocks;

pub use fixtures::{get, json_response, response, text_response};
pub use mocks::RecordingTransport;
