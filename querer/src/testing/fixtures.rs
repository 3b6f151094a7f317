//! Response and pipeline fixtures.

use crate::message::{HttpResponse, JSON_MEDIA_TYPE};
use crate::request::{RequestPipeline, RequestPipelineBuilder};
use http::{Method, StatusCode};

/// Returns an empty response with the given status.
///
/// Unknown codes fall back to `500 Internal Server Error`.
#[must_use]
pub fn response(status: u16) -> HttpResponse {
    HttpResponse::new(StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
}

/// Returns a plain text response.
#[must_use]
pub fn text_response(status: u16, body: impl Into<String>) -> HttpResponse {
    response(status)
        .with_header("Content-Type", "text/plain; charset=utf-8")
        .with_body(body.into())
}

/// Returns a JSON response.
#[must_use]
pub fn json_response(status: u16, body: &serde_json::Value) -> HttpResponse {
    response(status)
        .with_header("Content-Type", JSON_MEDIA_TYPE)
        .with_body(body.to_string())
}

/// Returns a builder preconfigured for `GET url`.
#[must_use]
pub fn get(url: impl Into<String>) -> RequestPipelineBuilder {
    let url = url.into();
    RequestPipeline::builder()
        .use_method(|stage| {
            stage.set(Method::GET);
        })
        .use_url(move |stage| {
            stage.parse(&url);
        })
}
