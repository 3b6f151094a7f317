//! The network collaborator and the client that drives it.
//!
//! A [`Transport`] sends one [`HttpRequest`] and returns its
//! [`HttpResponse`]. The [`Client`] compiles request pipelines, sends them
//! through a transport and hands the responses to response pipelines.

mod client;
#[cfg(feature = "http-client")]
mod http_client;


pub use client::Client;
#[cfg(feature = "http-client")]
pub use http_client::ReqwestTransport;

use crate::cancellation::CancellationToken;
use crate::errors::TransportError;
use crate::message::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Sends requests over the network.
///
/// Transports own cancellation: the token is passed through untouched by
/// the pipelines.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends one request.
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError>;

    /// Sends requests one at a time, in order.
    ///
    /// Stops at the first error.
    async fn send_batch(
        &self,
        requests: Vec<HttpRequest>,
        cancel: &CancellationToken,
    ) -> Result<Vec<HttpResponse>, TransportError> {
        let mut responses = Vec::with_capacity(requests.len());
        for request in requests {
            responses.push(self.send(request, cancel).await?);
        }
        Ok(responses)
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        (**self).send(request, cancel).await
    }
}
