//! Request/response orchestration over a transport.

use super::Transport;
use crate::cancellation::CancellationToken;
use crate::errors::QuererError;
use crate::message::{HttpRequest, HttpResponse};
use crate::observers::Observer;
use crate::request::{RequestBatch, RequestPipeline};
use crate::response::{ResponsePipeline, ResponsesPipeline};
use tracing::debug;

/// Drives request pipelines through a [`Transport`] and hands the
/// responses to response pipelines.
///
/// Batches are compiled completely before any request is sent, then sent
/// one at a time in order. The first transport error or unrecovered
/// failure aborts the batch. A batch's responses can be handled one by one
/// ([`Client::execute_batch`]) or together ([`Client::execute_all`]).
#[derive(Debug, Clone)]
pub struct Client<Tr> {
    transport: Tr,
}

impl<Tr: Transport> Client<Tr> {
    /// Creates a client over `transport`.
    pub fn new(transport: Tr) -> Self {
        Self { transport }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &Tr {
        &self.transport
    }

    /// Compiles and sends one request.
    ///
    /// # Errors
    ///
    /// Returns a configuration error from compilation or the transport's
    /// error.
    pub async fn send(
        &self,
        pipeline: &RequestPipeline,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, QuererError> {
        let request = pipeline.compile()?;
        Ok(self.transport.send(request, cancel).await?)
    }

    /// Compiles every pipeline, then sends the requests in order.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error before anything is sent, or
    /// the first transport error.
    pub async fn send_batch(
        &self,
        batch: &RequestBatch,
        cancel: &CancellationToken,
    ) -> Result<Vec<HttpResponse>, QuererError> {
        let requests = batch.compile()?;
        debug!(count = requests.len(), "Sending batch");
        Ok(self.transport.send_batch(requests, cancel).await?)
    }

    /// Sends one request and handles its response.
    ///
    /// # Errors
    ///
    /// Returns configuration and transport errors, and unrecovered stage
    /// failures from `handler`.
    pub async fn execute<T: 'static>(
        &self,
        pipeline: &RequestPipeline,
        handler: &ResponsePipeline<T>,
        observer: &dyn Observer,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, QuererError> {
        let request = pipeline.compile()?;
        let response = self.exchange(request, observer, cancel).await?;
        handler.invoke(&response, observer)
    }

    /// Sends every request of the batch and handles each response in turn.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error before anything is sent;
    /// otherwise the first transport error or unrecovered failure, after
    /// which no further request is sent.
    pub async fn execute_batch<T: 'static>(
        &self,
        batch: &RequestBatch,
        handler: &ResponsePipeline<T>,
        observer: &dyn Observer,
        cancel: &CancellationToken,
    ) -> Result<Vec<Option<T>>, QuererError> {
        let requests = batch.compile()?;
        let total = requests.len();
        let mut results = Vec::with_capacity(total);

        for (index, request) in requests.into_iter().enumerate() {
            debug!(index, total, "Executing batch item");
            let response = self.exchange(request, observer, cancel).await?;
            results.push(handler.invoke(&response, observer)?);
        }
        Ok(results)
    }

    /// Sends every request of the batch, then handles all responses
    /// together, producing one value.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error before anything is sent, the
    /// first transport error (after which no further request is sent), or
    /// an unrecovered failure from `handler`.
    pub async fn execute_all<T: 'static>(
        &self,
        batch: &RequestBatch,
        handler: &ResponsesPipeline<T>,
        observer: &dyn Observer,
        cancel: &CancellationToken,
    ) -> Result<Option<T>, QuererError> {
        let requests = batch.compile()?;
        let total = requests.len();
        let mut responses = Vec::with_capacity(total);

        for (index, request) in requests.into_iter().enumerate() {
            debug!(index, total, "Sending batch item");
            responses.push(self.exchange(request, observer, cancel).await?);
        }
        handler.invoke(&responses, observer)
    }

    async fn exchange(
        &self,
        request: HttpRequest,
        observer: &dyn Observer,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, QuererError> {
        let target = format!("{} {}", request.method, request.url);
        observer.inform(&format!("Sending {target}"));

        match self.transport.send(request, cancel).await {
            Ok(response) => {
                observer.inform(&format!("Received {} from {target}", response.status));
                Ok(response)
            }
            Err(err) => {
                observer.warn(&format!("Transport failed for {target}: {err}"));
                Err(err.into())
            }
        }
    }
}
