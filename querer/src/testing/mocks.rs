//! In-memory transports.

use crate::cancellation::CancellationToken;
use crate::errors::TransportError;
use crate::message::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A transport that records every request and replays queued outcomes.
///
/// When the queue is empty the transport answers `200 OK` with an empty
/// body. A cancelled token is reported before anything is recorded.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    queue: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    /// Creates an empty transport.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transport that replays `responses` in order.
    #[must_use]
    pub fn with_responses(responses: impl IntoIterator<Item = HttpResponse>) -> Self {
        let transport = Self::new();
        for response in responses {
            transport.push_response(response);
        }
        transport
    }

    /// Queues a response.
    pub fn push_response(&self, response: HttpResponse) {
        self.queue.lock().push_back(Ok(response));
    }

    /// Queues a transport error.
    pub fn push_error(&self, error: TransportError) {
        self.queue.lock().push_back(Err(error));
    }

    /// Returns the requests sent so far.
    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests sent.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Clears recorded requests and queued outcomes.
    pub fn reset(&self) {
        self.queue.lock().clear();
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled(cancel.reason().unwrap_or_default()));
        }

        let url = request.url.clone();
        self.requests.lock().push(request);
        let outcome = self.queue.lock().pop_front();
        match outcome {
            Some(Ok(response)) => Ok(response),
            Some(Err(err)) => Err(err),
            None => Ok(HttpResponse::new(http::StatusCode::OK).with_url(url)),
        }
    }
}
