//! Transport backed by `reqwest`.

use super::Transport;
use crate::cancellation::CancellationToken;
use crate::config::TransportConfig;
use crate::errors::{ConfigurationError, QuererError, TransportError};
use crate::message::{HttpRequest, HttpResponse};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::redirect::Policy;
use tracing::debug;

/// A [`Transport`] that sends requests with a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    config: TransportConfig,
}

impl ReqwestTransport {
    /// Creates a transport from a configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid settings or default
    /// headers, and a transport error if the client cannot be built.
    pub fn new(config: TransportConfig) -> Result<Self, QuererError> {
        config.validate()?;
        let timeout = config.timeout()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ConfigurationError::Invalid(format!("header '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ConfigurationError::Invalid(format!("header '{name}': {e}")))?;
            headers.insert(name, value);
        }

        let redirect = if config.max_redirects == 0 {
            Policy::none()
        } else {
            Policy::limited(config.max_redirects)
        };

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(redirect)
            .default_headers(headers)
            .build()
            .map_err(TransportError::from)?;

        Ok(Self { client, config })
    }

    /// Creates a transport with default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn with_defaults() -> Result<Self, QuererError> {
        Self::new(TransportConfig::default())
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn prepare(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let explicit_content_type = request.header(CONTENT_TYPE.as_str()).is_some();
        let mut builder = self.client.request(request.method, request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            let (bytes, content_type) = body.into_parts();
            if let Some(content_type) = content_type.filter(|_| !explicit_content_type) {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
            builder = builder.body(bytes);
        }
        builder
    }
}

async fn exchange(builder: reqwest::RequestBuilder) -> Result<HttpResponse, TransportError> {
    let response = builder.send().await?;
    let status = response.status();
    let url = response.url().clone();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.bytes().await?;

    Ok(HttpResponse {
        status,
        headers,
        body,
        url: Some(url),
    })
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled(cancel.reason().unwrap_or_default()));
        }

        debug!(method = %request.method, url = %request.url, "Sending request");
        let builder = self.prepare(request);

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                Err(TransportError::Cancelled(cancel.reason().unwrap_or_default()))
            }
            result = exchange(builder) => {
                if let Ok(response) = &result {
                    debug!(status = response.status.as_u16(), "Response received");
                }
                result
            }
        }
    }
}
