//! The mutable request under construction.

use crate::errors::ConfigurationError;
use crate::message::{Body, HttpRequest};
use http::Method;
use std::fmt;
use url::Url;

/// A raw mutation applied to the finished request.
pub type MutationFn = Box<dyn FnOnce(&mut HttpRequest) + Send>;

/// Accumulates the parts of a request while stages compile into it.
///
/// Headers keep insertion order and duplicates. A draft becomes an
/// [`HttpRequest`] only through [`RequestDraft::freeze`].
#[derive(Default)]
pub struct RequestDraft {
    method: Option<Method>,
    url: Option<Url>,
    body: Option<Body>,
    headers: Vec<(String, String)>,
    mutation: Option<MutationFn>,
}

impl RequestDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the method, if set.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Returns the address, if set.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Returns the body, if set.
    #[must_use]
    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    /// Returns the headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns true once both method and address are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.method.is_some() && self.url.is_some()
    }

    /// Sets the method.
    pub fn set_method(&mut self, method: Method) -> &mut Self {
        self.method = Some(method);
        self
    }

    /// Sets the address.
    pub fn set_url(&mut self, url: Url) -> &mut Self {
        self.url = Some(url);
        self
    }

    /// Sets the body.
    pub fn set_body(&mut self, body: Body) -> &mut Self {
        self.body = Some(body);
        self
    }

    /// Appends a header.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Appends several headers in order.
    pub fn extend_headers<I>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.headers.extend(headers);
        self
    }

    /// Registers the raw mutation, replacing any earlier one.
    pub fn set_mutation(&mut self, mutation: MutationFn) -> &mut Self {
        self.mutation = Some(mutation);
        self
    }

    /// Finishes the draft.
    ///
    /// The raw mutation, if any, runs last against the finished request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingStage`] if the method or the
    /// address was never set.
    pub fn freeze(self) -> Result<HttpRequest, ConfigurationError> {
        let method = self.method.ok_or(ConfigurationError::missing("method"))?;
        let url = self.url.ok_or(ConfigurationError::missing("url"))?;

        let mut request = HttpRequest {
            method,
            url,
            headers: self.headers,
            body: self.body,
        };
        if let Some(mutation) = self.mutation {
            mutation(&mut request);
        }
        Ok(request)
    }
}

impl fmt::Debug for RequestDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDraft")
            .field("method", &self.method)
            .field("url", &self.url.as_ref().map(Url::as_str))
            .field("body", &self.body)
            .field("headers", &self.headers)
            .field("mutation", &self.mutation.is_some())
            .finish()
    }
}
