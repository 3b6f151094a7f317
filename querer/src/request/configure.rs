//! Handles passed to configuration callbacks.
//!
//! Each handle exposes a setter for its own stage and a read-only
//! [`Snapshot`] of stages configured before it. Setters that can fail keep
//! the error; it surfaces from [`super::RequestPipeline::compile`].

use super::draft::MutationFn;
use super::snapshot::Snapshot;
use crate::errors::ConfigurationError;
use crate::message::{Body, HttpRequest};
use http::Method;
use serde::Serialize;
use url::Url;

/// Configures the method stage.
#[derive(Debug)]
pub struct MethodStage<'a> {
    preview: &'a Snapshot,
    method: Option<Method>,
}

impl<'a> MethodStage<'a> {
    pub(crate) fn new(preview: &'a Snapshot) -> Self {
        Self {
            preview,
            method: None,
        }
    }

    /// Sets the method.
    pub fn set(&mut self, method: Method) -> &mut Self {
        self.method = Some(method);
        self
    }

    /// Returns the values configured so far.
    #[must_use]
    pub fn preview(&self) -> &Snapshot {
        self.preview
    }

    pub(crate) fn into_value(self) -> Option<Method> {
        self.method
    }
}

/// Configures the address stage.
#[derive(Debug)]
pub struct UrlStage<'a> {
    preview: &'a Snapshot,
    url: Option<Result<Url, ConfigurationError>>,
}

impl<'a> UrlStage<'a> {
    pub(crate) fn new(preview: &'a Snapshot) -> Self {
        Self { preview, url: None }
    }

    /// Sets the address.
    pub fn set(&mut self, url: Url) -> &mut Self {
        self.url = Some(Ok(url));
        self
    }

    /// Parses and sets the address.
    pub fn parse(&mut self, input: &str) -> &mut Self {
        self.url = Some(Url::parse(input).map_err(|e| ConfigurationError::invalid_url(input, e)));
        self
    }

    /// Returns the values configured so far.
    #[must_use]
    pub fn preview(&self) -> &Snapshot {
        self.preview
    }

    pub(crate) fn into_value(self) -> Option<Result<Url, ConfigurationError>> {
        self.url
    }
}

/// Configures the content stage.
#[derive(Debug)]
pub struct ContentStage<'a> {
    preview: &'a Snapshot,
    body: Option<Result<Body, ConfigurationError>>,
}

impl<'a> ContentStage<'a> {
    pub(crate) fn new(preview: &'a Snapshot) -> Self {
        Self {
            preview,
            body: None,
        }
    }

    /// Sets the body.
    pub fn set(&mut self, body: Body) -> &mut Self {
        self.body = Some(Ok(body));
        self
    }

    /// Sets a UTF-8 text body of the given media type.
    pub fn text(&mut self, text: impl Into<String>, media: &str) -> &mut Self {
        self.set(Body::text(text, media))
    }

    /// Serializes `value` as a JSON body.
    pub fn json<S: Serialize + ?Sized>(&mut self, value: &S) -> &mut Self {
        self.body = Some(Body::json(value).map_err(|e| ConfigurationError::Content(e.to_string())));
        self
    }

    /// Sets a form-encoded body.
    pub fn form<I, K, V>(&mut self, pairs: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        self.set(Body::form(pairs))
    }

    /// Sets a raw byte body.
    pub fn bytes(&mut self, bytes: impl Into<bytes::Bytes>, content_type: Option<String>) -> &mut Self {
        self.set(Body::new(bytes, content_type))
    }

    /// Returns the values configured so far.
    #[must_use]
    pub fn preview(&self) -> &Snapshot {
        self.preview
    }

    pub(crate) fn into_value(self) -> Option<Result<Body, ConfigurationError>> {
        self.body
    }
}

/// Configures the headers stage.
#[derive(Debug)]
pub struct HeadersStage<'a> {
    preview: &'a Snapshot,
    headers: Vec<(String, String)>,
}

impl<'a> HeadersStage<'a> {
    pub(crate) fn new(preview: &'a Snapshot) -> Self {
        Self {
            preview,
            headers: Vec::new(),
        }
    }

    /// Appends a header. Duplicates are kept.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Appends several headers in order.
    pub fn extend<I, K, V>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Returns the values configured so far.
    #[must_use]
    pub fn preview(&self) -> &Snapshot {
        self.preview
    }

    pub(crate) fn into_value(self) -> Vec<(String, String)> {
        self.headers
    }
}

/// Configures the raw mutation stage.
pub struct MutationStage<'a> {
    preview: &'a Snapshot,
    mutation: Option<MutationFn>,
}

impl<'a> MutationStage<'a> {
    pub(crate) fn new(preview: &'a Snapshot) -> Self {
        Self {
            preview,
            mutation: None,
        }
    }

    /// Registers a mutation applied to the finished request.
    pub fn set<F>(&mut self, mutation: F) -> &mut Self
    where
        F: FnOnce(&mut HttpRequest) + Send + 'static,
    {
        self.mutation = Some(Box::new(mutation));
        self
    }

    /// Returns the values configured so far.
    #[must_use]
    pub fn preview(&self) -> &Snapshot {
        self.preview
    }

    pub(crate) fn into_value(self) -> Option<MutationFn> {
        self.mutation
    }
}

impl std::fmt::Debug for MutationStage<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MutationStage")
            .field("preview", &self.preview)
            .field("mutation", &self.mutation.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_parse_keeps_error() {
        let snapshot = Snapshot::default();
        let mut stage = UrlStage::new(&snapshot);
        stage.parse("not a url");
        assert!(matches!(
            stage.into_value(),
            Some(Err(ConfigurationError::InvalidUrl { .. }))
        ));
    }

    #[test]
    fn test_last_setter_wins() {
        let snapshot = Snapshot::default();
        let mut stage = MethodStage::new(&snapshot);
        stage.set(Method::GET).set(Method::DELETE);
        assert_eq!(stage.into_value(), Some(Method::DELETE));
    }

    #[test]
    fn test_content_json_sets_media_type() {
        let snapshot = Snapshot::default();
        let mut stage = ContentStage::new(&snapshot);
        stage.json(&serde_json::json!({ "id": 7 }));

        let body = stage.into_value().unwrap().unwrap();
        assert_eq!(body.content_type(), Some("application/json"));
        assert_eq!(body.as_text(), Some(r#"{"id":7}"#));
    }

    #[test]
    fn test_headers_extend() {
        let snapshot = Snapshot::default();
        let mut stage = HeadersStage::new(&snapshot);
        stage.add("A", "1").extend([("B", "2"), ("A", "3")]);
        assert_eq!(stage.into_value().len(), 3);
    }
}
