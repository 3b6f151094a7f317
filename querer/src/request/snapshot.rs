//! Read-only view of configured stage values.

use crate::message::Body;
use http::Method;
use url::Url;

/// Values published by request stages whose configuration has already run.
///
/// A configuration callback sees only what earlier stages in the scheme
/// published. The snapshot is never written by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    method: Option<Method>,
    url: Option<Url>,
    content: Option<Body>,
    headers: Vec<(String, String)>,
}

impl Snapshot {
    /// Returns the configured method.
    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }

    /// Returns the configured address.
    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// Returns the configured body.
    #[must_use]
    pub fn content(&self) -> Option<&Body> {
        self.content.as_ref()
    }

    /// Returns the configured headers in insertion order.
    #[must_use]
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Returns the first configured value of the named header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub(crate) fn publish_method(&mut self, method: Method) {
        self.method = Some(method);
    }

    pub(crate) fn publish_url(&mut self, url: Url) {
        self.url = Some(url);
    }

    pub(crate) fn publish_content(&mut self, body: Body) {
        self.content = Some(body);
    }

    pub(crate) fn publish_headers(&mut self, headers: Vec<(String, String)>) {
        self.headers = headers;
    }
}
