//! The request-build pipeline.

use super::configure::{ContentStage, HeadersStage, MethodStage, MutationStage, UrlStage};
use super::draft::{MutationFn, RequestDraft};
use super::kind::RequestStageKind;
use super::snapshot::Snapshot;
use super::stage::RequestStage;
use crate::errors::ConfigurationError;
use crate::message::{Body, HttpRequest};
use crate::scheme::{Scheme, SchemeStage};
use http::Method;
use std::fmt;
use std::sync::Arc;
use tracing::debug;
use url::Url;

type MethodFn = Box<dyn Fn(&mut MethodStage<'_>) + Send + Sync>;
type UrlFn = Box<dyn Fn(&mut UrlStage<'_>) + Send + Sync>;
type ContentFn = Box<dyn Fn(&mut ContentStage<'_>) + Send + Sync>;
type HeadersFn = Box<dyn Fn(&mut HeadersStage<'_>) + Send + Sync>;
type MutationConfigFn = Box<dyn Fn(&mut MutationStage<'_>) + Send + Sync>;

/// A stage value produced by configuration, ready to compile.
enum Configured {
    Method(Method),
    Url(Url),
    Content(Body),
    Headers(Vec<(String, String)>),
    Mutation(MutationFn),
}

impl Configured {
    fn kind(&self) -> RequestStageKind {
        match self {
            Self::Method(_) => RequestStageKind::Method,
            Self::Url(_) => RequestStageKind::Url,
            Self::Content(_) => RequestStageKind::Content,
            Self::Headers(_) => RequestStageKind::Headers,
            Self::Mutation(_) => RequestStageKind::Mutation,
        }
    }

    fn compile(self, mut draft: RequestDraft) -> RequestDraft {
        match self {
            Self::Method(method) => draft.set_method(method),
            Self::Url(url) => draft.set_url(url),
            Self::Content(body) => draft.set_body(body),
            Self::Headers(headers) => draft.extend_headers(headers),
            Self::Mutation(mutation) => draft.set_mutation(mutation),
        };
        draft
    }
}

/// Builds a request from caller-supplied stage configuration.
///
/// Compilation runs in two passes. First every selected stage's
/// configuration callback runs in scheme order, and each configured value
/// is published to the [`Snapshot`] before the next callback runs. Then the
/// configured values compile into a [`RequestDraft`], followed by custom
/// stages, and the draft is frozen.
///
/// # Example
///
/// ```rust
/// use querer::request::RequestPipeline;
/// use http::Method;
///
/// let pipeline = RequestPipeline::builder()
///     .use_method(|stage| {
///         stage.set(Method::POST);
///     })
///     .use_url(|stage| {
///         stage.parse("https://example.com/items");
///     })
///     .use_content(|stage| {
///         let method = stage.preview().method().cloned();
///         stage.json(&serde_json::json!({ "via": method.map(|m| m.to_string()) }));
///     })
///     .build()
///     .unwrap();
///
/// let request = pipeline.compile().unwrap();
/// assert_eq!(request.method, Method::POST);
/// assert!(request.body.is_some());
/// ```
pub struct RequestPipeline {
    scheme: Scheme<RequestStageKind>,
    method: Option<MethodFn>,
    url: Option<UrlFn>,
    content: Option<ContentFn>,
    headers: Option<HeadersFn>,
    mutation: Option<MutationConfigFn>,
    extensions: Vec<Arc<dyn RequestStage>>,
}

impl RequestPipeline {
    /// Returns a new builder.
    #[must_use]
    pub fn builder() -> RequestPipelineBuilder {
        RequestPipelineBuilder::new()
    }

    /// Returns the stage order.
    #[must_use]
    pub fn scheme(&self) -> &Scheme<RequestStageKind> {
        &self.scheme
    }

    /// Returns the custom stages in execution order.
    #[must_use]
    pub fn extensions(&self) -> &[Arc<dyn RequestStage>] {
        &self.extensions
    }

    /// Runs the configuration pass and returns the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Same as [`RequestPipeline::compile`], except that a missing method or
    /// address is not reported.
    pub fn preview(&self) -> Result<Snapshot, ConfigurationError> {
        self.configure().map(|(_, snapshot)| snapshot)
    }

    /// Compiles a new request.
    ///
    /// Every call runs the configuration callbacks again, so one pipeline
    /// can produce many requests.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the method or address stage was
    /// never given a value, if the address did not parse, or if content
    /// serialization failed. No draft is built in that case.
    pub fn compile(&self) -> Result<HttpRequest, ConfigurationError> {
        let (configured, snapshot) = self.configure()?;
        if snapshot.method().is_none() {
            return Err(ConfigurationError::missing(RequestStageKind::Method.name()));
        }
        if snapshot.url().is_none() {
            return Err(ConfigurationError::missing(RequestStageKind::Url.name()));
        }

        let mut draft = RequestDraft::new();
        for value in configured {
            debug!(stage = value.kind().name(), "Compiling request stage");
            draft = value.compile(draft);
        }
        for extension in &self.extensions {
            debug!(stage = extension.name(), "Compiling custom request stage");
            draft = extension.compile(draft, &snapshot);
        }

        let request = draft.freeze()?;
        debug!(
            method = %request.method,
            url = %request.url,
            headers = request.headers.len(),
            "Request compiled"
        );
        Ok(request)
    }

    fn configure(&self) -> Result<(Vec<Configured>, Snapshot), ConfigurationError> {
        let mut snapshot = Snapshot::default();
        let mut configured = Vec::with_capacity(self.scheme.len());

        for kind in self.scheme.iter() {
            match kind {
                RequestStageKind::Method => {
                    let Some(configure) = &self.method else { continue };
                    let mut stage = MethodStage::new(&snapshot);
                    configure(&mut stage);
                    if let Some(method) = stage.into_value() {
                        snapshot.publish_method(method.clone());
                        configured.push(Configured::Method(method));
                    }
                }
                RequestStageKind::Url => {
                    let Some(configure) = &self.url else { continue };
                    let mut stage = UrlStage::new(&snapshot);
                    configure(&mut stage);
                    if let Some(url) = stage.into_value().transpose()? {
                        snapshot.publish_url(url.clone());
                        configured.push(Configured::Url(url));
                    }
                }
                RequestStageKind::Content => {
                    let Some(configure) = &self.content else { continue };
                    let mut stage = ContentStage::new(&snapshot);
                    configure(&mut stage);
                    if let Some(body) = stage.into_value().transpose()? {
                        snapshot.publish_content(body.clone());
                        configured.push(Configured::Content(body));
                    }
                }
                RequestStageKind::Headers => {
                    let Some(configure) = &self.headers else { continue };
                    let mut stage = HeadersStage::new(&snapshot);
                    configure(&mut stage);
                    let headers = stage.into_value();
                    snapshot.publish_headers(headers.clone());
                    configured.push(Configured::Headers(headers));
                }
                RequestStageKind::Mutation => {
                    let Some(configure) = &self.mutation else { continue };
                    let mut stage = MutationStage::new(&snapshot);
                    configure(&mut stage);
                    if let Some(mutation) = stage.into_value() {
                        configured.push(Configured::Mutation(mutation));
                    }
                }
            }
        }

        Ok((configured, snapshot))
    }
}

impl fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("scheme", &self.scheme.names())
            .field(
                "extensions",
                &self.extensions.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Builder for [`RequestPipeline`].
pub struct RequestPipelineBuilder {
    scheme: Scheme<RequestStageKind>,
    method: Option<MethodFn>,
    url: Option<UrlFn>,
    content: Option<ContentFn>,
    headers: Option<HeadersFn>,
    mutation: Option<MutationConfigFn>,
    extensions: Vec<Arc<dyn RequestStage>>,
}

impl RequestPipelineBuilder {
    /// Creates a builder with the standard scheme and no callbacks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scheme: Scheme::standard(),
            method: None,
            url: None,
            content: None,
            headers: None,
            mutation: None,
            extensions: Vec::new(),
        }
    }

    /// Configures the method stage.
    #[must_use]
    pub fn use_method<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut MethodStage<'_>) + Send + Sync + 'static,
    {
        self.method = Some(Box::new(configure));
        self
    }

    /// Configures the address stage.
    #[must_use]
    pub fn use_url<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut UrlStage<'_>) + Send + Sync + 'static,
    {
        self.url = Some(Box::new(configure));
        self
    }

    /// Configures the content stage.
    #[must_use]
    pub fn use_content<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut ContentStage<'_>) + Send + Sync + 'static,
    {
        self.content = Some(Box::new(configure));
        self
    }

    /// Configures the headers stage.
    #[must_use]
    pub fn use_headers<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut HeadersStage<'_>) + Send + Sync + 'static,
    {
        self.headers = Some(Box::new(configure));
        self
    }

    /// Configures the raw mutation stage.
    #[must_use]
    pub fn use_mutation<F>(mut self, configure: F) -> Self
    where
        F: Fn(&mut MutationStage<'_>) + Send + Sync + 'static,
    {
        self.mutation = Some(Box::new(configure));
        self
    }

    /// Replaces the stage order.
    #[must_use]
    pub fn use_scheme(mut self, scheme: Scheme<RequestStageKind>) -> Self {
        self.scheme = scheme;
        self
    }

    /// Appends a custom stage that compiles after the built-in stages.
    #[must_use]
    pub fn use_stage<S: RequestStage + 'static>(mut self, stage: S) -> Self {
        self.extensions.push(Arc::new(stage));
        self
    }

    /// Builds the pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingStage`] if the method or address
    /// stage has no callback, or if the scheme leaves either out.
    pub fn build(self) -> Result<RequestPipeline, ConfigurationError> {
        if self.method.is_none() || !self.scheme.contains(RequestStageKind::Method) {
            return Err(ConfigurationError::missing(RequestStageKind::Method.name()));
        }
        if self.url.is_none() || !self.scheme.contains(RequestStageKind::Url) {
            return Err(ConfigurationError::missing(RequestStageKind::Url.name()));
        }

        Ok(RequestPipeline {
            scheme: self.scheme,
            method: self.method,
            url: self.url,
            content: self.content,
            headers: self.headers,
            mutation: self.mutation,
            extensions: self.extensions,
        })
    }
}

impl Default for RequestPipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RequestPipelineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestPipelineBuilder")
            .field("scheme", &self.scheme.names())
            .field("method", &self.method.is_some())
            .field("url", &self.url.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::FnRequestStage;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn get_items() -> RequestPipelineBuilder {
        RequestPipeline::builder()
            .use_method(|stage| {
                stage.set(Method::GET);
            })
            .use_url(|stage| {
                stage.parse("https://example.com/items");
            })
    }

    #[test]
    fn test_minimal_request() {
        let request = get_items().build().unwrap().compile().unwrap();

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url.as_str(), "https://example.com/items");
        assert!(request.headers.is_empty());
        assert!(request.body.is_none());
    }

    #[test]
    fn test_headers_in_call_order() {
        let request = get_items()
            .use_headers(|stage| {
                stage.add("A", "1").add("B", "2");
            })
            .build()
            .unwrap()
            .compile()
            .unwrap();

        assert_eq!(
            request.headers,
            vec![
                ("A".to_string(), "1".to_string()),
                ("B".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn test_body_present_only_when_content_configured() {
        let with_body = get_items()
            .use_content(|stage| {
                stage.text("hello", "text/plain");
            })
            .build()
            .unwrap()
            .compile()
            .unwrap();
        let body = with_body.body.unwrap();
        assert_eq!(body.as_text(), Some("hello"));
        assert_eq!(body.content_type(), Some("text/plain; charset=utf-8"));

        let silent = get_items()
            .use_content(|_stage| {})
            .build()
            .unwrap()
            .compile()
            .unwrap();
        assert!(silent.body.is_none());
    }

    #[test]
    fn test_missing_method_fails_build() {
        let err = RequestPipeline::builder()
            .use_url(|stage| {
                stage.parse("https://example.com");
            })
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::missing("method"));
    }

    #[test]
    fn test_missing_url_fails_build() {
        let err = RequestPipeline::builder()
            .use_method(|stage| {
                stage.set(Method::GET);
            })
            .build()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::missing("url"));
    }

    #[test]
    fn test_callback_that_sets_nothing_fails_compile() {
        let pipeline = RequestPipeline::builder()
            .use_method(|_stage| {})
            .use_url(|stage| {
                stage.parse("https://example.com");
            })
            .build()
            .unwrap();
        assert_eq!(
            pipeline.compile().unwrap_err(),
            ConfigurationError::missing("method")
        );
    }

    #[test]
    fn test_invalid_url_is_configuration_error() {
        let pipeline = RequestPipeline::builder()
            .use_method(|stage| {
                stage.set(Method::GET);
            })
            .use_url(|stage| {
                stage.parse("::not-a-url");
            })
            .build()
            .unwrap();
        assert!(matches!(
            pipeline.compile(),
            Err(ConfigurationError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_content_reads_url_from_snapshot() {
        let request = get_items()
            .use_content(|stage| {
                let target = stage
                    .preview()
                    .url()
                    .map(|url| url.path().to_string())
                    .unwrap_or_default();
                stage.text(target, "text/plain");
            })
            .build()
            .unwrap()
            .compile()
            .unwrap();

        assert_eq!(request.body.unwrap().as_text(), Some("/items"));
    }

    #[test]
    fn test_snapshot_only_shows_earlier_stages() {
        let scheme = Scheme::reorder([
            RequestStageKind::Headers,
            RequestStageKind::Method,
            RequestStageKind::Url,
        ])
        .unwrap();

        let request = get_items()
            .use_headers(|stage| {
                let seen = stage.preview().method().is_some();
                stage.add("X-Saw-Method", seen.to_string());
            })
            .use_scheme(scheme)
            .build()
            .unwrap()
            .compile()
            .unwrap();

        assert_eq!(request.header("x-saw-method"), Some("false"));
    }

    #[test]
    fn test_unselected_stage_is_skipped() {
        let scheme = Scheme::standard().without(RequestStageKind::Headers);
        let request = get_items()
            .use_headers(|stage| {
                stage.add("A", "1");
            })
            .use_scheme(scheme)
            .build()
            .unwrap()
            .compile()
            .unwrap();

        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_scheme_without_url_fails_build() {
        let scheme = Scheme::standard().without(RequestStageKind::Url);
        let err = get_items().use_scheme(scheme).build().unwrap_err();
        assert_eq!(err, ConfigurationError::missing("url"));
    }

    #[test]
    fn test_mutation_runs_last() {
        let request = get_items()
            .use_mutation(|stage| {
                stage.set(|request| {
                    request.headers.retain(|(name, _)| name != "Drop-Me");
                    request.headers.push(("Added".into(), "late".into()));
                });
            })
            .use_headers(|stage| {
                stage.add("Drop-Me", "x").add("Keep", "y");
            })
            .build()
            .unwrap()
            .compile()
            .unwrap();

        assert_eq!(
            request.headers,
            vec![
                ("Keep".to_string(), "y".to_string()),
                ("Added".to_string(), "late".to_string()),
            ]
        );
    }

    #[test]
    fn test_custom_stage_sees_full_snapshot() {
        let request = get_items()
            .use_stage(FnRequestStage::new("auth", |mut draft, snapshot: &Snapshot| {
                if snapshot.method() == Some(&Method::GET) {
                    draft.add_header("Authorization", "Bearer token");
                }
                draft
            }))
            .build()
            .unwrap()
            .compile()
            .unwrap();

        assert_eq!(request.header("authorization"), Some("Bearer token"));
    }

    #[test]
    fn test_compile_reruns_callbacks() {
        let counter = Arc::new(AtomicUsize::new(0));
        let pipeline = {
            let counter = Arc::clone(&counter);
            get_items()
                .use_headers(move |stage| {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    stage.add("X-Attempt", n.to_string());
                })
                .build()
                .unwrap()
        };

        assert_eq!(pipeline.compile().unwrap().header("x-attempt"), Some("0"));
        assert_eq!(pipeline.compile().unwrap().header("x-attempt"), Some("1"));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_preview() {
        let pipeline = get_items().build().unwrap();
        let snapshot = pipeline.preview().unwrap();
        assert_eq!(snapshot.method(), Some(&Method::GET));
        assert_eq!(snapshot.url().map(Url::as_str), Some("https://example.com/items"));
    }
}
