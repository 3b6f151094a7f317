//! Ordered collections of request pipelines.

use super::pipeline::{RequestPipeline, RequestPipelineBuilder};
use crate::errors::ConfigurationError;
use crate::message::HttpRequest;

/// An ordered list of request pipelines compiled together.
#[derive(Debug, Default)]
pub struct RequestBatch {
    pipelines: Vec<RequestPipeline>,
}

impl RequestBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a built pipeline.
    pub fn push(&mut self, pipeline: RequestPipeline) -> &mut Self {
        self.pipelines.push(pipeline);
        self
    }

    /// Builds a pipeline with `configure` and appends it.
    ///
    /// # Errors
    ///
    /// Returns the error raised while building the pipeline.
    pub fn add<F>(mut self, configure: F) -> Result<Self, ConfigurationError>
    where
        F: FnOnce(RequestPipelineBuilder) -> RequestPipelineBuilder,
    {
        let pipeline = configure(RequestPipeline::builder()).build()?;
        self.pipelines.push(pipeline);
        Ok(self)
    }

    /// Compiles every pipeline in order.
    ///
    /// # Errors
    ///
    /// Returns the first configuration error; nothing is returned for the
    /// pipelines that compiled before it.
    pub fn compile(&self) -> Result<Vec<HttpRequest>, ConfigurationError> {
        self.pipelines.iter().map(RequestPipeline::compile).collect()
    }

    /// Returns the pipelines in order.
    #[must_use]
    pub fn pipelines(&self) -> &[RequestPipeline] {
        &self.pipelines
    }

    /// Returns the number of pipelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pipelines.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

impl FromIterator<RequestPipeline> for RequestBatch {
    fn from_iter<I: IntoIterator<Item = RequestPipeline>>(iter: I) -> Self {
        Self {
            pipelines: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;
    use pretty_assertions::assert_eq;

    fn page(n: u32) -> impl FnOnce(RequestPipelineBuilder) -> RequestPipelineBuilder {
        move |builder| {
            builder
                .use_method(|stage| {
                    stage.set(Method::GET);
                })
                .use_url(move |stage| {
                    stage.parse(&format!("https://example.com/page/{n}"));
                })
        }
    }

    #[test]
    fn test_compiles_in_order() {
        let batch = RequestBatch::new()
            .add(page(1))
            .unwrap()
            .add(page(2))
            .unwrap()
            .add(page(3))
            .unwrap();

        let paths: Vec<String> = batch
            .compile()
            .unwrap()
            .into_iter()
            .map(|request| request.url.path().to_string())
            .collect();
        assert_eq!(paths, vec!["/page/1", "/page/2", "/page/3"]);
    }

    #[test]
    fn test_build_error_is_reported() {
        let result = RequestBatch::new().add(|builder| builder);
        assert_eq!(result.unwrap_err(), ConfigurationError::missing("method"));
    }

    #[test]
    fn test_first_compile_error_wins() {
        let broken = RequestPipeline::builder()
            .use_method(|stage| {
                stage.set(Method::GET);
            })
            .use_url(|stage| {
                stage.parse("nope");
            })
            .build()
            .unwrap();

        let mut batch = RequestBatch::new().add(page(1)).unwrap();
        batch.push(broken);
        assert_eq!(batch.len(), 2);
        assert!(matches!(
            batch.compile(),
            Err(ConfigurationError::InvalidUrl { .. })
        ));
    }
}
