//! Typed value extraction.

use super::stage::ResponseStage;
use crate::failures::{kinds, Failure, FailureKind};
use crate::message::HttpResponse;
use std::fmt;

type ExtractFn<T, R> = Box<dyn Fn(&R) -> Result<T, Failure> + Send + Sync>;
type CaptureFn<T> = Box<dyn Fn(&T) + Send + Sync>;
type ConfirmFn<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Computes a typed value from an admitted response.
///
/// The extractor runs first, then every capture callback sees the value,
/// then the confirmation predicate decides whether the stage succeeded.
/// Without a confirmation predicate every extracted value is accepted.
///
/// With `R = [HttpResponse]` one extractor produces a single value from a
/// whole batch.
pub struct ExtractionStage<T, R: ?Sized = HttpResponse> {
    extractor: Option<ExtractFn<T, R>>,
    captures: Vec<CaptureFn<T>>,
    confirmation: Option<ConfirmFn<T>>,
}

impl<T, R: ?Sized> ExtractionStage<T, R> {
    /// Creates a stage with no extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            extractor: None,
            captures: Vec::new(),
            confirmation: None,
        }
    }

    /// Sets a fallible extractor, such as one from [`crate::decode`].
    pub fn extract<F>(&mut self, extractor: F) -> &mut Self
    where
        F: Fn(&R) -> Result<T, Failure> + Send + Sync + 'static,
    {
        self.extractor = Some(Box::new(extractor));
        self
    }

    /// Sets an extractor that cannot fail.
    pub fn map<F>(&mut self, extractor: F) -> &mut Self
    where
        F: Fn(&R) -> T + Send + Sync + 'static,
    {
        self.extract(move |response| Ok(extractor(response)))
    }

    /// Registers a side-effect callback that sees the extracted value.
    pub fn capture<F>(&mut self, capture: F) -> &mut Self
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        self.captures.push(Box::new(capture));
        self
    }

    /// Sets the predicate the extracted value must satisfy.
    pub fn confirm<F>(&mut self, confirmation: F) -> &mut Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.confirmation = Some(Box::new(confirmation));
        self
    }

    /// Returns true once an extractor is set.
    #[must_use]
    pub fn has_extractor(&self) -> bool {
        self.extractor.is_some()
    }

    /// Extracts and confirms the value.
    ///
    /// Returns `Ok(None)` when confirmation rejected the value.
    ///
    /// # Errors
    ///
    /// Returns the extractor's failure, or an extraction failure when no
    /// extractor was set.
    pub fn apply(&self, response: &R) -> Result<Option<T>, Failure> {
        let extractor = self
            .extractor
            .as_ref()
            .ok_or_else(|| Failure::new(kinds::EXTRACTION, "No extractor was configured"))?;

        let value = extractor(response)?;
        for capture in &self.captures {
            capture(&value);
        }

        let confirmed = self
            .confirmation
            .as_ref()
            .map_or(true, |confirm| confirm(&value));
        Ok(confirmed.then_some(value))
    }
}

impl<T, R: ?Sized> Default for ExtractionStage<T, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: ?Sized> ResponseStage<T, R> for ExtractionStage<T, R> {
    fn name(&self) -> &str {
        "extraction"
    }

    fn failure_kind(&self) -> FailureKind {
        kinds::EXTRACTION
    }

    fn handle(&self, response: &R, value: &mut Option<T>) -> Result<bool, Failure> {
        match self.apply(response)? {
            Some(extracted) => {
                *value = Some(extracted);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<T, R: ?Sized> fmt::Debug for ExtractionStage<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionStage")
            .field("extractor", &self.extractor.is_some())
            .field("captures", &self.captures.len())
            .field("confirmation", &self.confirmation.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode;
    use http::StatusCode;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn ok(body: &'static str) -> HttpResponse {
        HttpResponse::new(StatusCode::OK).with_body(body)
    }

    #[test]
    fn test_extract_and_capture() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut stage: ExtractionStage<usize> = ExtractionStage::new();
        {
            let seen = Arc::clone(&seen);
            stage
                .extract(decode::text(|text| text.len()))
                .capture(move |len| seen.lock().push(*len));
        }

        assert_eq!(stage.apply(&ok("hello")).unwrap(), Some(5));
        assert_eq!(*seen.lock(), vec![5]);
    }

    #[test]
    fn test_confirmation_rejects() {
        let mut stage: ExtractionStage<usize> = ExtractionStage::new();
        stage.map(|r: &HttpResponse| r.bytes().len()).confirm(|len| *len > 0);

        assert_eq!(stage.apply(&ok("")).unwrap(), None);

        let mut value = None;
        assert!(!stage.handle(&ok(""), &mut value).unwrap());
        assert!(value.is_none());
    }

    #[test]
    fn test_missing_extractor_fails() {
        let stage: ExtractionStage<String> = ExtractionStage::new();
        let err = stage.apply(&ok("x")).unwrap_err();
        assert_eq!(err.kind(), kinds::EXTRACTION);
    }

    #[test]
    fn test_decoder_failure_passes_through() {
        let mut stage: ExtractionStage<serde_json::Value> = ExtractionStage::new();
        stage.extract(decode::json::<serde_json::Value>());

        let err = stage.apply(&ok("{ not json")).unwrap_err();
        assert_eq!(err.kind(), kinds::DECODING);
        assert!(err.is_a(&kinds::EXTRACTION));
    }

    #[test]
    fn test_batch_extractor_sees_every_response() {
        let mut stage = ExtractionStage::<usize, [HttpResponse]>::new();
        stage
            .map(|responses| responses.iter().map(|r| r.bytes().len()).sum())
            .confirm(|total| *total > 0);

        let responses = [ok("ab"), ok("cde")];
        assert_eq!(stage.apply(&responses).unwrap(), Some(5));
        assert_eq!(stage.apply(&[ok(""), ok("")]).unwrap(), None);
    }
}
