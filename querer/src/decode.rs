//! Content decoders for extraction stages.
//!
//! Each function adapts a caller-supplied reader into an extraction function
//! suitable for [`crate::response::ExtractionStage::extract`]. Decoding errors
//! are reported as failures of kind [`kinds::DECODING`].

use crate::failures::{kinds, Failure};
use crate::message::HttpResponse;
use serde::de::DeserializeOwned;

/// Reads the body as UTF-8 text and passes it to `read`.
pub fn text<T, F>(read: F) -> impl Fn(&HttpResponse) -> Result<T, Failure> + Send + Sync + 'static
where
    T: 'static,
    F: Fn(&str) -> T + Send + Sync + 'static,
{
    move |response: &HttpResponse| {
        response
            .text()
            .map(&read)
            .map_err(|err| Failure::from_error(kinds::DECODING, err))
    }
}

/// Passes the raw body bytes to `read`.
pub fn bytes<T, F>(read: F) -> impl Fn(&HttpResponse) -> Result<T, Failure> + Send + Sync + 'static
where
    T: 'static,
    F: Fn(&[u8]) -> T + Send + Sync + 'static,
{
    move |response: &HttpResponse| Ok(read(response.bytes()))
}

/// Deserializes the body as JSON into `D`.
pub fn json<D>() -> impl Fn(&HttpResponse) -> Result<D, Failure> + Send + Sync + 'static
where
    D: DeserializeOwned + 'static,
{
    |response: &HttpResponse| {
        response
            .json::<D>()
            .map_err(|err| Failure::from_error(kinds::DECODING, err))
    }
}

/// Parses the body as a JSON document and passes it to `read`.
pub fn json_value<T, F>(read: F) -> impl Fn(&HttpResponse) -> Result<T, Failure> + Send + Sync + 'static
where
    T: 'static,
    F: Fn(serde_json::Value) -> T + Send + Sync + 'static,
{
    move |response: &HttpResponse| {
        response
            .json::<serde_json::Value>()
            .map(&read)
            .map_err(|err| Failure::from_error(kinds::DECODING, err))
    }
}

/// Parses the body as an HTML document and passes it to `read`.
#[cfg(feature = "html")]
pub fn html<T, F>(read: F) -> impl Fn(&HttpResponse) -> Result<T, Failure> + Send + Sync + 'static
where
    T: 'static,
    F: Fn(&scraper::Html) -> T + Send + Sync + 'static,
{
    move |response: &HttpResponse| {
        let text = response
            .text()
            .map_err(|err| Failure::from_error(kinds::DECODING, err))?;
        let document = scraper::Html::parse_document(text);
        Ok(read(&document))
    }
}
