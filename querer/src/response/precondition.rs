//! Response admission predicates.

use super::input::ResponseInput;
use super::stage::ResponseStage;
use crate::failures::{kinds, Failure, FailureKind};
use crate::message::HttpResponse;
use http::StatusCode;
use regex::Regex;
use std::fmt;
use std::ops::RangeInclusive;

type Predicate<R> = Box<dyn Fn(&R) -> bool + Send + Sync>;

/// An ordered list of predicates that must all hold for the input to be
/// admitted.
///
/// Evaluation stops at the first predicate that does not hold. The input is
/// a single [`HttpResponse`] by default; batch handling admits the whole
/// `[HttpResponse]` slice at once.
pub struct PreconditionStage<R: ?Sized = HttpResponse> {
    predicates: Vec<Predicate<R>>,
}

impl<R: ?Sized> PreconditionStage<R> {
    /// Creates a stage with no predicates; it admits every input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
        }
    }

    /// Appends a predicate.
    pub fn add<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Box::new(predicate));
        self
    }

    /// Returns the index of the first predicate that does not hold.
    ///
    /// Later predicates are not evaluated.
    #[must_use]
    pub fn first_rejection(&self, input: &R) -> Option<usize> {
        self.predicates.iter().position(|predicate| !predicate(input))
    }

    /// Returns true if every predicate holds.
    #[must_use]
    pub fn evaluate(&self, input: &R) -> bool {
        self.first_rejection(input).is_none()
    }

    /// Returns the number of predicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    /// Returns true if there are no predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl PreconditionStage {
    /// Creates the default stage, which admits 2xx responses only.
    #[must_use]
    pub fn standard() -> Self {
        let mut stage = Self::new();
        stage.status_success();
        stage
    }

    /// Requires a 2xx status.
    pub fn status_success(&mut self) -> &mut Self {
        self.add(HttpResponse::is_success)
    }

    /// Requires the status code to fall within `range`.
    pub fn status_in(&mut self, range: RangeInclusive<u16>) -> &mut Self {
        self.add(move |response| range.contains(&response.status().as_u16()))
    }

    /// Requires an exact status.
    pub fn status_is(&mut self, status: StatusCode) -> &mut Self {
        self.add(move |response| response.status() == status)
    }

    /// Requires the named header to be present.
    pub fn header_present(&mut self, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        self.add(move |response| response.header(&name).is_some())
    }

    /// Requires the named header to match `pattern`.
    pub fn header_matches(&mut self, name: impl Into<String>, pattern: Regex) -> &mut Self {
        let name = name.into();
        self.add(move |response| {
            response
                .header(&name)
                .is_some_and(|value| pattern.is_match(value))
        })
    }
}

impl PreconditionStage<[HttpResponse]> {
    /// Creates the default batch stage, which admits the batch only when
    /// every response is 2xx.
    #[must_use]
    pub fn all_successful() -> Self {
        let mut stage = Self::new();
        stage.every(HttpResponse::is_success);
        stage
    }

    /// Requires `predicate` to hold for every response of the batch.
    ///
    /// An empty batch satisfies it.
    pub fn every<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&HttpResponse) -> bool + Send + Sync + 'static,
    {
        self.add(move |responses| responses.iter().all(&predicate))
    }

    /// Requires `predicate` to hold for at least one response of the batch.
    pub fn any<F>(&mut self, predicate: F) -> &mut Self
    where
        F: Fn(&HttpResponse) -> bool + Send + Sync + 'static,
    {
        self.add(move |responses| responses.iter().any(&predicate))
    }

    /// Requires the batch to hold exactly `count` responses.
    pub fn count_is(&mut self, count: usize) -> &mut Self {
        self.add(move |responses| responses.len() == count)
    }
}

impl<R: ?Sized> Default for PreconditionStage<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, R: ResponseInput + ?Sized> ResponseStage<T, R> for PreconditionStage<R> {
    fn name(&self) -> &str {
        "precondition"
    }

    fn failure_kind(&self) -> FailureKind {
        kinds::PRECONDITION
    }

    fn handle(&self, input: &R, _value: &mut Option<T>) -> Result<bool, Failure> {
        match self.first_rejection(input) {
            None => Ok(true),
            Some(index) => Err(Failure::new(
                kinds::PRECONDITION,
                format!(
                    "Precondition {} of {} rejected {}",
                    index + 1,
                    self.predicates.len(),
                    input.describe()
                ),
            )),
        }
    }
}

impl<R: ?Sized> fmt::Debug for PreconditionStage<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreconditionStage")
            .field("predicates", &self.predicates.len())
            .finish()
    }
}
