//! What a response pipeline runs against.

use crate::message::HttpResponse;
use http::StatusCode;

/// Input handled by response stages: one [`HttpResponse`], or the
/// `[HttpResponse]` slice of a batch.
pub trait ResponseInput {
    /// Returns the status of every response, in order.
    fn statuses(&self) -> Vec<StatusCode>;

    /// Describes the input for failure messages.
    fn describe(&self) -> String;
}

impl ResponseInput for HttpResponse {
    fn statuses(&self) -> Vec<StatusCode> {
        vec![self.status()]
    }

    fn describe(&self) -> String {
        format!("the response (status {})", self.status())
    }
}

impl ResponseInput for [HttpResponse] {
    fn statuses(&self) -> Vec<StatusCode> {
        self.iter().map(HttpResponse::status).collect()
    }

    fn describe(&self) -> String {
        let statuses: Vec<String> = self.iter().map(|r| r.status().as_u16().to_string()).collect();
        format!("the responses (statuses {})", statuses.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_response() {
        let response = HttpResponse::new(StatusCode::NOT_FOUND);
        assert_eq!(response.statuses(), vec![StatusCode::NOT_FOUND]);
        assert_eq!(response.describe(), "the response (status 404 Not Found)");
    }

    #[test]
    fn test_batch_of_responses() {
        let responses = vec![
            HttpResponse::new(StatusCode::OK),
            HttpResponse::new(StatusCode::BAD_GATEWAY),
        ];
        let batch: &[HttpResponse] = &responses;
        assert_eq!(batch.statuses(), vec![StatusCode::OK, StatusCode::BAD_GATEWAY]);
        assert_eq!(batch.describe(), "the responses (statuses 200, 502)");
    }
}
