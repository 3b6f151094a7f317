//! End-to-end tests for response pipelines.

use super::*;
use crate::decode;
use crate::errors::{ConfigurationError, QuererError};
use crate::failures::{kinds, Failure, FailureKind};
use crate::message::HttpResponse;
use crate::observers::{CollectingObserver, EventLevel, NoOpObserver};
use crate::scheme::Scheme;
use http::StatusCode;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct Item {
    id: u32,
    name: String,
}

fn json_response(status: StatusCode, body: &'static str) -> HttpResponse {
    HttpResponse::new(status)
        .with_header("Content-Type", "application/json")
        .with_body(body)
}

fn counting_items(calls: &Arc<AtomicUsize>) -> ResponsePipelineBuilder<Item> {
    let calls = Arc::clone(calls);
    ResponsePipeline::builder().use_extraction(move |stage| {
        let json = decode::json::<Item>();
        stage.extract(move |response| {
            calls.fetch_add(1, Ordering::SeqCst);
            json(response)
        });
    })
}

#[test]
fn test_extracts_typed_value() {
    let pipeline = ResponsePipeline::<Item>::builder()
        .use_extraction(|stage| {
            stage.extract(decode::json::<Item>());
        })
        .build()
        .unwrap();

    let response = json_response(StatusCode::OK, r#"{"id":1,"name":"lamp"}"#);
    let handled = pipeline.run(&response).unwrap();
    assert!(handled.admitted);
    assert_eq!(
        handled.into_value(),
        Some(Item {
            id: 1,
            name: "lamp".into()
        })
    );
}

#[test]
fn test_404_short_circuits_extraction() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = counting_items(&calls).build().unwrap();

    let handled = pipeline.run(&json_response(StatusCode::NOT_FOUND, "{}")).unwrap();
    assert_eq!(
        handled,
        Handled {
            admitted: false,
            value: None
        }
    );
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_failing_predicate_stops_later_predicates_and_extraction() {
    let calls = Arc::new(AtomicUsize::new(0));
    let evaluated = Arc::new(Mutex::new(Vec::new()));
    let pipeline = {
        let evaluated = Arc::clone(&evaluated);
        counting_items(&calls)
            .use_precondition(move |stage| {
                for (index, verdict) in [true, true, false, true].into_iter().enumerate() {
                    let evaluated = Arc::clone(&evaluated);
                    stage.add(move |_| {
                        evaluated.lock().push(index + 1);
                        verdict
                    });
                }
            })
            .build()
            .unwrap()
    };

    let err = pipeline
        .invoke(&json_response(StatusCode::OK, "{}"), &NoOpObserver)
        .unwrap_err();

    assert_eq!(err.failure().map(Failure::kind), Some(kinds::PRECONDITION));
    assert_eq!(*evaluated.lock(), vec![1, 2, 3]);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_exact_kind_preferred_over_ancestor() {
    let pipeline = ResponsePipeline::<String>::builder()
        .use_extraction(|stage| {
            stage.extract(decode::text(str::to_owned));
        })
        .use_failures(|failures| {
            failures
                .recover(kinds::HANDLING, |_, _| "handling".to_string())
                .recover(kinds::PRECONDITION, |_, _| "precondition".to_string());
        })
        .build()
        .unwrap();

    let value = pipeline
        .invoke(&HttpResponse::new(StatusCode::BAD_GATEWAY), &NoOpObserver)
        .unwrap();
    assert_eq!(value.as_deref(), Some("precondition"));
}

#[test]
fn test_ancestor_kind_catches_descendant() {
    let pipeline = ResponsePipeline::<Item>::builder()
        .use_extraction(|stage| {
            stage.extract(decode::json::<Item>());
        })
        .use_failures(|failures| {
            failures.recover(kinds::EXTRACTION, |_, failure| Item {
                id: 0,
                name: failure.kind().name().to_string(),
            });
        })
        .build()
        .unwrap();

    let value = pipeline
        .invoke(&json_response(StatusCode::OK, "not json"), &NoOpObserver)
        .unwrap();
    assert_eq!(
        value,
        Some(Item {
            id: 0,
            name: "decoding".into()
        })
    );
}

#[test]
fn test_unrecovered_failure_propagates_unchanged() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pipeline = counting_items(&calls)
        .use_failures(|failures| {
            failures.on(kinds::EXTRACTION, |_, _| {});
        })
        .build()
        .unwrap();

    let err = pipeline
        .invoke(&json_response(StatusCode::SERVICE_UNAVAILABLE, "{}"), &NoOpObserver)
        .unwrap_err();

    let QuererError::Unrecovered(failure) = err else {
        panic!("expected an unrecovered failure");
    };
    assert_eq!(failure.kind(), kinds::PRECONDITION);
    assert_eq!(failure.stage(), Some("precondition"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_effect_recovery_yields_none() {
    let hits = Arc::new(AtomicUsize::new(0));
    let pipeline = {
        let hits = Arc::clone(&hits);
        ResponsePipeline::<String>::builder()
            .use_extraction(|stage| {
                stage.extract(decode::text(str::to_owned));
            })
            .use_failures(move |failures| {
                failures.on(kinds::PRECONDITION, move |_, _| {
                    hits.fetch_add(1, Ordering::SeqCst);
                });
            })
            .build()
            .unwrap()
    };

    let value = pipeline
        .invoke(&HttpResponse::new(StatusCode::NOT_FOUND), &NoOpObserver)
        .unwrap();
    assert_eq!(value, None);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[test]
fn test_confirmation_failure_is_extraction_failure() {
    let pipeline = ResponsePipeline::<String>::builder()
        .use_extraction(|stage| {
            stage
                .extract(decode::text(str::to_owned))
                .confirm(|text| !text.is_empty());
        })
        .build()
        .unwrap();

    let err = pipeline
        .run(&HttpResponse::new(StatusCode::OK))
        .unwrap_err();
    assert_eq!(err.kind(), kinds::EXTRACTION);
    assert_eq!(err.message(), "Unsuccessful processing by the 'extraction' stage");
}

#[test]
fn test_event_order() {
    let observer = CollectingObserver::new();
    let pipeline = ResponsePipeline::<String>::builder()
        .use_extraction(|stage| {
            stage.extract(decode::text(str::to_owned));
        })
        .build()
        .unwrap();

    pipeline
        .invoke(&HttpResponse::new(StatusCode::OK).with_body("ok"), &observer)
        .unwrap();
    assert_eq!(
        observer.messages(),
        vec![
            "Stage 'precondition' started",
            "Stage 'precondition' succeeded",
            "Stage 'extraction' started",
            "Stage 'extraction' succeeded",
        ]
    );

    observer.clear();
    let _ = pipeline.invoke(&HttpResponse::new(StatusCode::NOT_FOUND), &observer);
    let levels: Vec<EventLevel> = observer.events().iter().map(|e| e.level).collect();
    assert_eq!(
        levels,
        vec![EventLevel::Inform, EventLevel::Error, EventLevel::Warn]
    );
}

#[test]
fn test_extraction_is_required() {
    let err = ResponsePipeline::<String>::builder().build().unwrap_err();
    assert_eq!(err, ConfigurationError::missing("extraction"));

    let admission_only = ResponsePipeline::<String>::builder()
        .use_scheme(Scheme::standard().without(HandlerStageKind::Extraction))
        .build()
        .unwrap();
    let handled = admission_only.run(&HttpResponse::new(StatusCode::OK)).unwrap();
    assert!(handled.admitted);
    assert!(handled.value.is_none());
}

#[test]
fn test_scheme_without_precondition_admits_errors() {
    let pipeline = ResponsePipeline::<String>::builder()
        .use_extraction(|stage| {
            stage.extract(decode::text(str::to_owned));
        })
        .use_scheme(Scheme::standard().select(&[HandlerStageKind::Extraction]))
        .build()
        .unwrap();

    let value = pipeline
        .invoke(
            &HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR).with_body("boom"),
            &NoOpObserver,
        )
        .unwrap();
    assert_eq!(value.as_deref(), Some("boom"));
}

#[test]
fn test_custom_stage_runs_after_extraction() {
    static AUDIT: FailureKind = FailureKind::child("audit", &kinds::STAGE);

    let audit = FnResponseStage::new("audit", |_: &HttpResponse, value: &mut Option<String>| {
        Ok(value.as_deref() != Some("forbidden"))
    })
    .with_failure_kind(AUDIT);

    let pipeline = ResponsePipeline::<String>::builder()
        .use_extraction(|stage| {
            stage.extract(decode::text(str::to_owned));
        })
        .use_stage(Arc::new(audit))
        .use_failures(|failures| {
            failures.recover(kinds::STAGE, |_, failure| format!("caught {}", failure.kind()));
        })
        .build()
        .unwrap();

    assert_eq!(pipeline.stages().len(), 3);
    let value = pipeline
        .invoke(&HttpResponse::new(StatusCode::OK).with_body("forbidden"), &NoOpObserver)
        .unwrap();
    assert_eq!(value.as_deref(), Some("caught audit"));
}

#[test]
fn test_precondition_kind_from_extractor_is_not_a_rejection() {
    let pipeline = ResponsePipeline::<String>::builder()
        .use_extraction(|stage| {
            stage.extract(|_| Err(Failure::new(kinds::PRECONDITION, "quota exhausted")));
        })
        .build()
        .unwrap();

    let err = pipeline.run(&HttpResponse::new(StatusCode::OK)).unwrap_err();
    assert_eq!(err.kind(), kinds::PRECONDITION);
    assert_eq!(err.stage(), Some("extraction"));
    assert_eq!(err.message(), "quota exhausted");
}

#[test]
fn test_precondition_kind_from_custom_stage_is_not_a_rejection() {
    let gate = FnResponseStage::new("gate", |_: &HttpResponse, _: &mut Option<String>| Ok(false))
        .with_failure_kind(kinds::PRECONDITION);

    let pipeline = ResponsePipeline::<String>::builder()
        .use_extraction(|stage| {
            stage.extract(decode::text(str::to_owned));
        })
        .use_stage(Arc::new(gate))
        .build()
        .unwrap();

    let err = pipeline
        .run(&HttpResponse::new(StatusCode::OK).with_body("ok"))
        .unwrap_err();
    assert_eq!(err.stage(), Some("gate"));

    let rejected = pipeline.run(&HttpResponse::new(StatusCode::NOT_FOUND)).unwrap();
    assert!(!rejected.admitted);
}
