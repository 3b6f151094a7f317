//! Benchmarks for request compilation and response invocation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use http::{Method, StatusCode};
use querer::decode;
use querer::failures::kinds;
use querer::message::HttpResponse;
use querer::observers::NoOpObserver;
use querer::request::RequestPipeline;
use querer::response::ResponsePipeline;

fn compile_benchmark(c: &mut Criterion) {
    let pipeline = RequestPipeline::builder()
        .use_method(|stage| {
            stage.set(Method::POST);
        })
        .use_url(|stage| {
            stage.parse("https://example.com/api/items?page=2");
        })
        .use_content(|stage| {
            let path = stage.preview().url().map(|url| url.path().to_string());
            stage.json(&serde_json::json!({ "path": path, "limit": 50 }));
        })
        .use_headers(|stage| {
            stage.add("Accept", "application/json").add("X-Trace", "bench");
        })
        .build()
        .unwrap();

    c.bench_function("compile_request", |b| {
        b.iter(|| black_box(pipeline.compile().unwrap()))
    });
}

fn invoke_benchmark(c: &mut Criterion) {
    let handler = ResponsePipeline::<serde_json::Value>::builder()
        .use_extraction(|stage| {
            stage.extract(decode::json::<serde_json::Value>());
        })
        .use_failures(|failures| {
            failures.recover(kinds::HANDLING, |_, _| serde_json::Value::Null);
        })
        .build()
        .unwrap();

    let ok = HttpResponse::new(StatusCode::OK).with_body(r#"{"items":[1,2,3],"next":null}"#);
    let missing = HttpResponse::new(StatusCode::NOT_FOUND);

    c.bench_function("invoke_success", |b| {
        b.iter(|| black_box(handler.invoke(&ok, &NoOpObserver).unwrap()))
    });
    c.bench_function("invoke_recovered", |b| {
        b.iter(|| black_box(handler.invoke(&missing, &NoOpObserver).unwrap()))
    });
}

criterion_group!(benches, compile_benchmark, invoke_benchmark);
criterion_main!(benches);
