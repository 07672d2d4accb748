#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end checks of the assembled middleware stack against a mock server.

use ddb_http::{
    ExponentialBackoff, HttpClient, HttpClientBuilder, HttpClientConfig, HttpError,
    RETRY_ATTEMPT_HEADER, RedirectConfig, RetryConfig,
};
use flate2::Compression;
use flate2::write::GzEncoder;
use httpmock::prelude::*;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;

fn client_with_attempts(attempts: usize) -> HttpClient {
    HttpClientBuilder::with_config(HttpClientConfig::for_testing())
        .retry(RetryConfig::with_attempts(attempts).backoff(ExponentialBackoff::fast()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn retried_attempts_carry_attempt_header() {
    let server = MockServer::start();
    let first = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/meal_plans")
            .header_missing(RETRY_ATTEMPT_HEADER);
        then.status(502);
    });
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/meal_plans")
            .header(RETRY_ATTEMPT_HEADER, "1");
        then.status(200).body(r#"{"data":[]}"#);
    });

    let resp = client_with_attempts(3)
        .get(&server.url("/api/v1/meal_plans"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), http::StatusCode::OK);
    first.assert_calls(1);
    second.assert_calls(1);
}

#[tokio::test]
async fn not_implemented_is_not_retried() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/v1/meal_plans/m1/finalize");
        then.status(501);
    });

    let resp = client_with_attempts(5)
        .post(&server.url("/api/v1/meal_plans/m1/finalize"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), http::StatusCode::NOT_IMPLEMENTED);
    mock.assert_calls(1);
}

#[tokio::test]
async fn retry_after_is_capped_by_max_wait() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/busy");
        then.status(503).header("retry-after", "3600");
    });

    let started = std::time::Instant::now();
    let resp = client_with_attempts(2)
        .get(&server.url("/busy"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), http::StatusCode::SERVICE_UNAVAILABLE);
    mock.assert_calls(2);
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn total_timeout_bounds_the_call() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/down");
        then.status(503);
    });

    let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
        .retry(RetryConfig::with_attempts(50).backoff(ExponentialBackoff::new(
            Duration::from_millis(40),
            Duration::from_millis(40),
        )))
        .total_timeout(Duration::from_millis(150))
        .build()
        .unwrap();

    let err = client.get(&server.url("/down")).send().await.unwrap_err();
    assert!(matches!(err, HttpError::DeadlineExceeded(_)));
}

#[tokio::test]
async fn gzip_responses_are_decompressed() {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(br#"{"data":{"id":"r1","name":"ratatouille"}}"#)
        .unwrap();
    let compressed = encoder.finish().unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/v1/recipes/r1");
        then.status(200)
            .header("content-encoding", "gzip")
            .header("content-type", "application/json")
            .body(compressed.clone());
    });

    let value: serde_json::Value = client_with_attempts(1)
        .get(&server.url("/api/v1/recipes/r1"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(value["data"]["name"], "ratatouille");
}

#[tokio::test]
async fn cross_origin_redirect_drops_credentials() {
    let target = MockServer::start();
    let landed = target.mock(|when, then| {
        when.method(GET)
            .path("/landing")
            .header_missing("authorization")
            .header_missing("cookie")
            .header_missing("x-impersonate-user")
            .header_missing("x-impersonate-household");
        then.status(200);
    });

    let origin = MockServer::start();
    origin.mock(|when, then| {
        when.method(GET).path("/start");
        then.status(302).header("location", target.url("/landing"));
    });

    let client = HttpClientBuilder::with_config(HttpClientConfig::for_testing())
        .redirect(RedirectConfig::for_testing())
        .build()
        .unwrap();
    let resp = client
        .get(&origin.url("/start"))
        .header("authorization", "Bearer secret")
        .header("cookie", "ddb_api_cookie=abc")
        .header("x-impersonate-user", "u1")
        .header("x-impersonate-household", "h1")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), http::StatusCode::OK);
    landed.assert_calls(1);
}

#[tokio::test]
async fn cross_origin_redirect_refused_by_default() {
    let target = MockServer::start();
    let never = target.mock(|when, then| {
        when.method(GET).path("/landing");
        then.status(200);
    });

    let origin = MockServer::start();
    origin.mock(|when, then| {
        when.method(GET).path("/start");
        then.status(302).header("location", target.url("/landing"));
    });

    let client = HttpClientBuilder::with_config(HttpClientConfig {
        redirect: RedirectConfig::default(),
        ..HttpClientConfig::for_testing()
    })
    .build()
    .unwrap();
    let resp = client.get(&origin.url("/start")).send().await.unwrap();

    assert_eq!(resp.status(), http::StatusCode::FOUND);
    never.assert_calls(0);
}

/// Collects `(attempt, outcome)` from every closed `http_attempt` span.
#[derive(Clone, Default)]
struct AttemptSpans {
    seen: Arc<Mutex<Vec<(u64, String)>>>,
}

#[derive(Default)]
struct AttemptFields {
    attempt: u64,
    outcome: String,
}

impl tracing::field::Visit for AttemptFields {
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        if field.name() == "attempt" {
            self.attempt = value;
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "outcome" {
            self.outcome = value.to_owned();
        }
    }

    fn record_debug(&mut self, _field: &tracing::field::Field, _value: &dyn std::fmt::Debug) {}
}

impl<S> tracing_subscriber::Layer<S> for AttemptSpans
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if attrs.metadata().name() != "http_attempt" {
            return;
        }
        let mut fields = AttemptFields::default();
        attrs.record(&mut fields);
        if let Some(span) = ctx.span(id) {
            span.extensions_mut().insert(fields);
        }
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        if let Some(span) = ctx.span(id)
            && let Some(fields) = span.extensions_mut().get_mut::<AttemptFields>()
        {
            values.record(fields);
        }
    }

    fn on_close(&self, id: tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(span) = ctx.span(&id)
            && let Some(fields) = span.extensions().get::<AttemptFields>()
        {
            self.seen
                .lock()
                .unwrap()
                .push((fields.attempt, fields.outcome.clone()));
        }
    }
}

#[tokio::test]
async fn each_attempt_gets_its_own_span() {
    let capture = AttemptSpans::default();
    let seen = Arc::clone(&capture.seen);
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::DEBUG)
        .with(capture);
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/flaky");
        then.status(500);
    });

    let resp = client_with_attempts(3)
        .get(&server.url("/flaky"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), http::StatusCode::INTERNAL_SERVER_ERROR);

    let seen = seen.lock().unwrap().clone();
    assert_eq!(
        seen,
        vec![
            (1, "retry".to_owned()),
            (2, "retry".to_owned()),
            (3, "status".to_owned()),
        ]
    );
}
