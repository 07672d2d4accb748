//! W3C trace context propagation for outbound requests.
//!
//! With the `otel` feature the current `tracing` span's OpenTelemetry context
//! is written through the global propagator. Without it, injection does nothing.

use http::HeaderMap;

#[cfg(feature = "otel")]
mod imp {
    use http::{HeaderMap, HeaderName, HeaderValue};
    use opentelemetry::global;
    use opentelemetry::propagation::Injector;
    use tracing_opentelemetry::OpenTelemetrySpanExt;

    struct HeaderInjector<'a>(&'a mut HeaderMap);

    impl Injector for HeaderInjector<'_> {
        fn set(&mut self, key: &str, value: String) {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(&value),
            ) {
                self.0.insert(name, value);
            }
        }
    }

    pub fn inject_current_span(headers: &mut HeaderMap) {
        let cx = tracing::Span::current().context();
        global::get_text_map_propagator(|propagator| {
            propagator.inject_context(&cx, &mut HeaderInjector(headers));
        });
    }
}

#[cfg(not(feature = "otel"))]
mod imp {
    use http::HeaderMap;

    pub fn inject_current_span(_headers: &mut HeaderMap) {}
}

/// Write the current span's trace context into `headers`
pub fn inject_current_span(headers: &mut HeaderMap) {
    imp::inject_current_span(headers);
}
