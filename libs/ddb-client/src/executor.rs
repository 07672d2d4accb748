//! Shared call path: validate, send, classify.
//!
//! Every operation runs inside one `ddb.operation` span. Validation happens
//! in the span too, so rejected calls are still visible to tracing.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::field::Empty;
use tracing::instrument::WithSubscriber;
use tracing::{Instrument, Span};

use crate::client::{Client, ClientState};
use crate::envelope::{Envelope, Page};
use crate::error::Error;
use crate::request::RequestSpec;

/// Response with its body read
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub media_type: Option<String>,
    pub body: Bytes,
}

impl RawResponse {
    fn is_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

impl Client {
    /// Run one operation.
    ///
    /// `build` validates arguments and describes the request; `handle`
    /// turns the response into the operation's result.
    pub(crate) async fn dispatch<R, B, H>(
        &self,
        operation: &'static str,
        build: B,
        handle: H,
    ) -> Result<R, Error>
    where
        B: FnOnce() -> Result<RequestSpec, Error>,
        H: FnOnce(&ClientState, RawResponse) -> Result<R, Error>,
    {
        let state = self.snapshot();
        let logger = state.settings.logger.clone();
        let call = self.traced(operation, &state, build, handle);

        match logger {
            Some(dispatch) => call.with_subscriber(dispatch).await,
            None => call.await,
        }
    }

    async fn traced<R, B, H>(
        &self,
        operation: &'static str,
        state: &ClientState,
        build: B,
        handle: H,
    ) -> Result<R, Error>
    where
        B: FnOnce() -> Result<RequestSpec, Error>,
        H: FnOnce(&ClientState, RawResponse) -> Result<R, Error>,
    {
        let span = tracing::info_span!(
            "ddb.operation",
            otel.name = operation,
            otel.kind = "client",
            base_url = state.settings.url.base(),
            path = Empty,
            http.method = Empty,
            id1.name = Empty,
            id1.value = Empty,
            id2.name = Empty,
            id2.value = Empty,
            id3.name = Empty,
            id3.value = Empty,
            id4.name = Empty,
            id4.value = Empty,
            page = Empty,
            limit = Empty,
            sort_by = Empty,
            http.status_code = Empty,
            error.kind = Empty,
        );

        let result = self
            .bounded(state, &span, build, handle)
            .instrument(span.clone())
            .await;

        if let Err(err) = &result {
            span.record("error.kind", err.kind().as_str());
            if err.is_validation() {
                span.in_scope(|| tracing::debug!(error = %err, "rejected before sending"));
            }
        }
        result
    }

    /// Apply the client timeout and the cancellation token
    async fn bounded<R, B, H>(
        &self,
        state: &ClientState,
        span: &Span,
        build: B,
        handle: H,
    ) -> Result<R, Error>
    where
        B: FnOnce() -> Result<RequestSpec, Error>,
        H: FnOnce(&ClientState, RawResponse) -> Result<R, Error>,
    {
        let exchange = tokio::time::timeout(
            state.settings.timeout,
            Self::exchange(state, span, build, handle),
        );

        let outcome = match self.cancellation() {
            Some(token) => tokio::select! {
                biased;
                () = token.cancelled() => return Err(Error::Cancelled),
                outcome = exchange => outcome,
            },
            None => exchange.await,
        };

        match outcome {
            Ok(result) => result,
            Err(_elapsed) => {
                tracing::warn!(
                    timeout_ms = u64::try_from(state.settings.timeout.as_millis()).unwrap_or(u64::MAX),
                    "operation timed out"
                );
                Err(Error::Timeout)
            }
        }
    }

    async fn exchange<R, B, H>(
        state: &ClientState,
        span: &Span,
        build: B,
        handle: H,
    ) -> Result<R, Error>
    where
        B: FnOnce() -> Result<RequestSpec, Error>,
        H: FnOnce(&ClientState, RawResponse) -> Result<R, Error>,
    {
        let spec = build()?;
        record_spec(span, &spec);

        let settings = &state.settings;
        let log_bodies = settings.debug && !spec.is_sensitive();
        let url = settings.url.build(spec.path(), &spec.query_values());
        let http = if spec.is_authenticated() {
            &state.authed
        } else {
            &state.plain
        };

        let mut request = http.request(spec.method().clone(), &url);
        if let Some(body) = spec.body_value() {
            let encoded = settings
                .encoder
                .encode(body)
                .map_err(Error::EncodeFailure)?;
            if log_bodies {
                tracing::debug!(body = %String::from_utf8_lossy(&encoded), "request body");
            }
            request = request.body(encoded, settings.encoder.content_type().mime());
        }

        let response = request.send().await?;
        let status = response.status();
        span.record("http.status_code", status.as_u16());

        let headers = response.headers().clone();
        let media_type = response.media_type();
        let body = response.bytes().await?;
        if log_bodies {
            tracing::debug!(
                status = status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "response body"
            );
        }

        handle(
            state,
            RawResponse {
                status,
                headers,
                media_type,
                body,
            },
        )
    }

    /// Operation returning the envelope's `data`
    pub(crate) async fn fetch<T, B>(&self, operation: &'static str, build: B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: FnOnce() -> Result<RequestSpec, Error>,
    {
        self.dispatch(operation, build, |state, raw| {
            decode_envelope::<T>(state, &raw)?.into_data()
        })
        .await
    }

    /// List operation returning one page
    pub(crate) async fn fetch_page<T, B>(
        &self,
        operation: &'static str,
        build: B,
    ) -> Result<Page<T>, Error>
    where
        T: DeserializeOwned,
        B: FnOnce() -> Result<RequestSpec, Error>,
    {
        self.dispatch(operation, build, |state, raw| {
            decode_envelope::<Vec<T>>(state, &raw)?.into_page()
        })
        .await
    }

    /// Operation with no payload; a blank 2xx body counts as success
    pub(crate) async fn fetch_unit<B>(&self, operation: &'static str, build: B) -> Result<(), Error>
    where
        B: FnOnce() -> Result<RequestSpec, Error>,
    {
        self.dispatch(operation, build, |state, raw| {
            if raw.status.is_success() && raw.is_blank() {
                return Ok(());
            }
            decode_envelope::<IgnoredAny>(state, &raw)?.into_unit()
        })
        .await
    }
}

/// Decode and classify a response.
///
/// An envelope error always wins. A non-2xx status without one is
/// [`Error::InvalidResponseCode`], whether or not the body decoded.
pub fn decode_envelope<T: DeserializeOwned>(
    state: &ClientState,
    raw: &RawResponse,
) -> Result<Envelope<T>, Error> {
    let decoded = state
        .settings
        .encoder
        .decode::<Envelope<T>>(&raw.body, raw.media_type.as_deref());

    if !raw.status.is_success() {
        return Err(match decoded.map(Envelope::check) {
            Ok(Err(server_error)) => server_error,
            _ => Error::InvalidResponseCode { status: raw.status },
        });
    }

    decoded
        .map_err(|e| {
            tracing::warn!(error = %e, status = raw.status.as_u16(), "failed to decode response");
            Error::DecodeFailure(e)
        })?
        .check()
}

/// Status-only classification for endpoints whose success body is ignored
pub fn expect_status(
    state: &ClientState,
    raw: &RawResponse,
    accepted: &[StatusCode],
) -> Result<(), Error> {
    if accepted.contains(&raw.status) {
        Ok(())
    } else {
        Err(status_error(state, raw))
    }
}

/// The envelope's error if the body carries one, else the bare status
pub fn status_error(state: &ClientState, raw: &RawResponse) -> Error {
    state
        .settings
        .encoder
        .decode::<Envelope<IgnoredAny>>(&raw.body, raw.media_type.as_deref())
        .ok()
        .and_then(|envelope| envelope.check().err())
        .unwrap_or(Error::InvalidResponseCode { status: raw.status })
}

/// Span slots for route ids, outermost first; no route nests deeper
const ID_FIELDS: [(&str, &str); 4] = [
    ("id1.name", "id1.value"),
    ("id2.name", "id2.value"),
    ("id3.name", "id3.value"),
    ("id4.name", "id4.value"),
];

fn record_spec(span: &Span, spec: &RequestSpec) {
    span.record("path", spec.path());
    span.record("http.method", spec.method().as_str());

    for ((field, id), (name_key, value_key)) in spec.ids().iter().zip(ID_FIELDS) {
        span.record(name_key, *field);
        span.record(value_key, id.as_str());
    }

    if let Some(filter) = spec.pagination() {
        span.record("page", filter.page());
        span.record("limit", u64::from(filter.limit()));
        span.record("sort_by", filter.sort_by.as_str());
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::options::{ClientOption, Settings};
    use crate::types::ValidInstrument;

    async fn state(options: impl IntoIterator<Item = ClientOption>) -> ClientState {
        let mut settings = Settings::new("https://api.example.com").unwrap();
        for option in options {
            settings.apply(option).await.unwrap();
        }
        settings.build().unwrap()
    }

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: HeaderMap::new(),
            media_type: Some("application/json".into()),
            body: Bytes::from(body.to_owned()),
        }
    }

    #[tokio::test]
    async fn success_envelope_yields_data() {
        let state = state([]).await;
        let envelope = decode_envelope::<ValidInstrument>(
            &state,
            &raw(200, r#"{"data":{"id":"i1","name":"whisk"}}"#),
        )
        .unwrap();
        assert_eq!(envelope.into_data().unwrap().id, "i1");
    }

    #[tokio::test]
    async fn error_status_prefers_envelope_error() {
        let state = state([]).await;
        let err = decode_envelope::<ValidInstrument>(
            &state,
            &raw(404, r#"{"error":{"code":"not_found","message":"no such instrument"}}"#),
        )
        .unwrap_err();
        match err {
            Error::ServerError { code, message, .. } => {
                assert_eq!(code, "not_found");
                assert_eq!(message, "no such instrument");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn error_status_without_envelope_is_response_code() {
        let state = state([]).await;
        for body in ["", "<html>bad gateway</html>", r#"{"data":{"id":"x"}}"#] {
            let err = decode_envelope::<ValidInstrument>(&state, &raw(502, body)).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidResponseCode { status } if status == StatusCode::BAD_GATEWAY
            ));
        }
    }

    #[tokio::test]
    async fn empty_success_body_is_decode_failure() {
        let state = state([]).await;
        let err = decode_envelope::<ValidInstrument>(&state, &raw(200, "")).unwrap_err();
        assert!(matches!(
            err,
            Error::DecodeFailure(crate::encoding::DecodeError::EmptyBody)
        ));
    }

    #[tokio::test]
    async fn response_media_type_overrides_configured_codec() {
        let state = state([ClientOption::Xml]).await;
        let envelope =
            decode_envelope::<ValidInstrument>(&state, &raw(200, r#"{"data":{"id":"i2"}}"#))
                .unwrap();
        assert_eq!(envelope.into_data().unwrap().id, "i2");
    }

    #[tokio::test]
    async fn expect_status_accepts_listed_codes_only() {
        let state = state([]).await;
        let accepted = [StatusCode::OK, StatusCode::ACCEPTED];
        assert!(expect_status(&state, &raw(202, ""), &accepted).is_ok());
        assert!(matches!(
            expect_status(&state, &raw(204, ""), &accepted),
            Err(Error::InvalidResponseCode { .. })
        ));
        assert!(matches!(
            expect_status(
                &state,
                &raw(400, r#"{"error":{"code":"weak","message":"password too weak"}}"#),
                &accepted
            ),
            Err(Error::ServerError { .. })
        ));
    }
}
