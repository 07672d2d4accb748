use crate::error::HttpError;
use bytes::{Bytes, BytesMut};
use http::{HeaderMap, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use std::time::{Duration, SystemTime};

/// Bytes of a non-2xx body kept in [`HttpError::HttpStatus`] (8 KiB)
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 8 * 1024;

/// Decompressed, type-erased response body
pub type ResponseBody =
    http_body_util::combinators::BoxBody<Bytes, Box<dyn std::error::Error + Send + Sync>>;

/// Delay requested by a `Retry-After` header.
///
/// Accepts delta-seconds and HTTP-dates. Negative values, garbage and dates
/// already in the past yield `None`.
#[must_use]
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let raw = headers.get(header::RETRY_AFTER)?.to_str().ok()?.trim();

    if let Ok(secs) = raw.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }
    if raw.starts_with('-') {
        return None;
    }

    httpdate::parse_http_date(raw)
        .ok()?
        .duration_since(SystemTime::now())
        .ok()
}

/// Response returned by [`RequestBuilder::send`](crate::RequestBuilder::send).
///
/// Every status arrives as `Ok`; call [`error_for_status`](Self::error_for_status)
/// or a `checked_*` reader to turn non-2xx into [`HttpError::HttpStatus`].
/// All body readers enforce the client's `max_body_size`.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<ResponseBody>,
    pub(crate) max_body_size: usize,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.inner.headers()
    }

    /// `Content-Type` without parameters, lowercased
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        media_type(self.inner.headers())
    }

    /// `Err(HttpStatus)` for non-2xx, without reading the body
    ///
    /// # Errors
    /// Returns `HttpError::HttpStatus` when the status is not 2xx
    pub fn error_for_status(self) -> Result<Self, HttpError> {
        if self.inner.status().is_success() {
            return Ok(self);
        }
        Err(HttpError::HttpStatus {
            status: self.inner.status(),
            body_preview: String::new(),
            content_type: media_type(self.inner.headers()),
        })
    }

    /// Whole body, whatever the status
    ///
    /// # Errors
    /// Returns `BodyTooLarge` past the size cap, `Transport` on read failure
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        read_body_limited(self.inner.into_body(), self.max_body_size).await
    }

    /// Whole body of a 2xx response
    ///
    /// # Errors
    /// Returns `HttpStatus` with a body preview for non-2xx, otherwise as [`bytes`](Self::bytes)
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        let status = self.inner.status();
        if status.is_success() {
            return self.bytes().await;
        }

        let content_type = media_type(self.inner.headers());
        let limit = self.max_body_size.min(ERROR_BODY_PREVIEW_LIMIT);
        let body_preview = match read_body_limited(self.inner.into_body(), limit).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(HttpError::BodyTooLarge { .. }) => "<body too large for preview>".to_owned(),
            Err(e) => return Err(e),
        };

        Err(HttpError::HttpStatus {
            status,
            body_preview,
            content_type,
        })
    }

    /// 2xx body decoded as JSON
    ///
    /// # Errors
    /// As [`checked_bytes`](Self::checked_bytes), plus `Json` on malformed content
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = self.checked_bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// 2xx body as text, invalid UTF-8 replaced
    ///
    /// # Errors
    /// As [`checked_bytes`](Self::checked_bytes)
    pub async fn text(self) -> Result<String, HttpError> {
        let body = self.checked_bytes().await?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

fn media_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?.to_str().ok()?;
    let essence = value.split(';').next().unwrap_or(value).trim();
    (!essence.is_empty()).then(|| essence.to_ascii_lowercase())
}

/// Collect `body`, failing as soon as more than `limit` bytes arrive
///
/// # Errors
/// Returns `BodyTooLarge` past `limit`, `Transport` on read failure
pub async fn read_body_limited(body: ResponseBody, limit: usize) -> Result<Bytes, HttpError> {
    let mut body = std::pin::pin!(body);
    let mut collected = BytesMut::new();

    while let Some(frame) = body.frame().await {
        let frame = frame.map_err(HttpError::Transport)?;
        if let Some(chunk) = frame.data_ref() {
            let actual = collected.len() + chunk.len();
            if actual > limit {
                return Err(HttpError::BodyTooLarge { limit, actual });
            }
            collected.extend_from_slice(chunk);
        }
    }

    Ok(collected.freeze())
}
