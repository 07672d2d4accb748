//! Request and response body codecs.

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

mod xml;

/// Root element name for XML bodies; decoding accepts any root
pub const XML_ROOT: &str = "payload";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentType {
    #[default]
    Json,
    Xml,
}

impl ContentType {
    #[must_use]
    pub fn mime(self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
        }
    }

    /// Codec for a response media type (parameters already stripped)
    #[must_use]
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let media_type = media_type.trim().to_ascii_lowercase();
        match media_type.as_str() {
            "application/json" => Some(Self::Json),
            "application/xml" | "text/xml" => Some(Self::Xml),
            other if other.ends_with("+json") => Some(Self::Json),
            other if other.ends_with("+xml") => Some(Self::Xml),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DecodeError {
    #[error("empty response body")]
    EmptyBody,

    /// The envelope decoded but its `data` was absent
    #[error("response envelope carried no data")]
    MissingData,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum EncodeError {
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML encoding failed: {0}")]
    Xml(String),
}

/// Body codec fixed at client configuration time.
///
/// Stateless, so one value serves every concurrent call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Encoder {
    content_type: ContentType,
}

impl Encoder {
    #[must_use]
    pub fn new(content_type: ContentType) -> Self {
        Self { content_type }
    }

    #[must_use]
    pub fn content_type(self) -> ContentType {
        self.content_type
    }

    /// # Errors
    /// Returns [`EncodeError`] if `body` cannot be represented in the
    /// configured content type
    pub fn encode<T: Serialize + ?Sized>(self, body: &T) -> Result<Bytes, EncodeError> {
        match self.content_type {
            ContentType::Json => Ok(Bytes::from(serde_json::to_vec(body)?)),
            ContentType::Xml => {
                let value = serde_json::to_value(body)?;
                Ok(Bytes::from(xml::to_document(XML_ROOT, &value)?))
            }
        }
    }

    /// Decode `body`, choosing the codec from the response media type when
    /// it names one and falling back to the configured content type.
    ///
    /// # Errors
    /// Returns [`DecodeError::EmptyBody`] for a blank body, or the codec's
    /// error when the body does not match `T`
    pub fn decode<T: DeserializeOwned>(
        self,
        body: &[u8],
        media_type: Option<&str>,
    ) -> Result<T, DecodeError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(DecodeError::EmptyBody);
        }
        let content_type = media_type
            .and_then(ContentType::from_media_type)
            .unwrap_or(self.content_type);

        match content_type {
            ContentType::Json => Ok(serde_json::from_slice(body)?),
            ContentType::Xml => decode_xml(body),
        }
    }
}

/// Annotated documents map onto `T` through their JSON value. A document
/// that does not fit that way (a single-element list from an unannotated
/// server, say) falls back to element-shape decoding.
fn decode_xml<T: DeserializeOwned>(body: &[u8]) -> Result<T, DecodeError> {
    let node: xml::Node = quick_xml::de::from_reader(body)?;
    if let Some(decoded) = xml::root_value(node)
        .ok()
        .and_then(|value| serde_json::from_value(value).ok())
    {
        return Ok(decoded);
    }
    Ok(quick_xml::de::from_reader(body)?)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::envelope::{ApiError, Envelope, Pagination};
    use crate::query::SortDirection;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Instrument {
        id: String,
        name: String,
    }

    fn sample() -> Envelope<Instrument> {
        Envelope {
            data: Some(Instrument {
                id: "i1".into(),
                name: "whisk".into(),
            }),
            pagination: Some(Pagination {
                page: 2,
                limit: 20,
                total_count: 41,
                sort_by: SortDirection::Desc,
            }),
            error: None,
        }
    }

    #[test]
    fn json_round_trip() {
        let encoder = Encoder::default();
        let bytes = encoder.encode(&sample()).unwrap();
        let back: Envelope<Instrument> = encoder.decode(&bytes, None).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn xml_round_trip() {
        let encoder = Encoder::new(ContentType::Xml);
        let bytes = encoder.encode(&sample()).unwrap();
        let text = std::str::from_utf8(&bytes).unwrap();
        assert!(text.starts_with("<payload>"), "{text}");

        let back: Envelope<Instrument> = encoder.decode(&bytes, None).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn xml_error_envelope() {
        let encoder = Encoder::new(ContentType::Xml);
        let body = b"<response><error><code>E1</code><message>nope</message></error></response>";
        let env: Envelope<Instrument> = encoder.decode(body, Some("application/xml")).unwrap();
        assert!(env.data.is_none());
        assert_eq!(
            env.error,
            Some(ApiError {
                code: "E1".into(),
                message: "nope".into(),
                details: None,
            })
        );
    }

    #[test]
    fn empty_body_is_rejected() {
        let err = Encoder::default()
            .decode::<Envelope<Instrument>>(b"  \n", None)
            .unwrap_err();
        assert!(matches!(err, DecodeError::EmptyBody));
    }

    #[test]
    fn response_media_type_wins() {
        let encoder = Encoder::new(ContentType::Xml);
        let env: Envelope<Instrument> = encoder
            .decode(br#"{"data":{"id":"i1","name":"whisk"}}"#, Some("application/json"))
            .unwrap();
        assert_eq!(env.data.unwrap().name, "whisk");

        let err = encoder
            .decode::<Envelope<Instrument>>(br#"{"data":{}}"#, Some("text/plain"))
            .unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }

    #[test]
    fn media_types() {
        assert_eq!(
            ContentType::from_media_type("application/problem+json"),
            Some(ContentType::Json)
        );
        assert_eq!(ContentType::from_media_type("Text/XML"), Some(ContentType::Xml));
        assert_eq!(ContentType::from_media_type("text/html"), None);
        assert_eq!(ContentType::Xml.mime(), "application/xml");
    }
}
