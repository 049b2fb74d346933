//! Transport-independent description of an outgoing HTTP request

use indexmap::IndexMap;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

/// Ordered request headers (name → value)
pub type Headers = IndexMap<String, String>;

/// Content type used for urlencoded form bodies
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// HTTP methods supported by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
    /// TRACE
    Trace,
    /// PATCH
    Patch,
}

impl Method {
    /// Upper-case method token as sent on the wire
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Options => "OPTIONS",
            Self::Head => "HEAD",
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Options => Self::OPTIONS,
            Method::Head => Self::HEAD,
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Delete => Self::DELETE,
            Method::Trace => Self::TRACE,
            Method::Patch => Self::PATCH,
        }
    }
}

/// Request payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Key/value pairs sent urlencoded
    Form(Vec<(String, String)>),
    /// Bytes sent as-is
    Raw(Vec<u8>),
}

impl Body {
    /// Raw body from a JSON value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized.
    pub fn json<T: serde::Serialize>(value: &T) -> crate::Result<Self> {
        Ok(Self::Raw(serde_json::to_vec(value)?))
    }

    /// Whether encoding this body produces no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Form(pairs) => pairs.is_empty(),
            Self::Raw(bytes) => bytes.is_empty(),
        }
    }

    /// Encode the body, returning the bytes and the content type to use when
    /// the caller did not set one
    #[must_use]
    pub fn encode(&self) -> (Vec<u8>, Option<&'static str>) {
        match self {
            Self::Form(pairs) => {
                let encoded = pairs
                    .iter()
                    .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&");
                (encoded.into_bytes(), Some(FORM_CONTENT_TYPE))
            }
            Self::Raw(bytes) => (bytes.clone(), None),
        }
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::Raw(value.into_bytes())
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Raw(value.as_bytes().to_vec())
    }
}

impl From<Vec<(String, String)>> for Body {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Form(pairs)
    }
}

/// A fully resolved request handed to a transport
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Absolute URL
    pub url: Url,
    /// Optional payload
    pub body: Option<Body>,
    /// Headers to send (defaults already merged)
    pub headers: Headers,
    /// Read timeout
    pub timeout: Option<Duration>,
    /// User agent overriding any `User-Agent` header
    pub user_agent: Option<String>,
}

impl Request {
    /// Create a request with no body, headers or timeout
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            headers: Headers::new(),
            timeout: None,
            user_agent: None,
        }
    }

    /// Whether a header is present, ignoring case
    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.keys().any(|k| k.eq_ignore_ascii_case(name))
    }

    /// Header value, ignoring case
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_encoding() {
        let body = Body::Form(vec![
            ("name".to_string(), "My Project".to_string()),
            ("slug".to_string(), "a&b=c".to_string()),
        ]);
        let (bytes, content_type) = body.encode();
        assert_eq!(bytes, b"name=My%20Project&slug=a%26b%3Dc");
        assert_eq!(content_type, Some(FORM_CONTENT_TYPE));
    }

    #[test]
    fn test_raw_body_has_no_default_type() {
        let body = Body::from(r#"{"a":1}"#);
        let (bytes, content_type) = body.encode();
        assert_eq!(bytes, br#"{"a":1}"#);
        assert!(content_type.is_none());
        assert!(!body.is_empty());
        assert!(Body::Form(Vec::new()).is_empty());
    }

    #[test]
    fn test_header_lookup_ignores_case() -> anyhow::Result<()> {
        let mut request = Request::new(Method::Get, Url::parse("http://localhost/")?);
        let _ = request
            .headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        assert!(request.has_header("content-type"));
        assert_eq!(request.header("CONTENT-TYPE"), Some("application/json"));
        Ok(())
    }
}
