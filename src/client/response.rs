//! HTTP response type and raw HTTP/1.x response decoding

use crate::error::{Result, TxError};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

/// A decoded HTTP response
#[derive(Debug, Clone, Default)]
pub struct Response {
    /// Status code
    pub code: u16,
    /// Response headers; repeated names keep every value
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Vec<u8>,
}

impl Response {
    /// Body decoded as UTF-8, replacing invalid sequences
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Body decoded as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Whether the status code is 2xx
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// First value of a header, if present and printable
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Decode a complete raw HTTP response (status line, headers and body)
///
/// # Errors
///
/// Returns [`TxError::InvalidResponse`] if the content is empty or the status
/// line carries no three-digit status code.
pub fn parse_response(content: &[u8]) -> Result<Response> {
    if content.is_empty() {
        return Err(TxError::InvalidResponse("No content in response".to_string()));
    }

    let (head, body) = match find_header_end(content) {
        Some(end) => (&content[..end], content[end + 4..].to_vec()),
        None => (content, Vec::new()),
    };

    let head = String::from_utf8_lossy(head);
    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or_default();

    let code = status_code(status_line)
        .ok_or_else(|| TxError::InvalidResponse("No HTTP response code found".to_string()))?;

    Ok(Response {
        code,
        headers: process_headers(lines),
        body,
    })
}

/// Offset of the CRLFCRLF separating headers from the body
pub(crate) fn find_header_end(content: &[u8]) -> Option<usize> {
    content.windows(4).position(|w| w == b"\r\n\r\n")
}

/// First run of three ASCII digits on the status line
fn status_code(line: &str) -> Option<u16> {
    line.as_bytes()
        .windows(3)
        .find(|w| w.iter().all(u8::is_ascii_digit))
        .and_then(|digits| std::str::from_utf8(digits).ok())
        .and_then(|digits| digits.parse().ok())
}

fn process_headers<'a>(lines: impl Iterator<Item = &'a str>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };

        let name = HeaderName::from_bytes(name.trim().as_bytes());
        let value = HeaderValue::from_str(value.trim());
        match (name, value) {
            (Ok(name), Ok(value)) => {
                let _ = headers.append(name, value);
            }
            _ => tracing::trace!(line, "skipping malformed response header"),
        }
    }

    headers
}
