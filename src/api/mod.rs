//! Transifex API connector
//!
//! [`Transifex`] owns the configuration and the [`Http`] client; each API
//! area is reached through a borrowing accessor such as
//! [`Transifex::projects`]. Responses are returned as [`serde_json::Value`]
//! since payload shapes are defined by the server.

pub mod formats;
pub mod language_info;
pub mod languages;
pub mod projects;
pub mod releases;
pub mod resources;
pub mod statistics;
pub mod translation_strings;
pub mod translations;

pub use formats::Formats;
pub use language_info::LanguageInfo;
pub use languages::{LanguageUpdate, Languages, NewLanguage};
pub use projects::{License, NewProject, ProjectUpdate, Projects};
pub use releases::{NewRelease, ReleaseUpdate, Releases};
pub use resources::{NewResource, Resources};
pub use statistics::Statistics;
pub use translation_strings::{StringFilter, TranslationStrings};
pub use translations::Translations;

use crate::client::{Body, Headers, Http, Response};
use crate::config::Config;
use crate::error::{Result, TxError};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const JSON_CONTENT_TYPE: &str = "application/json";

/// Client for the Transifex API
#[derive(Debug, Clone)]
pub struct Transifex {
    config: Config,
    client: Http,
}

impl Transifex {
    /// Create a connector using the configured transport driver preference
    ///
    /// # Errors
    ///
    /// Returns [`TxError::NoTransport`] when none of the configured drivers can
    /// be created.
    pub fn new(config: Config) -> Result<Self> {
        let client = crate::client::get_http(config.http_options(), Some(config.drivers.as_slice()))?;
        Ok(Self { config, client })
    }

    /// Create a connector on an existing HTTP client
    #[must_use]
    pub const fn with_client(config: Config, client: Http) -> Self {
        Self { config, client }
    }

    /// Active configuration
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Point the connector at another API root
    pub fn set_api_url(&mut self, api_url: impl Into<String>) -> &mut Self {
        self.config.api_url = api_url.into();
        self
    }

    /// Underlying HTTP client
    #[must_use]
    pub const fn client(&self) -> &Http {
        &self.client
    }

    /// Format API
    #[must_use]
    pub const fn formats(&self) -> Formats<'_> {
        Formats::new(self)
    }

    /// Language info API
    #[must_use]
    pub const fn language_info(&self) -> LanguageInfo<'_> {
        LanguageInfo::new(self)
    }

    /// Project language API
    #[must_use]
    pub const fn languages(&self) -> Languages<'_> {
        Languages::new(self)
    }

    /// Project API
    #[must_use]
    pub const fn projects(&self) -> Projects<'_> {
        Projects::new(self)
    }

    /// Release API
    #[must_use]
    pub const fn releases(&self) -> Releases<'_> {
        Releases::new(self)
    }

    /// Resource API
    #[must_use]
    pub const fn resources(&self) -> Resources<'_> {
        Resources::new(self)
    }

    /// Statistics API
    #[must_use]
    pub const fn statistics(&self) -> Statistics<'_> {
        Statistics::new(self)
    }

    /// Translation API
    #[must_use]
    pub const fn translations(&self) -> Translations<'_> {
        Translations::new(self)
    }

    /// Translation strings API
    #[must_use]
    pub const fn translation_strings(&self) -> TranslationStrings<'_> {
        TranslationStrings::new(self)
    }

    /// Full request URL for an API path
    #[must_use]
    pub fn fetch_url(&self, path: &str) -> String {
        format!("{}{path}", self.config.api_url)
    }

    pub(crate) async fn get(&self, path: &str, expected: u16) -> Result<Value> {
        let url = self.fetch_url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url, None, None).await?;
        process_response(&response, expected)
    }

    pub(crate) async fn delete(&self, path: &str, expected: u16) -> Result<Value> {
        let url = self.fetch_url(path);
        debug!(%url, "DELETE");
        let response = self.client.delete(&url, None, None).await?;
        process_response(&response, expected)
    }

    pub(crate) async fn post_json<T: Serialize + Sync>(
        &self,
        path: &str,
        data: &T,
        expected: u16,
    ) -> Result<Value> {
        let url = self.fetch_url(path);
        debug!(%url, "POST");
        let response = self
            .client
            .post(&url, Body::json(data)?, Some(json_headers()), None)
            .await?;
        process_response(&response, expected)
    }

    pub(crate) async fn put_json<T: Serialize + Sync>(
        &self,
        path: &str,
        data: &T,
        expected: u16,
    ) -> Result<Value> {
        let url = self.fetch_url(path);
        debug!(%url, "PUT");
        let response = self
            .client
            .put(&url, Body::json(data)?, Some(json_headers()), None)
            .await?;
        process_response(&response, expected)
    }
}

/// Check a response against the expected status code and decode its body
///
/// A mismatched status becomes [`TxError::ApiError`] carrying the `message`
/// field of a JSON error body, or the raw body otherwise. An empty body
/// decodes to [`Value::Null`].
///
/// # Errors
///
/// Returns [`TxError::ApiError`] on an unexpected status and
/// [`TxError::DeserializationError`] when a successful body is not JSON.
pub fn process_response(response: &Response, expected: u16) -> Result<Value> {
    if response.code != expected {
        let message = serde_json::from_slice::<Value>(&response.body)
            .ok()
            .and_then(|error| error.get("message").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| response.text());

        return Err(TxError::ApiError {
            status: response.code,
            message,
        });
    }

    if response.body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }

    response.json()
}

/// Resource or translation content sent to the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Content given directly
    Inline(String),
    /// Content read from a local file
    File(PathBuf),
}

impl Content {
    /// Resolve to the text sent in the request body
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] if a file cannot be read.
    pub fn load(&self) -> Result<String> {
        match self {
            Self::Inline(text) => Ok(text.clone()),
            Self::File(path) => fs::read_to_string(path).map_err(|e| {
                TxError::InvalidArgument(format!("Cannot read content file {}: {e}", path.display()))
            }),
        }
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Inline(text)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Inline(text.to_string())
    }
}

impl From<PathBuf> for Content {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

#[derive(Serialize)]
struct ContentBody {
    content: String,
}

/// Percent-encode a single path segment
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

fn json_headers() -> Headers {
    let mut headers = Headers::new();
    let _ = headers.insert("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string());
    headers
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::testing::*;
    use super::*;

    fn response(code: u16, body: &str) -> Response {
        Response {
            code,
            body: body.as_bytes().to_vec(),
            ..Response::default()
        }
    }

    #[test]
    fn test_process_response_success() {
        let value = process_response(&response(200, SAMPLE_BODY), 200).unwrap();
        assert_eq!(value, sample());
    }

    #[test]
    fn test_process_response_empty_body() {
        assert_eq!(process_response(&response(204, ""), 204).unwrap(), Value::Null);
    }

    #[test]
    fn test_process_response_json_message() {
        assert_generic_error(process_response(&response(500, ERROR_BODY), 200));
    }

    #[test]
    fn test_process_response_raw_message() {
        let err = process_response(&response(404, "Not Found"), 200).unwrap_err();
        assert!(matches!(
            err,
            TxError::ApiError { status: 404, ref message } if message == "Not Found"
        ));
    }

    #[test]
    fn test_process_response_unexpected_success_code() {
        let err = process_response(&response(200, SAMPLE_BODY), 201).unwrap_err();
        assert!(matches!(err, TxError::ApiError { status: 200, .. }));
    }

    #[test]
    fn test_fetch_url_and_api_url() {
        let (mut api, _) = mock_api();
        assert_eq!(
            api.fetch_url("/projects/"),
            "https://www.transifex.com/api/2/projects/"
        );

        let _ = api.set_api_url("http://localhost:8000/api/2");
        assert_eq!(api.fetch_url("/formats"), "http://localhost:8000/api/2/formats");
        assert_eq!(api.config().api_url, "http://localhost:8000/api/2");
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("joomla-platform"), "joomla-platform");
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
    }

    #[test]
    fn test_content_load() -> anyhow::Result<()> {
        assert_eq!(Content::from("inline").load()?, "inline");

        let dir = tempfile::tempdir()?;
        let path = dir.path().join("strings.ini");
        fs::write(&path, "KEY=\"Value\"\n")?;
        assert_eq!(Content::from(path).load()?, "KEY=\"Value\"\n");

        let missing = Content::File(dir.path().join("missing.ini"));
        assert!(matches!(missing.load(), Err(TxError::InvalidArgument(_))));
        Ok(())
    }

    #[test]
    fn test_new_uses_configured_driver() -> anyhow::Result<()> {
        let config = Config {
            drivers: vec!["socket".to_string()],
            ..Config::default()
        };
        let api = Transifex::new(config)?;
        assert_eq!(api.client().transport().driver(), crate::client::Driver::Socket);

        let config = Config {
            drivers: vec!["fopen".to_string()],
            ..Config::default()
        };
        assert!(matches!(Transifex::new(config), Err(TxError::NoTransport(_))));
        Ok(())
    }

    #[tokio::test]
    async fn test_json_requests_set_content_type() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);

        let value = api
            .put_json("/project/p/", &serde_json::json!({"name": "x"}), 200)
            .await?;
        assert_eq!(value, sample());

        let request = transport.last_request().unwrap();
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(
            request.body,
            Some(Body::Raw(br#"{"name":"x"}"#.to_vec()))
        );
        Ok(())
    }
}
