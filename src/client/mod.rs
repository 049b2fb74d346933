//! HTTP client abstraction over runtime-selected transports
//!
//! [`Http`] resolves per-request headers, timeout and user agent against its
//! [`HttpOptions`] and hands the resulting [`Request`] to a [`Transport`]
//! picked by [`factory::available_driver`].

pub mod factory;
pub mod pooled;
pub mod request;
pub mod response;
pub mod socket;
pub mod stream;
pub mod transport;

pub use factory::{available_driver, get_http, http_transports};
pub use request::{Body, Headers, Method, Request};
pub use response::Response;
pub use transport::{Driver, Transport};

use crate::error::{Result, TxError};
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;

/// Options applied to every request sent through an [`Http`] client
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpOptions {
    /// Headers added to each request unless the request sets them itself
    pub headers: Headers,
    /// Read timeout used when a request does not specify one
    pub timeout: Option<Duration>,
    /// User agent sent with every request
    pub user_agent: Option<String>,
}

/// HTTP client class
#[derive(Debug, Clone)]
pub struct Http {
    options: HttpOptions,
    transport: Arc<dyn Transport>,
}

impl Http {
    /// Create a client on the first available transport driver
    ///
    /// # Errors
    ///
    /// Returns [`TxError::NoTransport`] if no driver can be created.
    pub fn new(options: HttpOptions) -> Result<Self> {
        get_http::<&str>(options, None)
    }

    /// Create a client on an explicit transport
    #[must_use]
    pub fn with_transport(options: HttpOptions, transport: Arc<dyn Transport>) -> Self {
        Self { options, transport }
    }

    /// Client options
    #[must_use]
    pub const fn http_options(&self) -> &HttpOptions {
        &self.options
    }

    /// Mutable client options
    pub fn http_options_mut(&mut self) -> &mut HttpOptions {
        &mut self.options
    }

    /// Set a default header
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let _ = self.options.headers.insert(name.into(), value.into());
        self
    }

    /// Set the default timeout
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.options.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn set_user_agent(&mut self, user_agent: Option<String>) -> &mut Self {
        self.options.user_agent = user_agent;
        self
    }

    /// Transport in use
    #[must_use]
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send an OPTIONS request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    pub async fn options(
        &self,
        url: &str,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        self.send(Method::Options, url, None, headers, timeout).await
    }

    /// Send a HEAD request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    pub async fn head(
        &self,
        url: &str,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        self.send(Method::Head, url, None, headers, timeout).await
    }

    /// Send a GET request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    pub async fn get(
        &self,
        url: &str,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        self.send(Method::Get, url, None, headers, timeout).await
    }

    /// Send a POST request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    pub async fn post(
        &self,
        url: &str,
        data: impl Into<Body> + Send,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        self.send(Method::Post, url, Some(data.into()), headers, timeout)
            .await
    }

    /// Send a PUT request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    pub async fn put(
        &self,
        url: &str,
        data: impl Into<Body> + Send,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        self.send(Method::Put, url, Some(data.into()), headers, timeout)
            .await
    }

    /// Send a DELETE request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    pub async fn delete(
        &self,
        url: &str,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        self.send(Method::Delete, url, None, headers, timeout).await
    }

    /// Send a TRACE request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    pub async fn trace(
        &self,
        url: &str,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        self.send(Method::Trace, url, None, headers, timeout).await
    }

    /// Send a PATCH request
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the transport fails.
    pub async fn patch(
        &self,
        url: &str,
        data: impl Into<Body> + Send,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        self.send(Method::Patch, url, Some(data.into()), headers, timeout)
            .await
    }

    /// Resolve a request against the client options and send it
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Body>,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Response> {
        let request = self.prepare(method, url, body, headers, timeout)?;
        self.transport.request(request).await
    }

    fn prepare(
        &self,
        method: Method,
        url: &str,
        body: Option<Body>,
        headers: Option<Headers>,
        timeout: Option<Duration>,
    ) -> Result<Request> {
        let url = Url::parse(url)
            .map_err(|e| TxError::InvalidArgument(format!("Invalid URL '{url}': {e}")))?;

        let mut request = Request::new(method, url);
        request.headers = headers.unwrap_or_default();

        for (name, value) in &self.options.headers {
            if !request.has_header(name) {
                let _ = request.headers.insert(name.clone(), value.clone());
            }
        }

        request.body = body;
        request.timeout = timeout.or(self.options.timeout);
        request.user_agent.clone_from(&self.options.user_agent);

        Ok(request)
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::testing::mock_http;
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> Headers {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_default_headers_merged() -> anyhow::Result<()> {
        let options = HttpOptions {
            headers: headers(&[("Accept", "application/json"), ("X-Default", "1")]),
            ..HttpOptions::default()
        };
        let (http, transport) = mock_http(options);
        transport.respond(200, "{}");

        let _ = http
            .get(
                "https://www.transifex.com/api/2/projects/",
                Some(headers(&[("accept", "text/plain")])),
                None,
            )
            .await?;

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Get);
        assert_eq!(request.header("Accept"), Some("text/plain"));
        assert_eq!(request.header("X-Default"), Some("1"));
        assert_eq!(request.headers.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_timeout_falls_back_to_options() -> anyhow::Result<()> {
        let options = HttpOptions {
            timeout: Some(Duration::from_secs(30)),
            user_agent: Some("tx/1.0".to_string()),
            ..HttpOptions::default()
        };
        let (http, transport) = mock_http(options);
        transport.respond(200, "");
        transport.respond(200, "");

        let _ = http.delete("http://localhost/a", None, None).await?;
        let _ = http
            .delete("http://localhost/b", None, Some(Duration::from_secs(2)))
            .await?;

        let requests = transport.requests();
        assert_eq!(requests[0].timeout, Some(Duration::from_secs(30)));
        assert_eq!(requests[1].timeout, Some(Duration::from_secs(2)));
        assert_eq!(requests[0].user_agent.as_deref(), Some("tx/1.0"));
        Ok(())
    }

    #[tokio::test]
    async fn test_methods_carry_bodies() -> anyhow::Result<()> {
        let (http, transport) = mock_http(HttpOptions::default());
        for _ in 0..8 {
            transport.respond(200, "");
        }

        let url = "http://localhost/resource";
        let _ = http.options(url, None, None).await?;
        let _ = http.head(url, None, None).await?;
        let _ = http.get(url, None, None).await?;
        let _ = http.post(url, "a=1", None, None).await?;
        let _ = http.put(url, "b=2", None, None).await?;
        let _ = http.delete(url, None, None).await?;
        let _ = http.trace(url, None, None).await?;
        let _ = http.patch(url, "c=3", None, None).await?;

        let seen: Vec<_> = transport
            .requests()
            .into_iter()
            .map(|r| (r.method, r.body.is_some()))
            .collect();
        assert_eq!(
            seen,
            vec![
                (Method::Options, false),
                (Method::Head, false),
                (Method::Get, false),
                (Method::Post, true),
                (Method::Put, true),
                (Method::Delete, false),
                (Method::Trace, false),
                (Method::Patch, true),
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let (http, transport) = mock_http(HttpOptions::default());
        let err = http.get("not a url", None, None).await.unwrap_err();
        assert!(matches!(err, TxError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_setters() {
        let (mut http, _) = mock_http(HttpOptions::default());
        let _ = http
            .set_header("Authorization", "Basic abc")
            .set_timeout(Some(Duration::from_secs(5)))
            .set_user_agent(Some("agent".to_string()));

        assert_eq!(
            http.http_options().headers.get("Authorization").map(String::as_str),
            Some("Basic abc")
        );
        assert_eq!(http.http_options().timeout, Some(Duration::from_secs(5)));
        assert_eq!(http.http_options().user_agent.as_deref(), Some("agent"));
        assert!(http.http_options_mut().headers.contains_key("Authorization"));
    }
}
