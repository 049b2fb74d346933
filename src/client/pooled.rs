//! Pooled HTTP transport backed by a shared `reqwest` client
//!
//! Features:
//! - HTTP/2 negotiated over TLS when the server offers it
//! - Connection pooling with keep-alive
//! - TCP no-delay and keep-alive probes
//! - Per-request timeouts on top of a connect timeout

use crate::client::request::Request;
use crate::client::response::Response;
use crate::client::transport::{Driver, Transport};
use crate::client::HttpOptions;
use crate::error::{Result, TxError};
use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Connect timeout shared by the reqwest-backed transports
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport reusing connections through a pooled client
#[derive(Debug, Clone)]
pub struct PooledTransport {
    client: Client,
}

impl PooledTransport {
    /// Build the pooled client
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built (e.g., TLS backend
    /// initialisation failure).
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let mut builder = Client::builder()
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(CONNECT_TIMEOUT);

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TxError::NoTransport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Whether a pooled client can be used on this target
    #[must_use]
    pub const fn is_supported() -> bool {
        true
    }
}

#[async_trait]
impl Transport for PooledTransport {
    async fn request(&self, request: Request) -> Result<Response> {
        send(&self.client, request, Driver::Pooled).await
    }

    fn driver(&self) -> Driver {
        Driver::Pooled
    }
}

/// Send a request through a reqwest client and collect the full response
pub(crate) async fn send(client: &Client, request: Request, driver: Driver) -> Result<Response> {
    debug!(method = %request.method, url = %request.url, driver = driver.name(), "sending request");

    let mut builder = client.request(request.method.into(), request.url.clone());

    for (name, value) in &request.headers {
        if request.user_agent.is_some() && name.eq_ignore_ascii_case("User-Agent") {
            continue;
        }
        builder = builder.header(name.as_str(), value.as_str());
    }

    if let Some(user_agent) = &request.user_agent {
        builder = builder.header(USER_AGENT, user_agent.as_str());
    }

    if let Some(timeout) = request.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(body) = request.body.as_ref().filter(|body| !body.is_empty()) {
        let (bytes, default_type) = body.encode();
        if let Some(content_type) = default_type {
            if !request.has_header("Content-Type") {
                builder = builder.header(CONTENT_TYPE, content_type);
            }
        }
        builder = builder.body(bytes);
    }

    let response = builder.send().await?;
    let code = response.status().as_u16();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(Response {
        code,
        headers,
        body,
    })
}
