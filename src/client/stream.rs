//! One-shot stream transport: a fresh HTTP/1.1 connection for every request

use crate::client::pooled::{send, CONNECT_TIMEOUT};
use crate::client::request::Request;
use crate::client::response::Response;
use crate::client::transport::{Driver, Transport};
use crate::client::HttpOptions;
use crate::error::{Result, TxError};
use async_trait::async_trait;
use reqwest::Client;

/// Transport that never keeps connections idle between requests
#[derive(Debug, Clone)]
pub struct StreamTransport {
    client: Client,
}

impl StreamTransport {
    /// Build the stream client
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be built.
    pub fn new(options: &HttpOptions) -> Result<Self> {
        let mut builder = Client::builder()
            .http1_only()
            .pool_max_idle_per_host(0)
            .connect_timeout(CONNECT_TIMEOUT);

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TxError::NoTransport(format!("Failed to create stream client: {e}")))?;

        Ok(Self { client })
    }

    /// Whether the stream transport can be used on this target
    #[must_use]
    pub const fn is_supported() -> bool {
        true
    }
}

#[async_trait]
impl Transport for StreamTransport {
    async fn request(&self, request: Request) -> Result<Response> {
        send(&self.client, request, Driver::Stream).await
    }

    fn driver(&self) -> Driver {
        Driver::Stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::request::Method;
    use reqwest::Url;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_each_request_opens_a_connection() -> anyhow::Result<()> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let accepted = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&accepted);

        let server = tokio::spawn(async move {
            for _ in 0..2 {
                let (mut sock, _) = listener.accept().await?;
                let _ = counter.fetch_add(1, Ordering::SeqCst);
                let mut buf = vec![0u8; 4096];
                let _ = sock.read(&mut buf).await?;
                sock.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok").await?;
            }
            Ok::<_, std::io::Error>(())
        });

        let transport = StreamTransport::new(&HttpOptions::default())?;
        let url = Url::parse(&format!("http://{addr}/"))?;
        for _ in 0..2 {
            let mut request = Request::new(Method::Get, url.clone());
            request.timeout = Some(Duration::from_secs(5));
            let response = transport.request(request).await?;
            assert_eq!(response.text(), "ok");
        }

        server.await??;
        assert_eq!(accepted.load(Ordering::SeqCst), 2);
        Ok(())
    }
}
