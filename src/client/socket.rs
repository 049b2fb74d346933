//! HTTP transport speaking HTTP/1.0 directly over TCP sockets
//!
//! Requests are framed by hand and responses decoded with
//! [`parse_response`]. `https` URLs are wrapped in TLS. Connections are
//! cached per `host:port`: a connection is only handed back to the cache
//! when the server kept it open (`Connection: keep-alive` with a delimited
//! body), and a cached connection is probed for EOF before it is reused.

use crate::client::request::{Body, Method, Request};
use crate::client::response::{find_header_end, parse_response, Response};
use crate::client::transport::{Driver, Transport};
use crate::client::HttpOptions;
use crate::error::{Result, TxError};
use async_trait::async_trait;
use reqwest::Url;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;
use tracing::{debug, trace};

/// Timeout applied when a request carries none
pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(60);

/// Bytes read from the socket per call
const READ_CHUNK_SIZE: usize = 4096;

/// HTTP transport class for using sockets directly
#[derive(Debug)]
pub struct SocketTransport {
    /// Idle connections keyed by `host:port`
    connections: Mutex<HashMap<String, Connection>>,
    /// Client settings for `https` connections
    tls: Arc<ClientConfig>,
}

/// An open connection, plain or TLS-wrapped
#[derive(Debug)]
enum Connection {
    Plain(TcpStream),
    Tls(Box<TlsStream<TcpStream>>),
}

impl Connection {
    const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }

    fn tcp(&self) -> &TcpStream {
        match self {
            Self::Plain(stream) => stream,
            Self::Tls(stream) => stream.get_ref().0,
        }
    }

    /// Probe for a peer that has closed an idle connection
    ///
    /// Pending bytes on a plain connection leave it unusable. On a TLS
    /// connection they may be session tickets, so only EOF counts there.
    async fn reached_eof(&self) -> bool {
        let mut probe = [0u8; 1];
        match tokio::time::timeout(Duration::ZERO, self.tcp().peek(&mut probe)).await {
            Err(_) => false,
            Ok(Ok(0) | Err(_)) => true,
            Ok(Ok(_)) => !self.is_tls(),
        }
    }

    async fn exchange(
        &mut self,
        payload: &[u8],
        method: Method,
        timeout: Duration,
    ) -> Result<Exchange> {
        match self {
            Self::Plain(stream) => send_and_receive(stream, payload, method, timeout).await,
            Self::Tls(stream) => send_and_receive(stream.as_mut(), payload, method, timeout).await,
        }
    }
}

/// Raw bytes read back for one request
struct Exchange {
    content: Vec<u8>,
    eof: bool,
}

impl SocketTransport {
    /// Create a socket transport trusting the bundled web PKI roots for
    /// `https`
    ///
    /// # Errors
    ///
    /// Returns [`TxError::NoTransport`] when TCP sockets are unavailable or
    /// the TLS client cannot be configured.
    pub fn new(_options: &HttpOptions) -> Result<Self> {
        if !Self::is_supported() {
            return Err(TxError::NoTransport(
                "Cannot use a socket transport when TCP sockets are not available".to_string(),
            ));
        }

        let mut roots = RootCertStore::empty();
        roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        Ok(Self::with_tls_config(Arc::new(client_config(roots)?)))
    }

    /// Create a socket transport with custom TLS client settings, e.g. a
    /// private certificate authority
    #[must_use]
    pub fn with_tls_config(tls: Arc<ClientConfig>) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            tls,
        }
    }

    /// Whether raw TCP sockets can be opened on this target
    #[must_use]
    pub const fn is_supported() -> bool {
        !cfg!(target_family = "wasm")
    }

    /// Number of idle connections currently cached
    pub async fn cached_connections(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Get a connection for the URL, reusing a cached one when allowed and
    /// still open
    ///
    /// Returns the cache key, the connection and whether it was reused.
    async fn connect(
        &self,
        url: &Url,
        timeout: Duration,
        allow_reuse: bool,
    ) -> Result<(String, Connection, bool)> {
        let tls = match url.scheme() {
            "http" => false,
            "https" => true,
            other => {
                return Err(TxError::UnsupportedScheme {
                    scheme: other.to_string(),
                    driver: Driver::Socket.name().to_string(),
                })
            }
        };

        let host = url
            .host_str()
            .ok_or_else(|| TxError::InvalidArgument(format!("URL has no host: {url}")))?;
        let port = url
            .port_or_known_default()
            .unwrap_or(if tls { 443 } else { 80 });
        let key = format!("{host}:{port}");

        if allow_reuse {
            if let Some(connection) = self.connections.lock().await.remove(&key) {
                if connection.is_tls() != tls {
                    trace!(connection = %key, "cached connection uses another scheme, closing");
                } else if connection.reached_eof().await {
                    trace!(connection = %key, "cached connection reached EOF, closing");
                } else {
                    trace!(connection = %key, "reusing cached connection");
                    return Ok((key, connection, true));
                }
            }
        }

        let connect_host = host.trim_start_matches('[').trim_end_matches(']');
        let connection_error = |reason: String| TxError::ConnectionError {
            host: key.clone(),
            reason: format!("Could not connect to resource: {url}: {reason}"),
        };

        let stream =
            match tokio::time::timeout(timeout, TcpStream::connect((connect_host, port))).await {
                Ok(Ok(stream)) => stream,
                Ok(Err(e)) => return Err(connection_error(e.to_string())),
                Err(_) => return Err(connection_error("timed out".to_string())),
            };

        // Small request writes, no reason to wait on Nagle
        if let Err(e) = stream.set_nodelay(true) {
            trace!(connection = %key, error = %e, "could not disable Nagle's algorithm");
        }

        if !tls {
            return Ok((key, Connection::Plain(stream), false));
        }

        let server_name = ServerName::try_from(connect_host.to_string())
            .map_err(|e| connection_error(format!("invalid TLS server name: {e}")))?;
        let connector = TlsConnector::from(Arc::clone(&self.tls));

        let stream = match tokio::time::timeout(timeout, connector.connect(server_name, stream)).await
        {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return Err(connection_error(format!("TLS handshake failed: {e}"))),
            Err(_) => return Err(connection_error("TLS handshake timed out".to_string())),
        };

        Ok((key, Connection::Tls(Box::new(stream)), false))
    }

    async fn check_in(&self, key: String, connection: Connection) {
        trace!(connection = %key, "caching keep-alive connection");
        let _ = self.connections.lock().await.insert(key, connection);
    }
}

#[async_trait]
impl Transport for SocketTransport {
    async fn request(&self, request: Request) -> Result<Response> {
        let timeout = request.timeout.unwrap_or(DEFAULT_SOCKET_TIMEOUT);
        let payload = frame_request(&request);

        debug!(method = %request.method, url = %request.url, driver = "socket", "sending request");

        let (key, mut connection, reused) = self.connect(&request.url, timeout, true).await?;
        let mut exchange = connection.exchange(&payload, request.method, timeout).await;

        // An idle keep-alive connection may have been closed by the server
        // without the EOF probe noticing; retry once on a fresh one.
        if reused && matches!(&exchange, Err(e) if is_stale_failure(e)) {
            trace!(connection = %key, "cached connection went stale, reconnecting");
            let (_, fresh, _) = self.connect(&request.url, timeout, false).await?;
            connection = fresh;
            exchange = connection.exchange(&payload, request.method, timeout).await;
        }

        let exchange = exchange?;
        let response = parse_response(&exchange.content)?;

        if !exchange.eof && keeps_alive(&response) {
            self.check_in(key, connection).await;
        }

        Ok(response)
    }

    fn driver(&self) -> Driver {
        Driver::Socket
    }
}

/// TLS client settings over the given roots, using the ring provider
fn client_config(roots: RootCertStore) -> Result<ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| TxError::NoTransport(format!("Failed to configure TLS: {e}")))?
        .with_root_certificates(roots)
        .with_no_client_auth();
    Ok(config)
}

/// Build the raw HTTP/1.0 request bytes
pub(crate) fn frame_request(request: &Request) -> Vec<u8> {
    let url = &request.url;

    let mut path = url.path().to_string();
    if let Some(query) = url.query() {
        path.push('?');
        path.push_str(query);
    }
    if path.is_empty() {
        path.push('/');
    }

    let mut headers = request.headers.clone();
    headers.retain(|name, _| !name.eq_ignore_ascii_case("Host"));

    let body = request
        .body
        .as_ref()
        .filter(|body| !body.is_empty())
        .map(Body::encode);

    if let Some((bytes, default_type)) = &body {
        if let Some(content_type) = default_type {
            if !request.has_header("Content-Type") {
                let _ = headers.insert("Content-Type".to_string(), (*content_type).to_string());
            }
        }
        headers.retain(|name, _| !name.eq_ignore_ascii_case("Content-Length"));
        let _ = headers.insert("Content-Length".to_string(), bytes.len().to_string());
    }

    if let Some(user_agent) = &request.user_agent {
        headers.retain(|name, _| !name.eq_ignore_ascii_case("User-Agent"));
        let _ = headers.insert("User-Agent".to_string(), user_agent.clone());
    }

    let mut head = format!(
        "{} {} HTTP/1.0\r\nHost: {}\r\n",
        request.method,
        path,
        host_header(url)
    );
    for (name, value) in &headers {
        let _ = write!(head, "{name}: {value}\r\n");
    }
    head.push_str("\r\n");

    let mut payload = head.into_bytes();
    if let Some((bytes, _)) = body {
        payload.extend_from_slice(&bytes);
    }
    payload
}

/// Host header value; the port is only included when it is not the default
fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

async fn send_and_receive<S>(
    stream: &mut S,
    payload: &[u8],
    method: Method,
    timeout: Duration,
) -> Result<Exchange>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let write = async {
        stream.write_all(payload).await?;
        stream.flush().await
    };
    match tokio::time::timeout(timeout, write).await {
        Ok(result) => result?,
        Err(_) => return Err(timed_out()),
    }

    let mut content = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];

    loop {
        if let Some(expected) = expected_length(&content, method) {
            if content.len() >= expected {
                content.truncate(expected);
                return Ok(Exchange {
                    content,
                    eof: false,
                });
            }
        }

        let read = match tokio::time::timeout(timeout, stream.read(&mut chunk)).await {
            Ok(Ok(read)) => read,
            // TLS peers that hang up without close_notify
            Ok(Err(e)) if e.kind() == ErrorKind::UnexpectedEof => 0,
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(timed_out()),
        };

        if read == 0 {
            if content.is_empty() {
                return Err(TxError::NotConnected);
            }
            return Ok(Exchange { content, eof: true });
        }

        content.extend_from_slice(&chunk[..read]);
    }
}

/// Total response size when it can be known before EOF
fn expected_length(content: &[u8], method: Method) -> Option<usize> {
    let end = find_header_end(content)?;
    let head_len = end + 4;
    let head = parse_response(&content[..head_len]).ok()?;

    if method == Method::Head || head.code == 204 || head.code == 304 {
        return Some(head_len);
    }

    head.header("content-length")
        .and_then(|len| len.trim().parse::<usize>().ok())
        .map(|len| head_len + len)
}

fn keeps_alive(response: &Response) -> bool {
    response
        .header("connection")
        .is_some_and(|value| value.to_ascii_lowercase().contains("keep-alive"))
}

fn is_stale_failure(err: &TxError) -> bool {
    matches!(err, TxError::NotConnected)
}

fn timed_out() -> TxError {
    TxError::Timeout("Server connection timed out.".to_string())
}
