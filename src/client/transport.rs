//! Transport abstraction and runtime driver registry

use crate::client::pooled::PooledTransport;
use crate::client::request::Request;
use crate::client::response::Response;
use crate::client::socket::SocketTransport;
use crate::client::stream::StreamTransport;
use crate::client::HttpOptions;
use crate::error::{Result, TxError};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Something that can carry a [`Request`] to a server and bring back the
/// [`Response`]
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send the request and wait for the complete response
    async fn request(&self, request: Request) -> Result<Response>;

    /// Driver this transport was created from
    fn driver(&self) -> Driver;
}

/// Transport implementations selectable at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Driver {
    /// Pooled, keep-alive client with TLS and HTTP/2 negotiation
    Pooled,
    /// Raw TCP socket speaking HTTP/1.0
    Socket,
    /// One connection per request, HTTP/1.1 only
    Stream,
}

impl Driver {
    /// Every driver, sorted by name
    pub const ALL: [Self; 3] = [Self::Pooled, Self::Socket, Self::Stream];

    /// Lower-case driver name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pooled => "pooled",
            Self::Socket => "socket",
            Self::Stream => "stream",
        }
    }

    /// Whether the driver can be used on this platform
    #[must_use]
    pub fn is_supported(self) -> bool {
        match self {
            Self::Pooled => PooledTransport::is_supported(),
            Self::Socket => SocketTransport::is_supported(),
            Self::Stream => StreamTransport::is_supported(),
        }
    }

    /// Construct a transport for this driver
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is unsupported or its client cannot be
    /// built.
    pub fn create(self, options: &HttpOptions) -> Result<Arc<dyn Transport>> {
        let transport: Arc<dyn Transport> = match self {
            Self::Pooled => Arc::new(PooledTransport::new(options)?),
            Self::Socket => Arc::new(SocketTransport::new(options)?),
            Self::Stream => Arc::new(StreamTransport::new(options)?),
        };
        Ok(transport)
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Driver {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|driver| driver.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TxError::InvalidArgument(format!("Unknown HTTP transport driver: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_names_sorted() {
        let names: Vec<_> = Driver::ALL.iter().map(|d| d.name()).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_driver_from_str() -> anyhow::Result<()> {
        assert_eq!("socket".parse::<Driver>()?, Driver::Socket);
        assert_eq!(" Pooled ".parse::<Driver>()?, Driver::Pooled);
        assert!("fopen".parse::<Driver>().is_err());
        Ok(())
    }

    #[test]
    fn test_create_reports_driver() -> anyhow::Result<()> {
        let transport = Driver::Socket.create(&HttpOptions::default())?;
        assert_eq!(transport.driver(), Driver::Socket);
        Ok(())
    }
}
