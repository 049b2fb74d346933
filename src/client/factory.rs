//! Runtime selection of an HTTP transport driver

use crate::client::transport::{Driver, Transport};
use crate::client::{Http, HttpOptions};
use crate::error::{Result, TxError};
use std::sync::Arc;
use tracing::{debug, warn};

/// Names of every known transport driver, sorted
#[must_use]
pub fn http_transports() -> Vec<&'static str> {
    let mut names: Vec<_> = Driver::ALL.iter().map(|driver| driver.name()).collect();
    names.sort_unstable();
    names
}

/// First usable transport from the preferred driver names
///
/// `None` tries every driver in [`http_transports`] order. Unknown names and
/// unsupported drivers are skipped, as are drivers whose construction fails.
/// Returns `None` when nothing is usable, including for an empty preference
/// list.
#[must_use]
pub fn available_driver<S: AsRef<str>>(
    options: &HttpOptions,
    preferred: Option<&[S]>,
) -> Option<Arc<dyn Transport>> {
    let candidates: Vec<Driver> = match preferred {
        None => Driver::ALL.to_vec(),
        Some(names) => names
            .iter()
            .filter_map(|name| match name.as_ref().parse::<Driver>() {
                Ok(driver) => Some(driver),
                Err(_) => {
                    debug!(driver = name.as_ref(), "ignoring unknown transport driver");
                    None
                }
            })
            .collect(),
    };

    candidates
        .into_iter()
        .filter(|driver| driver.is_supported())
        .find_map(|driver| match driver.create(options) {
            Ok(transport) => Some(transport),
            Err(e) => {
                warn!(driver = driver.name(), error = %e, "transport driver unavailable");
                None
            }
        })
}

/// Build an [`Http`] client on the first usable preferred driver
///
/// # Errors
///
/// Returns [`TxError::NoTransport`] when no driver is usable.
pub fn get_http<S: AsRef<str>>(options: HttpOptions, preferred: Option<&[S]>) -> Result<Http> {
    let transport = available_driver(&options, preferred).ok_or_else(|| {
        TxError::NoTransport("A valid transport could not be created for the HTTP client".to_string())
    })?;

    Ok(Http::with_transport(options, transport))
}
