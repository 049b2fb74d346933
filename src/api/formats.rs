//! Format API

use crate::api::Transifex;
use crate::error::Result;
use serde_json::Value;

/// Supported file formats
#[derive(Debug, Clone, Copy)]
pub struct Formats<'a> {
    api: &'a Transifex,
}

impl<'a> Formats<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// List the file formats the server accepts
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_formats(&self) -> Result<Value> {
        self.api.get("/formats", 200).await
    }
}
