//! Language info API

use crate::api::{segment, Transifex};
use crate::error::Result;
use serde_json::Value;

/// Languages known to the server
#[derive(Debug, Clone, Copy)]
pub struct LanguageInfo<'a> {
    api: &'a Transifex,
}

impl<'a> LanguageInfo<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// Details of a single language
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_language(&self, lang: &str) -> Result<Value> {
        self.api
            .get(&format!("/language/{}/", segment(lang)), 200)
            .await
    }

    /// Every supported language
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_languages(&self) -> Result<Value> {
        self.api.get("/languages/", 200).await
    }
}
