//! Translation strings API

use crate::api::{segment, Transifex};
use crate::error::Result;
use serde_json::Value;

/// Narrows [`TranslationStrings::get_strings`] to matching source strings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringFilter {
    /// Source string key
    pub key: Option<String>,
    /// Source string context
    pub context: Option<String>,
}

/// Individual translation strings of resources
#[derive(Debug, Clone, Copy)]
pub struct TranslationStrings<'a> {
    api: &'a Transifex,
}

impl<'a> TranslationStrings<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// Pseudo-localized strings of a resource
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_pseudolocalization_strings(
        &self,
        project: &str,
        resource: &str,
    ) -> Result<Value> {
        let path = format!(
            "/project/{}/resource/{}/pseudo/?pseudo_type=MIXED",
            segment(project),
            segment(resource)
        );
        self.api.get(&path, 200).await
    }

    /// Details of a source string identified by its hash
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_source_string_details(
        &self,
        project: &str,
        resource: &str,
        hash: &str,
    ) -> Result<Value> {
        let path = format!(
            "/project/{}/resource/{}/source/{}/",
            segment(project),
            segment(resource),
            segment(hash)
        );
        self.api.get(&path, 200).await
    }

    /// Translation strings of a resource in `lang`
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_strings(
        &self,
        project: &str,
        resource: &str,
        lang: &str,
        details: bool,
        filter: &StringFilter,
    ) -> Result<Value> {
        let mut path = format!(
            "/project/{}/resource/{}/translation/{}/strings/",
            segment(project),
            segment(resource),
            segment(lang)
        );

        let mut params = vec![];
        if details {
            params.push("details".to_string());
        }
        if let Some(key) = &filter.key {
            params.push(format!("key={}", urlencoding::encode(key)));
        }
        if let Some(context) = &filter.context {
            params.push(format!("context={}", urlencoding::encode(context)));
        }
        if !params.is_empty() {
            path = format!("{path}?{}", params.join("&"));
        }

        self.api.get(&path, 200).await
    }
}
