//! Translation API

use crate::api::{segment, Content, ContentBody, Transifex};
use crate::error::Result;
use serde_json::Value;

/// Translated content of resources
#[derive(Debug, Clone, Copy)]
pub struct Translations<'a> {
    api: &'a Transifex,
}

impl<'a> Translations<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// Translation of a resource into `lang`
    ///
    /// `mode` selects the server-side export mode, such as `reviewed` or
    /// `onlytranslated`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_translation(
        &self,
        project: &str,
        resource: &str,
        lang: &str,
        mode: Option<&str>,
    ) -> Result<Value> {
        let mut path = translation_path(project, resource, lang);
        if let Some(mode) = mode.filter(|mode| !mode.is_empty()) {
            path.push_str(&format!("?mode={}", urlencoding::encode(mode)));
        }
        self.api.get(&path, 200).await
    }

    /// Replace the translation of a resource into `lang`
    ///
    /// # Errors
    ///
    /// Returns [`crate::TxError::InvalidArgument`] if file content cannot be
    /// read, or an error if the server rejects the request.
    pub async fn update_translation(
        &self,
        project: &str,
        resource: &str,
        lang: &str,
        content: &Content,
    ) -> Result<Value> {
        let body = ContentBody {
            content: content.load()?,
        };
        let path = format!("{}/", translation_path(project, resource, lang));
        self.api.put_json(&path, &body, 200).await
    }
}

fn translation_path(project: &str, resource: &str, lang: &str) -> String {
    format!(
        "/project/{}/resource/{}/translation/{}",
        segment(project),
        segment(resource),
        segment(lang)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::client::Method;
    use crate::error::TxError;
    use std::fs;

    #[tokio::test]
    async fn test_get_translation() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);
        transport.respond(200, SAMPLE_BODY);

        let translations = api.translations();
        assert_eq!(
            translations
                .get_translation("joomla", "joomla-platform", "en_GB", None)
                .await?,
            sample()
        );
        assert_eq!(
            last_path(&transport),
            "/project/joomla/resource/joomla-platform/translation/en_GB"
        );

        let _ = translations
            .get_translation("joomla", "joomla-platform", "en_GB", Some("reviewed"))
            .await?;
        assert_eq!(
            last_path(&transport),
            "/project/joomla/resource/joomla-platform/translation/en_GB?mode=reviewed"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_get_translation_failure() {
        let (api, transport) = mock_api();
        transport.respond(500, ERROR_BODY);

        assert_generic_error(
            api.translations()
                .get_translation("joomla", "joomla-platform", "en_GB", None)
                .await,
        );
    }

    #[tokio::test]
    async fn test_update_translation_from_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("en_GB.ini");
        fs::write(&path, "TEST=\"Test\"")?;

        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);

        let _ = api
            .translations()
            .update_translation("joomla", "joomla-platform", "en_GB", &Content::File(path))
            .await?;

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Put);
        assert_eq!(
            last_path(&transport),
            "/project/joomla/resource/joomla-platform/translation/en_GB/"
        );
        assert_eq!(last_body(&transport), serde_json::json!({"content": "TEST=\"Test\""}));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_translation_missing_file() {
        let (api, transport) = mock_api();
        let content = Content::File("/nonexistent/en_GB.ini".into());

        let err = api
            .translations()
            .update_translation("joomla", "joomla-platform", "en_GB", &content)
            .await
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }
}
