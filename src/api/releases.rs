//! Release API

use crate::api::{segment, Transifex};
use crate::error::{Result, TxError};
use serde::Serialize;
use serde_json::Value;

/// A release to create within a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewRelease {
    /// URL slug
    pub slug: String,
    /// Display name
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Slugs of the resources in the release
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
}

/// Changes to an existing release; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReleaseUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<Vec<String>>,
}

/// Release management
#[derive(Debug, Clone, Copy)]
pub struct Releases<'a> {
    api: &'a Transifex,
}

impl<'a> Releases<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// Every release of a project
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_releases(&self, project: &str) -> Result<Value> {
        self.api.get(&releases_path(project), 200).await
    }

    /// A single release
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_release(&self, project: &str, release: &str) -> Result<Value> {
        self.api.get(&release_path(project, release), 200).await
    }

    /// Create a release
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] without a slug or name, or an error
    /// if the server rejects the request.
    pub async fn create_release(&self, project: &str, release: &NewRelease) -> Result<Value> {
        if release.slug.is_empty() || release.name.is_empty() {
            return Err(TxError::InvalidArgument(
                "A release requires a slug and a name".to_string(),
            ));
        }
        self.api.post_json(&releases_path(project), release, 201).await
    }

    /// Update a release
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] when the update sets no field, or
    /// an error if the server rejects the request.
    pub async fn update_release(
        &self,
        project: &str,
        release: &str,
        update: &ReleaseUpdate,
    ) -> Result<Value> {
        if update == &ReleaseUpdate::default() {
            return Err(TxError::InvalidArgument(
                "There is no data to send to Transifex".to_string(),
            ));
        }
        self.api
            .put_json(&release_path(project, release), update, 200)
            .await
    }

    /// Delete a release
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn delete_release(&self, project: &str, release: &str) -> Result<Value> {
        self.api.delete(&release_path(project, release), 204).await
    }
}

fn releases_path(project: &str) -> String {
    format!("/project/{}/releases/", segment(project))
}

fn release_path(project: &str, release: &str) -> String {
    format!("/project/{}/release/{}/", segment(project), segment(release))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::client::Method;

    #[tokio::test]
    async fn test_list_and_get() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);
        transport.respond(200, SAMPLE_BODY);

        assert_eq!(api.releases().get_releases("joomla").await?, sample());
        assert_eq!(last_path(&transport), "/project/joomla/releases/");
        let _ = api.releases().get_release("joomla", "3.0").await?;
        assert_eq!(last_path(&transport), "/project/joomla/release/3.0/");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_release() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(201, SAMPLE_BODY);

        let release = NewRelease {
            slug: "3-0".to_string(),
            name: "3.0".to_string(),
            resources: vec!["core".to_string()],
            ..NewRelease::default()
        };
        let _ = api.releases().create_release("joomla", &release).await?;
        assert_eq!(transport.last_request().unwrap().method, Method::Post);
        assert_eq!(
            last_body(&transport),
            serde_json::json!({"slug": "3-0", "name": "3.0", "resources": ["core"]})
        );

        let err = api
            .releases()
            .create_release("joomla", &NewRelease::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidArgument(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);
        transport.respond(500, ERROR_BODY);

        let update = ReleaseUpdate {
            description: Some("Maintenance".to_string()),
            ..ReleaseUpdate::default()
        };
        let _ = api.releases().update_release("joomla", "3-0", &update).await?;
        assert_eq!(transport.last_request().unwrap().method, Method::Put);

        assert_generic_error(api.releases().delete_release("joomla", "3-0").await);
        assert_eq!(last_path(&transport), "/project/joomla/release/3-0/");

        let err = api
            .releases()
            .update_release("joomla", "3-0", &ReleaseUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidArgument(_)));
        Ok(())
    }
}
