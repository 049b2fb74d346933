//! Project API

use crate::api::{segment, Transifex};
use crate::error::{Result, TxError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Project license accepted by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum License {
    /// Closed source
    Proprietary,
    /// Permissive open source license
    PermissiveOpenSource,
    /// Any other open source license
    OtherOpenSource,
}

impl License {
    /// Name as sent to the server
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proprietary => "proprietary",
            Self::PermissiveOpenSource => "permissive_open_source",
            Self::OtherOpenSource => "other_open_source",
        }
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for License {
    type Err = TxError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "proprietary" => Ok(Self::Proprietary),
            "permissive_open_source" => Ok(Self::PermissiveOpenSource),
            "other_open_source" => Ok(Self::OtherOpenSource),
            other => Err(TxError::InvalidArgument(format!(
                "The license {other} is not valid, accepted license values are proprietary, permissive_open_source, and other_open_source"
            ))),
        }
    }
}

/// Data for a new project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewProject {
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// Short description
    pub description: String,
    /// Language code of the source strings
    pub source_language_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_join: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_up_resources: Option<bool>,
    /// Source repository, required for public projects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl NewProject {
    /// Required project fields
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        description: impl Into<String>,
        source_language_code: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            description: description.into(),
            source_language_code: source_language_code.into(),
            ..Self::default()
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.private.unwrap_or(false) && self.repository_url.is_none() {
            return Err(TxError::InvalidArgument(
                "A repository_url must be specified for public projects".to_string(),
            ));
        }
        Ok(())
    }
}

/// Changes to an existing project; unset fields are left untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trans_instructions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_join: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_up_resources: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

impl ProjectUpdate {
    /// Whether no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Project management
#[derive(Debug, Clone, Copy)]
pub struct Projects<'a> {
    api: &'a Transifex,
}

impl<'a> Projects<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// Create a project
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] for a public project without a
    /// repository URL, or an error if the server rejects the request.
    pub async fn create_project(&self, project: &NewProject) -> Result<Value> {
        project.validate()?;
        self.api.post_json("/projects/", project, 201).await
    }

    /// Delete a project
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn delete_project(&self, slug: &str) -> Result<Value> {
        self.api
            .delete(&format!("/project/{}", segment(slug)), 204)
            .await
    }

    /// Project information, optionally with extended details
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_project(&self, slug: &str, details: bool) -> Result<Value> {
        let mut path = format!("/project/{}/", segment(slug));
        if details {
            path.push_str("?details");
        }
        self.api.get(&path, 200).await
    }

    /// Every project visible to the caller
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_projects(&self) -> Result<Value> {
        self.api.get("/projects/", 200).await
    }

    /// Update a project
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] when the update sets no field, or
    /// an error if the server rejects the request.
    pub async fn update_project(&self, slug: &str, update: &ProjectUpdate) -> Result<Value> {
        if update.is_empty() {
            return Err(TxError::InvalidArgument(
                "There is no data to send to Transifex".to_string(),
            ));
        }
        self.api
            .put_json(&format!("/project/{}/", segment(slug)), update, 200)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::api::testing::*;
    use crate::client::Method;

    #[tokio::test]
    async fn test_create_project() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(201, SAMPLE_BODY);

        let project = NewProject {
            repository_url: Some("https://github.com/joomla/joomla-platform".to_string()),
            license: Some(License::PermissiveOpenSource),
            ..NewProject::new("Joomla Platform", "joomla-platform", "Joomla Platform", "en_GB")
        };
        assert_eq!(api.projects().create_project(&project).await?, sample());

        let request = transport.last_request().unwrap();
        assert_eq!(request.method, Method::Post);
        assert_eq!(last_path(&transport), "/projects/");
        let body = last_body(&transport);
        assert_eq!(body["slug"], "joomla-platform");
        assert_eq!(body["license"], "permissive_open_source");
        assert!(body.get("homepage").is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_create_public_project_requires_repository() {
        let (api, transport) = mock_api();
        let project = NewProject::new("Joomla", "joomla", "Joomla", "en_GB");

        let err = api.projects().create_project(&project).await.unwrap_err();
        assert!(matches!(err, TxError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_create_private_project_without_repository() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(201, SAMPLE_BODY);

        let project = NewProject {
            private: Some(true),
            ..NewProject::new("Joomla", "joomla", "Joomla", "en_GB")
        };
        let _ = api.projects().create_project(&project).await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_create_project_failure() {
        let (api, transport) = mock_api();
        transport.respond(500, ERROR_BODY);

        let project = NewProject {
            private: Some(true),
            ..NewProject::new("Joomla", "joomla", "Joomla", "en_GB")
        };
        assert_generic_error(api.projects().create_project(&project).await);
    }

    #[tokio::test]
    async fn test_delete_project() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(204, "");
        transport.respond(500, ERROR_BODY);

        assert_eq!(api.projects().delete_project("joomla-platform").await?, Value::Null);
        assert_eq!(last_path(&transport), "/project/joomla-platform");
        assert_generic_error(api.projects().delete_project("joomla-platform").await);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_project() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);
        transport.respond(200, SAMPLE_BODY);

        assert_eq!(api.projects().get_project("joomla-platform", true).await?, sample());
        assert_eq!(last_path(&transport), "/project/joomla-platform/?details");

        let _ = api.projects().get_project("joomla-platform", false).await?;
        assert_eq!(last_path(&transport), "/project/joomla-platform/");
        Ok(())
    }

    #[tokio::test]
    async fn test_get_projects() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);
        transport.respond(500, ERROR_BODY);

        assert_eq!(api.projects().get_projects().await?, sample());
        assert_eq!(last_path(&transport), "/projects/");
        assert_generic_error(api.projects().get_projects().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_project() -> anyhow::Result<()> {
        let (api, transport) = mock_api();
        transport.respond(200, SAMPLE_BODY);

        let update = ProjectUpdate {
            description: Some("Updated".to_string()),
            ..ProjectUpdate::default()
        };
        assert_eq!(api.projects().update_project("joomla", &update).await?, sample());
        assert_eq!(transport.last_request().unwrap().method, Method::Put);
        assert_eq!(last_body(&transport), serde_json::json!({"description": "Updated"}));
        Ok(())
    }

    #[tokio::test]
    async fn test_update_project_requires_data() {
        let (api, transport) = mock_api();
        let err = api
            .projects()
            .update_project("joomla", &ProjectUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, TxError::InvalidArgument(_)));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn test_license_parse() {
        assert_eq!("proprietary".parse::<License>().ok(), Some(License::Proprietary));
        assert_eq!(
            "other_open_source".parse::<License>().ok(),
            Some(License::OtherOpenSource)
        );
        assert!(matches!("gpl".parse::<License>(), Err(TxError::InvalidArgument(_))));
    }
}
