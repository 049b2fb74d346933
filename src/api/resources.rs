//! Resource API

use crate::api::{segment, Content, ContentBody, Transifex};
use crate::error::Result;
use serde::Serialize;
use serde_json::Value;

/// A resource to create within a project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewResource {
    /// Display name
    pub name: String,
    /// URL slug
    pub slug: String,
    /// File format, e.g. `INI` or `PO`
    pub i18n_type: String,
    /// Whether the resource accepts translations
    pub accept_translations: Option<bool>,
    /// Resource category
    pub category: Option<String>,
    /// Resource priority
    pub priority: Option<u8>,
    /// Initial source content
    pub content: Option<Content>,
}

impl NewResource {
    /// Required resource fields
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        slug: impl Into<String>,
        i18n_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: slug.into(),
            i18n_type: i18n_type.into(),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct ResourceBody<'a> {
    name: &'a str,
    slug: &'a str,
    i18n_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    accept_translations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priority: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

/// Resource management
#[derive(Debug, Clone, Copy)]
pub struct Resources<'a> {
    api: &'a Transifex,
}

impl<'a> Resources<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// Create a resource
    ///
    /// # Errors
    ///
    /// Returns [`crate::TxError::InvalidArgument`] if file content cannot be
    /// read, or an error if the server rejects the request.
    pub async fn create_resource(&self, project: &str, resource: &NewResource) -> Result<Value> {
        let content = resource.content.as_ref().map(Content::load).transpose()?;
        let body = ResourceBody {
            name: &resource.name,
            slug: &resource.slug,
            i18n_type: &resource.i18n_type,
            accept_translations: resource.accept_translations,
            category: resource.category.as_deref(),
            priority: resource.priority,
            content,
        };

        self.api
            .post_json(&format!("/project/{}/resources/", segment(project)), &body, 201)
            .await
    }

    /// Delete a resource
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn delete_resource(&self, project: &str, resource: &str) -> Result<Value> {
        let path = format!("/project/{}/resource/{}", segment(project), segment(resource));
        self.api.delete(&path, 204).await
    }

    /// A resource, optionally with extended details
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_resource(&self, project: &str, resource: &str, details: bool) -> Result<Value> {
        let mut path = resource_path(project, resource);
        if details {
            path.push_str("?details");
        }
        self.api.get(&path, 200).await
    }

    /// Source content of a resource
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_resource_content(&self, project: &str, resource: &str) -> Result<Value> {
        let path = format!("{}content/", resource_path(project, resource));
        self.api.get(&path, 200).await
    }

    /// Every resource of a project
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_resources(&self, project: &str) -> Result<Value> {
        self.api
            .get(&format!("/project/{}/resources", segment(project)), 200)
            .await
    }

    /// Replace the source content of a resource
    ///
    /// # Errors
    ///
    /// Returns [`crate::TxError::InvalidArgument`] if file content cannot be
    /// read, or an error if the server rejects the request.
    pub async fn update_resource_content(
        &self,
        project: &str,
        resource: &str,
        content: &Content,
    ) -> Result<Value> {
        let body = ContentBody {
            content: content.load()?,
        };
        let path = format!("{}content/", resource_path(project, resource));
        self.api.put_json(&path, &body, 200).await
    }
}

fn resource_path(project: &str, resource: &str) -> String {
    format!("/project/{}/resource/{}/", segment(project), segment(resource))
}
