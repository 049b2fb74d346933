//! Project language API
//!
//! Each project language has a team of coordinators, reviewers and
//! translators. Coordinators are mandatory whenever a language is created or
//! replaced.

use crate::api::{segment, Transifex};
use crate::error::{Result, TxError};
use serde::Serialize;
use serde_json::Value;

/// A language to add to a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewLanguage {
    /// Language code, e.g. `en_GB`
    pub language_code: String,
    /// Coordinator usernames; at least one is required
    pub coordinators: Vec<String>,
    /// Translator usernames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translators: Option<Vec<String>>,
    /// Reviewer usernames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<String>>,
    /// Mailing list address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
}

/// Replacement team for an existing project language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LanguageUpdate {
    /// Coordinator usernames; at least one is required
    pub coordinators: Vec<String>,
    /// Translator usernames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translators: Option<Vec<String>>,
    /// Reviewer usernames
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewers: Option<Vec<String>>,
    /// Mailing list address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
}

/// Team roles within a project language
#[derive(Debug, Clone, Copy)]
enum Role {
    Coordinators,
    Reviewers,
    Translators,
}

impl Role {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Coordinators => "coordinators",
            Self::Reviewers => "reviewers",
            Self::Translators => "translators",
        }
    }
}

/// Project language management
#[derive(Debug, Clone, Copy)]
pub struct Languages<'a> {
    api: &'a Transifex,
}

impl<'a> Languages<'a> {
    pub(crate) const fn new(api: &'a Transifex) -> Self {
        Self { api }
    }

    /// Add a language to a project
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] without coordinators, or an error
    /// if the server rejects the request.
    pub async fn create_language(
        &self,
        project: &str,
        language: &NewLanguage,
        skip_invalid_username: bool,
    ) -> Result<Value> {
        require_coordinators(&language.coordinators)?;

        let mut path = format!("/project/{}/languages/", segment(project));
        if skip_invalid_username {
            path.push_str("?skip_invalid_username");
        }
        self.api.post_json(&path, language, 201).await
    }

    /// Remove a language from a project
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn delete_language(&self, project: &str, lang: &str) -> Result<Value> {
        self.api.delete(&language_path(project, lang), 204).await
    }

    /// Coordinators of a project language
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_coordinators(&self, project: &str, lang: &str) -> Result<Value> {
        self.get_team(project, lang, Role::Coordinators).await
    }

    /// A project language, optionally with extended details
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_language(&self, project: &str, lang: &str, details: bool) -> Result<Value> {
        let mut path = language_path(project, lang);
        if details {
            path.push_str("?details");
        }
        self.api.get(&path, 200).await
    }

    /// Every language of a project
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_languages(&self, project: &str) -> Result<Value> {
        self.api
            .get(&format!("/project/{}/languages/", segment(project)), 200)
            .await
    }

    /// Reviewers of a project language
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_reviewers(&self, project: &str, lang: &str) -> Result<Value> {
        self.get_team(project, lang, Role::Reviewers).await
    }

    /// Translators of a project language
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server rejects it.
    pub async fn get_translators(&self, project: &str, lang: &str) -> Result<Value> {
        self.get_team(project, lang, Role::Translators).await
    }

    /// Replace the team of a project language
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] without coordinators, or an error
    /// if the server rejects the request.
    pub async fn update_language(
        &self,
        project: &str,
        lang: &str,
        update: &LanguageUpdate,
    ) -> Result<Value> {
        require_coordinators(&update.coordinators)?;
        self.api
            .put_json(&language_path(project, lang), update, 200)
            .await
    }

    /// Replace the coordinators of a project language
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] for an empty list, or an error if
    /// the server rejects the request.
    pub async fn update_coordinators(
        &self,
        project: &str,
        lang: &str,
        coordinators: &[String],
        skip_invalid_username: bool,
    ) -> Result<Value> {
        self.update_team(project, lang, Role::Coordinators, coordinators, skip_invalid_username)
            .await
    }

    /// Replace the reviewers of a project language
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] for an empty list, or an error if
    /// the server rejects the request.
    pub async fn update_reviewers(
        &self,
        project: &str,
        lang: &str,
        reviewers: &[String],
        skip_invalid_username: bool,
    ) -> Result<Value> {
        self.update_team(project, lang, Role::Reviewers, reviewers, skip_invalid_username)
            .await
    }

    /// Replace the translators of a project language
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidArgument`] for an empty list, or an error if
    /// the server rejects the request.
    pub async fn update_translators(
        &self,
        project: &str,
        lang: &str,
        translators: &[String],
        skip_invalid_username: bool,
    ) -> Result<Value> {
        self.update_team(project, lang, Role::Translators, translators, skip_invalid_username)
            .await
    }

    async fn get_team(&self, project: &str, lang: &str, role: Role) -> Result<Value> {
        let path = format!("{}{}/", language_path(project, lang), role.as_str());
        self.api.get(&path, 200).await
    }

    async fn update_team(
        &self,
        project: &str,
        lang: &str,
        role: Role,
        members: &[String],
        skip_invalid_username: bool,
    ) -> Result<Value> {
        if members.is_empty() {
            return Err(TxError::InvalidArgument(format!(
                "The {} list must contain at least one username.",
                role.as_str()
            )));
        }

        let mut path = format!("{}{}/", language_path(project, lang), role.as_str());
        if skip_invalid_username {
            path.push_str("?skip_invalid_username");
        }

        let mut data = serde_json::Map::new();
        let _ = data.insert(role.as_str().to_string(), Value::from(members.to_vec()));
        self.api.put_json(&path, &data, 200).await
    }
}

fn language_path(project: &str, lang: &str) -> String {
    format!("/project/{}/language/{}/", segment(project), segment(lang))
}

fn require_coordinators(coordinators: &[String]) -> Result<()> {
    if coordinators.is_empty() {
        return Err(TxError::InvalidArgument(
            "The coordinators list must contain at least one username.".to_string(),
        ));
    }
    Ok(())
}
