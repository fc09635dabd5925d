//! Issue data accepted by the mirroring pipeline.

use serde::{Deserialize, Serialize};

use crate::domain::errors::{MirrorError, MirrorResult};

/// Stored in place of an empty or absent issue body.
pub const DEFAULT_DESCRIPTION: &str = "No description provided.";

/// Validated input of the upsert pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueData {
    /// Issue title.
    pub title: String,
    /// Issue URL in the GitHub UI; unique key of the Issues collection.
    pub url: String,
    /// Issue body, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// The user that opened the issue.
    pub user: GitHubUserRef,
    /// The repository the issue belongs to.
    pub repository: RepositoryRef,
}

/// Identity of a GitHub user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitHubUserRef {
    /// Login name, used as the User record title.
    pub login: String,
    /// Profile URL; unique key of the Users collection.
    pub html_url: String,
}

/// Identity of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Repository name, used as the Project record title.
    pub name: String,
    /// Repository URL; unique key of the Projects collection.
    pub html_url: String,
}

impl IssueData {
    /// Description to store, substituting [`DEFAULT_DESCRIPTION`] for an
    /// empty or missing body.
    pub fn description_or_default(&self) -> &str {
        match self.description.as_deref() {
            Some(body) if !body.is_empty() => body,
            _ => DEFAULT_DESCRIPTION,
        }
    }

    /// Check that every URL used as a lookup key is non-empty.
    pub fn validate(&self) -> MirrorResult<()> {
        let keys = [
            ("issue.html_url", &self.url),
            ("issue.user.html_url", &self.user.html_url),
            ("repository.html_url", &self.repository.html_url),
        ];
        for (field, value) in keys {
            if value.trim().is_empty() {
                return Err(MirrorError::MalformedPayload(format!(
                    "'{field}' must be a non-empty string"
                )));
            }
        }
        Ok(())
    }
}
