//! GitHub `issues` webhook payloads.
//!
//! Incoming bodies are read into permissive structs where every field is
//! optional, then validated into [`IssueData`]. A missing or mistyped field
//! becomes [`MirrorError::MalformedPayload`] naming the field.

use serde::Deserialize;
use serde_json::Value;

use crate::domain::errors::{MirrorError, MirrorResult};
use crate::domain::models::{GitHubUserRef, IssueData, RepositoryRef};

/// `X-GitHub-Event` value of issue events.
pub const ISSUES_EVENT: &str = "issues";

/// `action` value of newly opened issues.
pub const OPENED_ACTION: &str = "opened";

/// What to do with a delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDisposition {
    /// Not an opened issue; acknowledge without mirroring.
    Ignored,
    /// An opened issue to mirror.
    Mirror(IssueData),
}

/// Body of an `issues` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuesEventPayload {
    /// Event action, e.g. `opened` or `closed`.
    #[serde(default)]
    pub action: Option<String>,
    /// The issue.
    #[serde(default)]
    pub issue: Option<IssuePayload>,
    /// The repository the issue belongs to.
    #[serde(default)]
    pub repository: Option<RepositoryPayload>,
}

/// The `issue` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePayload {
    /// Issue title.
    #[serde(default)]
    pub title: Option<String>,
    /// URL to view the issue in the GitHub UI.
    #[serde(default)]
    pub html_url: Option<String>,
    /// Issue body (null when empty).
    #[serde(default)]
    pub body: Option<String>,
    /// The user that opened the issue.
    #[serde(default)]
    pub user: Option<UserPayload>,
}

/// The `issue.user` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    /// Login name.
    #[serde(default)]
    pub login: Option<String>,
    /// Profile URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// The `repository` object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryPayload {
    /// Repository name.
    #[serde(default)]
    pub name: Option<String>,
    /// Repository URL.
    #[serde(default)]
    pub html_url: Option<String>,
}

fn required(value: Option<String>, field: &str) -> MirrorResult<String> {
    value.ok_or_else(|| MirrorError::MalformedPayload(format!("missing field '{field}'")))
}

impl IssuesEventPayload {
    /// Validate the payload into pipeline input.
    pub fn into_issue_data(self) -> MirrorResult<IssueData> {
        let issue = self
            .issue
            .ok_or_else(|| MirrorError::MalformedPayload("missing field 'issue'".to_string()))?;
        let user = issue.user.ok_or_else(|| {
            MirrorError::MalformedPayload("missing field 'issue.user'".to_string())
        })?;
        let repository = self.repository.ok_or_else(|| {
            MirrorError::MalformedPayload("missing field 'repository'".to_string())
        })?;

        let data = IssueData {
            title: required(issue.title, "issue.title")?,
            url: required(issue.html_url, "issue.html_url")?,
            description: issue.body,
            user: GitHubUserRef {
                login: required(user.login, "issue.user.login")?,
                html_url: required(user.html_url, "issue.user.html_url")?,
            },
            repository: RepositoryRef {
                name: required(repository.name, "repository.name")?,
                html_url: required(repository.html_url, "repository.html_url")?,
            },
        };
        data.validate()?;
        Ok(data)
    }
}

/// Decide what to do with a delivery given its event name and raw body.
///
/// Only `issues` events with action `opened` are parsed beyond the action;
/// anything else is [`WebhookDisposition::Ignored`] regardless of shape.
pub fn classify(event: Option<&str>, body: &[u8]) -> MirrorResult<WebhookDisposition> {
    if event != Some(ISSUES_EVENT) {
        return Ok(WebhookDisposition::Ignored);
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| MirrorError::MalformedPayload(format!("body is not valid JSON: {e}")))?;

    if value.get("action").and_then(Value::as_str) != Some(OPENED_ACTION) {
        return Ok(WebhookDisposition::Ignored);
    }

    let payload: IssuesEventPayload = serde_json::from_value(value)
        .map_err(|e| MirrorError::MalformedPayload(e.to_string()))?;
    payload.into_issue_data().map(WebhookDisposition::Mirror)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opened() -> Value {
        json!({
            "action": "opened",
            "issue": {
                "title": "Bug X",
                "html_url": "https://github.com/o/r/issues/1",
                "body": null,
                "user": { "login": "alice", "html_url": "https://github.com/alice" }
            },
            "repository": { "name": "r", "html_url": "https://github.com/o/r" }
        })
    }

    fn classify_json(event: &str, value: &Value) -> MirrorResult<WebhookDisposition> {
        classify(Some(event), value.to_string().as_bytes())
    }

    #[test]
    fn test_opened_issue_is_mirrored() {
        let disposition = classify_json("issues", &opened()).unwrap();
        let WebhookDisposition::Mirror(data) = disposition else {
            panic!("expected Mirror, got {disposition:?}");
        };
        assert_eq!(data.title, "Bug X");
        assert_eq!(data.user.login, "alice");
        assert_eq!(data.repository.html_url, "https://github.com/o/r");
        assert!(data.description.is_none());
    }

    #[test]
    fn test_other_actions_and_events_are_ignored() {
        let mut closed = opened();
        closed["action"] = json!("closed");
        assert_eq!(
            classify_json("issues", &closed).unwrap(),
            WebhookDisposition::Ignored
        );
        assert_eq!(
            classify_json("push", &opened()).unwrap(),
            WebhookDisposition::Ignored
        );
        assert_eq!(classify(None, b"not json").unwrap(), WebhookDisposition::Ignored);
    }

    #[test]
    fn test_missing_user_login_is_malformed() {
        let mut value = opened();
        value["issue"]["user"]
            .as_object_mut()
            .unwrap()
            .remove("login");
        match classify_json("issues", &value) {
            Err(MirrorError::MalformedPayload(msg)) => {
                assert!(msg.contains("issue.user.login"), "got: {msg}");
            }
            other => panic!("expected MalformedPayload, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_repository_is_malformed() {
        let mut value = opened();
        value.as_object_mut().unwrap().remove("repository");
        assert!(matches!(
            classify_json("issues", &value),
            Err(MirrorError::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_wrong_type_and_invalid_json_are_malformed() {
        let mut value = opened();
        value["issue"]["title"] = json!(42);
        assert!(matches!(
            classify_json("issues", &value),
            Err(MirrorError::MalformedPayload(_))
        ));
        assert!(matches!(
            classify(Some("issues"), b"{not json"),
            Err(MirrorError::MalformedPayload(_))
        ));
    }
}
