//! Implementation of the `issue-mirror submit` command.
//!
//! Replays a saved webhook body through the same filter, validation and
//! pipeline path the server uses.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::memory::InMemoryDocumentStore;
use crate::adapters::notion::NotionClient;
use crate::adapters::webhook::payload::ISSUES_EVENT;
use crate::adapters::webhook::{classify, WebhookDisposition};
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::domain::ports::DocumentStore;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::SecretScrubber;
use crate::services::IssueMirrorService;

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// File holding the webhook request body
    #[arg(long)]
    pub payload: PathBuf,

    /// Value of the X-GitHub-Event header
    #[arg(long, default_value = ISSUES_EVENT)]
    pub event: String,

    /// Run against an in-memory store instead of Notion
    #[arg(long)]
    pub dry_run: bool,

    /// Configuration file (defaults to ./issue-mirror.yaml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOutput {
    pub success: bool,
    pub mirrored: bool,
    pub dry_run: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_url: Option<String>,
}

impl CommandOutput for SubmitOutput {
    fn to_human(&self) -> String {
        let suffix = if self.dry_run { " (dry run)" } else { "" };
        match (&self.page_id, &self.issue_url) {
            (Some(page_id), Some(url)) => format!("Mirrored {url} as page {page_id}{suffix}"),
            _ => format!("Delivery ignored: not an opened issue{suffix}"),
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

fn load_config(args: &SubmitArgs) -> Result<Config> {
    if args.dry_run {
        let config = ConfigLoader::load_unvalidated(args.config.as_deref())?;
        ConfigLoader::validate_local(&config).context("Invalid configuration")?;
        return Ok(config);
    }
    match &args.config {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Run the payload through the pipeline and describe the outcome.
pub async fn run(args: &SubmitArgs) -> Result<SubmitOutput> {
    let body = tokio::fs::read(&args.payload)
        .await
        .with_context(|| format!("Failed to read payload {}", args.payload.display()))?;

    let issue = match classify(Some(&args.event), &body)? {
        WebhookDisposition::Ignored => {
            return Ok(SubmitOutput {
                success: true,
                mirrored: false,
                dry_run: args.dry_run,
                page_id: None,
                issue_url: None,
            });
        }
        WebhookDisposition::Mirror(issue) => issue,
    };

    let config = load_config(args)?;
    let store: Arc<dyn DocumentStore> = if args.dry_run {
        Arc::new(InMemoryDocumentStore::new())
    } else {
        Arc::new(NotionClient::new(&config.notion)?)
    };

    let scrubber = SecretScrubber::try_new().context("Failed to compile scrubbing patterns")?;
    let page_id = IssueMirrorService::new(store)
        .submit_issue(&issue)
        .await
        .map_err(|err| anyhow::anyhow!(scrubber.scrub(&err.to_string())))?;

    Ok(SubmitOutput {
        success: true,
        mirrored: true,
        dry_run: args.dry_run,
        page_id: Some(page_id.to_string()),
        issue_url: Some(issue.url),
    })
}

pub async fn execute(args: SubmitArgs, json_mode: bool) -> Result<()> {
    let result = run(&args).await?;
    output(&result, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn payload_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    fn args(file: &tempfile::NamedTempFile) -> SubmitArgs {
        SubmitArgs {
            payload: file.path().to_path_buf(),
            event: ISSUES_EVENT.to_string(),
            dry_run: true,
            config: Some(PathBuf::from("/nonexistent/issue-mirror.yaml")),
        }
    }

    const OPENED: &str = r#"{
        "action": "opened",
        "issue": {
            "title": "Bug X",
            "html_url": "https://github.com/o/r/issues/1",
            "body": null,
            "user": { "login": "alice", "html_url": "https://github.com/alice" }
        },
        "repository": { "name": "r", "html_url": "https://github.com/o/r" }
    }"#;

    #[tokio::test]
    async fn test_dry_run_mirrors_opened_issue() {
        let file = payload_file(OPENED);
        let result = run(&args(&file)).await.unwrap();

        assert!(result.mirrored);
        assert!(result.dry_run);
        assert!(result.page_id.is_some());
        assert_eq!(
            result.issue_url.as_deref(),
            Some("https://github.com/o/r/issues/1")
        );
        assert!(result.to_human().starts_with("Mirrored https://github.com/o/r/issues/1"));
    }

    #[tokio::test]
    async fn test_closed_issue_is_ignored() {
        let file = payload_file(&OPENED.replace("opened", "closed"));
        let result = run(&args(&file)).await.unwrap();

        assert!(result.success);
        assert!(!result.mirrored);
        assert_eq!(result.to_json(), serde_json::json!({
            "success": true,
            "mirrored": false,
            "dryRun": true,
        }));
    }

    #[tokio::test]
    async fn test_malformed_payload_fails() {
        let file = payload_file("{not json");
        assert!(run(&args(&file)).await.is_err());
    }
}
