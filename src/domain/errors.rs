//! Domain errors for the issue mirror.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::domain::ports::errors::StoreError;

/// Ordered stages of the upsert pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    /// Look for an Issue record with the same URL.
    CheckExisting,
    /// Find or create the reporting user's record.
    ResolveUser,
    /// Find or create the repository's record.
    ResolveProject,
    /// Create the Issue record.
    CreateIssue,
    /// Point the Issue's self-reference at itself.
    LinkSelfReference,
}

impl PipelineStage {
    /// Snake-case stage name used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CheckExisting => "check_existing",
            Self::ResolveUser => "resolve_user",
            Self::ResolveProject => "resolve_project",
            Self::CreateIssue => "create_issue",
            Self::LinkSelfReference => "link_self_reference",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while mirroring an issue.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// An Issue record with this URL already exists.
    #[error("Issue already exists: {0}")]
    DuplicateIssue(String),

    /// The payload lacks a required field; the message names it.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// A store call failed.
    #[error("Stage {stage} failed: {source}")]
    Store {
        /// Stage that issued the call.
        stage: PipelineStage,
        /// The store's error, unchanged.
        #[source]
        source: StoreError,
    },
}

impl MirrorError {
    /// Stage that failed, for store errors.
    pub const fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::Store { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

/// Result of pipeline operations.
pub type MirrorResult<T> = Result<T, MirrorError>;
