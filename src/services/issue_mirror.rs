//! Issue mirroring pipeline.
//!
//! Turns one [`IssueData`] into an Issue record linked to its User and
//! Project records. Stages run strictly in order, each awaiting the previous
//! one; the first failure short-circuits the rest and is reported with the
//! stage it came from. Records created by earlier stages are left in place
//! when a later stage fails.
//!
//! The duplicate check and the create are separate calls, so two concurrent
//! submissions of the same URL can both pass the check.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::errors::{MirrorError, MirrorResult, PipelineStage};
use crate::domain::models::{
    property, Collection, IssueData, PageId, PropertyValue, RecordProperties,
};
use crate::domain::ports::DocumentStore;

/// Upserts GitHub issues and their reporters/repositories into a document store.
#[derive(Clone)]
pub struct IssueMirrorService {
    store: Arc<dyn DocumentStore>,
}

impl IssueMirrorService {
    /// Create a service writing to `store`.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Mirror an issue and return the new Issue record id.
    ///
    /// Fails with [`MirrorError::DuplicateIssue`] when a record with the
    /// same URL already exists; store failures are returned unchanged,
    /// tagged with the failing stage.
    #[instrument(skip(self, issue), fields(issue_url = %issue.url))]
    pub async fn submit_issue(&self, issue: &IssueData) -> MirrorResult<PageId> {
        issue.validate()?;

        self.ensure_not_mirrored(&issue.url).await?;
        let user_id = self.resolve_user(issue).await?;
        let project_id = self.resolve_project(issue).await?;
        let issue_id = self.create_issue(issue, &user_id, &project_id).await?;
        self.link_self_reference(&issue_id).await?;

        info!(
            page_id = %issue_id,
            user_id = %user_id,
            project_id = %project_id,
            "issue mirrored"
        );
        Ok(issue_id)
    }

    async fn ensure_not_mirrored(&self, url: &str) -> MirrorResult<()> {
        let stage = PipelineStage::CheckExisting;
        let existing = self
            .store
            .query_by_url(Collection::Issues, url)
            .await
            .map_err(|source| MirrorError::Store { stage, source })?;

        if let Some(page_id) = existing.first() {
            warn!(page_id = %page_id, "issue already mirrored");
            return Err(MirrorError::DuplicateIssue(url.to_string()));
        }
        Ok(())
    }

    async fn resolve_user(&self, issue: &IssueData) -> MirrorResult<PageId> {
        self.find_or_create(
            PipelineStage::ResolveUser,
            Collection::Users,
            &issue.user.login,
            &issue.user.html_url,
        )
        .await
    }

    async fn resolve_project(&self, issue: &IssueData) -> MirrorResult<PageId> {
        self.find_or_create(
            PipelineStage::ResolveProject,
            Collection::Projects,
            &issue.repository.name,
            &issue.repository.html_url,
        )
        .await
    }

    /// Reuse the first record keyed by `url`, or create `{Name, URL}`.
    async fn find_or_create(
        &self,
        stage: PipelineStage,
        collection: Collection,
        name: &str,
        url: &str,
    ) -> MirrorResult<PageId> {
        let existing = self
            .store
            .query_by_url(collection, url)
            .await
            .map_err(|source| MirrorError::Store { stage, source })?;

        if let Some(page_id) = existing.into_iter().next() {
            debug!(%collection, %page_id, url, "reusing existing record");
            return Ok(page_id);
        }

        let properties = RecordProperties::new()
            .with(property::NAME, PropertyValue::Title(name.to_string()))
            .with(property::URL, PropertyValue::Url(url.to_string()));

        let page_id = self
            .store
            .create_record(collection, &properties)
            .await
            .map_err(|source| MirrorError::Store { stage, source })?;

        info!(%collection, %page_id, name, url, "created record");
        Ok(page_id)
    }

    async fn create_issue(
        &self,
        issue: &IssueData,
        user_id: &PageId,
        project_id: &PageId,
    ) -> MirrorResult<PageId> {
        let properties = Self::issue_properties(issue, user_id, project_id);
        self.store
            .create_record(Collection::Issues, &properties)
            .await
            .map_err(|source| MirrorError::Store {
                stage: PipelineStage::CreateIssue,
                source,
            })
    }

    async fn link_self_reference(&self, issue_id: &PageId) -> MirrorResult<()> {
        let properties = RecordProperties::new().with(
            property::SELF_REFERENCE,
            PropertyValue::Relation(vec![issue_id.clone()]),
        );
        self.store
            .update_record(issue_id, &properties)
            .await
            .map_err(|source| MirrorError::Store {
                stage: PipelineStage::LinkSelfReference,
                source,
            })
    }

    fn issue_properties(
        issue: &IssueData,
        user_id: &PageId,
        project_id: &PageId,
    ) -> RecordProperties {
        RecordProperties::new()
            .with(property::NAME, PropertyValue::Title(issue.title.clone()))
            .with(property::URL, PropertyValue::Url(issue.url.clone()))
            .with(
                property::DESCRIPTION,
                PropertyValue::RichText(issue.description_or_default().to_string()),
            )
            .with(
                property::USER,
                PropertyValue::Relation(vec![user_id.clone()]),
            )
            .with(
                property::PROJECT,
                PropertyValue::Relation(vec![project_id.clone()]),
            )
    }
}
