//! Notion HTTP client.
//!
//! Wraps the three Notion REST endpoints the mirror needs (database query,
//! page create, page update) and implements [`DocumentStore`] on top of
//! them. No retries or rate limiting are applied: a failed call is
//! reported to the caller as a [`StoreError`].

use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::models::{property, Collection, NotionConfig, PageId, RecordProperties};
use crate::domain::ports::{DocumentStore, StoreError};

use super::models::{
    properties_json, CreatePageRequest, DatabaseParent, DatabaseQueryRequest, NotionErrorBody,
    PageObject, QueryResponse, UpdatePageRequest,
};

/// HTTP client for the Notion REST API.
///
/// All store methods map HTTP / network errors to [`StoreError`] using the
/// response status, keeping Notion's own error message.
#[derive(Clone)]
pub struct NotionClient {
    /// The underlying HTTP client.
    http: Client,
    /// API base URL without a trailing slash.
    base_url: String,
    /// Integration token.
    token: String,
    /// `Notion-Version` header value.
    version: String,
    issues_database_id: String,
    users_database_id: String,
    projects_database_id: String,
}

impl NotionClient {
    /// Create a client from configuration.
    pub fn new(config: &NotionConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            version: config.version.clone(),
            issues_database_id: config.issues_database_id.clone(),
            users_database_id: config.users_database_id.clone(),
            projects_database_id: config.projects_database_id.clone(),
        })
    }

    /// Database backing a logical collection.
    pub fn database_id(&self, collection: Collection) -> &str {
        match collection {
            Collection::Issues => &self.issues_database_id,
            Collection::Users => &self.users_database_id,
            Collection::Projects => &self.projects_database_id,
        }
    }

    /// Build an authorized request.
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.version)
    }

    /// Send a request and decode a successful JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, StoreError> {
        let resp = request.send().await.map_err(|e| {
            StoreError::Network(format!("Notion {operation} request failed: {e}"))
        })?;

        let status = resp.status();
        if !status.is_success() {
            let message = match resp.text().await {
                Ok(body) => serde_json::from_str::<NotionErrorBody>(&body)
                    .ok()
                    .and_then(|b| b.describe())
                    .unwrap_or(body),
                Err(e) => format!("failed to read error body: {e}"),
            };
            return Err(StoreError::from_status(
                status.as_u16(),
                format!("Notion {operation}: {message}"),
            ));
        }

        resp.json::<T>().await.map_err(|e| {
            StoreError::UnexpectedResponse(format!("Notion {operation} parse failed: {e}"))
        })
    }
}

impl fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.base_url)
            .field("version", &self.version)
            .field("issues_database_id", &self.issues_database_id)
            .field("users_database_id", &self.users_database_id)
            .field("projects_database_id", &self.projects_database_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DocumentStore for NotionClient {
    async fn query_by_url(
        &self,
        collection: Collection,
        url: &str,
    ) -> Result<Vec<PageId>, StoreError> {
        let path = format!("/v1/databases/{}/query", self.database_id(collection));
        let body = DatabaseQueryRequest::url_equals(property::URL, url);

        let resp: QueryResponse = self
            .send("query", self.request(Method::POST, &path).json(&body))
            .await?;

        debug!(
            %collection,
            url,
            matches = resp.results.len(),
            has_more = resp.has_more,
            "Notion query completed"
        );
        Ok(resp.results.into_iter().map(|p| PageId::new(p.id)).collect())
    }

    async fn create_record(
        &self,
        collection: Collection,
        properties: &RecordProperties,
    ) -> Result<PageId, StoreError> {
        let body = CreatePageRequest {
            parent: DatabaseParent {
                database_id: self.database_id(collection).to_string(),
            },
            properties: properties_json(properties),
        };

        let page: PageObject = self
            .send("create page", self.request(Method::POST, "/v1/pages").json(&body))
            .await?;

        debug!(%collection, page_id = %page.id, "Notion page created");
        Ok(PageId::new(page.id))
    }

    async fn update_record(
        &self,
        page_id: &PageId,
        properties: &RecordProperties,
    ) -> Result<(), StoreError> {
        let path = format!("/v1/pages/{page_id}");
        let body = UpdatePageRequest {
            properties: properties_json(properties),
        };

        let _page: PageObject = self
            .send("update page", self.request(Method::PATCH, &path).json(&body))
            .await?;

        debug!(%page_id, "Notion page updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> NotionConfig {
        NotionConfig {
            token: "secret_test".to_string(),
            issues_database_id: "db-issues".to_string(),
            users_database_id: "db-users".to_string(),
            projects_database_id: "db-projects".to_string(),
            base_url: "http://localhost:1234/".to_string(),
            ..NotionConfig::default()
        }
    }

    #[test]
    fn test_database_ids_per_collection() {
        let client = NotionClient::new(&config()).unwrap();
        assert_eq!(client.database_id(Collection::Issues), "db-issues");
        assert_eq!(client.database_id(Collection::Users), "db-users");
        assert_eq!(client.database_id(Collection::Projects), "db-projects");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = NotionClient::new(&config()).unwrap();
        assert_eq!(client.base_url, "http://localhost:1234");
    }

    #[test]
    fn test_debug_hides_token() {
        let client = NotionClient::new(&config()).unwrap();
        assert!(!format!("{client:?}").contains("secret_test"));
    }
}
