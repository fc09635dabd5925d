//! Process-local document store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::models::{Collection, PageId, RecordProperties};
use crate::domain::ports::{DocumentStore, StoreError};

/// A store operation, as recorded by [`InMemoryDocumentStore::calls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `query_by_url` against a collection.
    Query(Collection),
    /// `create_record` in a collection.
    Create(Collection),
    /// `update_record` on any record.
    Update,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    id: PageId,
    collection: Collection,
    properties: RecordProperties,
}

/// In-memory [`DocumentStore`] for tests and dry runs.
///
/// Records keep insertion order, every call is logged, and individual
/// operations can be made to fail.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: Arc<RwLock<Vec<StoredRecord>>>,
    calls: Arc<RwLock<Vec<StoreOperation>>>,
    failures: Arc<RwLock<HashMap<StoreOperation, StoreError>>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `operation` fail with `error`.
    pub async fn fail_on(&self, operation: StoreOperation, error: StoreError) {
        self.failures.write().await.insert(operation, error);
    }

    /// Operations performed so far, in order.
    pub async fn calls(&self) -> Vec<StoreOperation> {
        self.calls.read().await.clone()
    }

    /// Forget the recorded operations.
    pub async fn reset_calls(&self) {
        self.calls.write().await.clear();
    }

    /// Properties of a stored record.
    pub async fn record(&self, id: &PageId) -> Option<RecordProperties> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.properties.clone())
    }

    /// Collection a record belongs to.
    pub async fn collection_of(&self, id: &PageId) -> Option<Collection> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| &r.id == id)
            .map(|r| r.collection)
    }

    /// Number of records in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| r.collection == collection)
            .count()
    }

    async fn begin(&self, operation: StoreOperation) -> Result<(), StoreError> {
        self.calls.write().await.push(operation);
        match self.failures.read().await.get(&operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn query_by_url(
        &self,
        collection: Collection,
        url: &str,
    ) -> Result<Vec<PageId>, StoreError> {
        self.begin(StoreOperation::Query(collection)).await?;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.collection == collection && r.properties.url() == Some(url))
            .map(|r| r.id.clone())
            .collect())
    }

    async fn create_record(
        &self,
        collection: Collection,
        properties: &RecordProperties,
    ) -> Result<PageId, StoreError> {
        self.begin(StoreOperation::Create(collection)).await?;
        let id = PageId::new(Uuid::new_v4().to_string());
        self.records.write().await.push(StoredRecord {
            id: id.clone(),
            collection,
            properties: properties.clone(),
        });
        Ok(id)
    }

    async fn update_record(
        &self,
        page_id: &PageId,
        properties: &RecordProperties,
    ) -> Result<(), StoreError> {
        self.begin(StoreOperation::Update).await?;
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| &r.id == page_id)
            .ok_or_else(|| StoreError::NotFound(format!("Could not find page with ID: {page_id}")))?;
        record.properties.merge(properties);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{property, PropertyValue};

    fn named(url: &str) -> RecordProperties {
        RecordProperties::new()
            .with(property::NAME, PropertyValue::Title("n".to_string()))
            .with(property::URL, PropertyValue::Url(url.to_string()))
    }

    #[tokio::test]
    async fn test_query_matches_exact_url_within_collection() {
        let store = InMemoryDocumentStore::new();
        let id = store
            .create_record(Collection::Users, &named("https://github.com/alice"))
            .await
            .unwrap();

        let hits = store
            .query_by_url(Collection::Users, "https://github.com/alice")
            .await
            .unwrap();
        assert_eq!(hits, vec![id]);

        assert!(store
            .query_by_url(Collection::Projects, "https://github.com/alice")
            .await
            .unwrap()
            .is_empty());
        assert!(store
            .query_by_url(Collection::Users, "https://github.com/alice/")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_unknown_page_is_not_found() {
        let store = InMemoryDocumentStore::new();
        let err = store
            .update_record(&PageId::new("missing"), &RecordProperties::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let store = InMemoryDocumentStore::new();
        store
            .fail_on(
                StoreOperation::Query(Collection::Issues),
                StoreError::Network("connection reset".to_string()),
            )
            .await;

        let err = store
            .query_by_url(Collection::Issues, "https://github.com/o/r/issues/1")
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Network(_)));
        assert_eq!(store.calls().await, vec![StoreOperation::Query(Collection::Issues)]);
    }
}
