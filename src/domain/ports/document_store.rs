use async_trait::async_trait;

use crate::domain::models::{Collection, PageId, RecordProperties};
use crate::domain::ports::errors::StoreError;

/// Port for the remote document database holding the mirrored records
///
/// Implementations must treat `url` as an exact-match key and must not
/// reorder or batch calls; the pipeline relies on each call completing
/// before the next is issued.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Ids of the records in `collection` whose `URL` property equals `url`
    async fn query_by_url(
        &self,
        collection: Collection,
        url: &str,
    ) -> Result<Vec<PageId>, StoreError>;

    /// Create a record and return its id
    async fn create_record(
        &self,
        collection: Collection,
        properties: &RecordProperties,
    ) -> Result<PageId, StoreError>;

    /// Overwrite the given properties of an existing record
    async fn update_record(
        &self,
        page_id: &PageId,
        properties: &RecordProperties,
    ) -> Result<(), StoreError>;
}
