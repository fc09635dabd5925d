//! In-memory document store adapter.
//!
//! Backs the pipeline in tests and in `submit --dry-run`, where no Notion
//! workspace should be touched.

pub mod store;

pub use store::{InMemoryDocumentStore, StoreOperation};
