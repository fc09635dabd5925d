//! Port trait definitions (Hexagonal Architecture)
//!
//! - DocumentStore: query/create/update operations on the Issues, Users
//!   and Projects collections
//!
//! The Notion and in-memory adapters implement these contracts so the
//! pipeline stays independent of the remote API.

pub mod document_store;
pub mod errors;

pub use document_store::DocumentStore;
pub use errors::StoreError;
