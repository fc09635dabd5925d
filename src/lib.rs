//! Issue Mirror - GitHub issues into Notion
//!
//! Receives GitHub `issues` webhooks and, for every newly opened issue,
//! creates an Issue page in a Notion database linked to a User page (the
//! reporter) and a Project page (the repository), creating those on first
//! sight.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Issue and record models, errors, and the
//!   `DocumentStore` port
//! - **Service Layer** (`services`): The mirroring pipeline
//! - **Adapters** (`adapters`): Notion and in-memory stores, the webhook
//!   HTTP server
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use issue_mirror::{InMemoryDocumentStore, IssueMirrorService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let service = IssueMirrorService::new(Arc::new(InMemoryDocumentStore::new()));
//!     // service.submit_issue(&issue).await?;
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::memory::InMemoryDocumentStore;
pub use adapters::notion::NotionClient;
pub use adapters::webhook::WebhookHttpServer;
pub use domain::models::{
    Collection, Config, GitHubUserRef, IssueData, LoggingConfig, NotionConfig, PageId,
    PropertyValue, RecordProperties, RepositoryRef, ServerConfig,
};
pub use domain::ports::{DocumentStore, StoreError};
pub use domain::{MirrorError, MirrorResult, PipelineStage};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::logging::{LoggerImpl, SecretScrubber};
pub use services::IssueMirrorService;
