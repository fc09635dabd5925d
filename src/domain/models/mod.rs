pub mod config;
pub mod issue;
pub mod record;

pub use config::{
    Config, LogFormat, LoggingConfig, NotionConfig, RotationPolicy, ServerConfig,
};
pub use issue::{GitHubUserRef, IssueData, RepositoryRef, DEFAULT_DESCRIPTION};
pub use record::{property, Collection, PageId, PropertyValue, RecordProperties};
