//! GitHub webhook adapter.
//!
//! HTTP entry point of the mirror: validates deliveries, filters for opened
//! issues and hands them to the pipeline.

pub mod payload;
pub mod server;
pub mod signature;

pub use payload::{classify, IssuesEventPayload, WebhookDisposition};
pub use server::{WebhookHttpServer, WebhookState};
