//! Notion document store adapter.
//!
//! Stores mirrored issues, users and projects as rows of three Notion
//! databases. Lookups use a `url` equality filter on the `URL` property;
//! records are created as database pages and patched in place.

pub mod client;
pub mod models;

pub use client::NotionClient;
