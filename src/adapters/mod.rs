//! Adapters
//!
//! Implementations of the domain ports and the inbound HTTP surface:
//! - `notion`: Notion REST API document store
//! - `memory`: in-memory document store for tests and dry runs
//! - `webhook`: GitHub webhook receiver (axum)

pub mod memory;
pub mod notion;
pub mod webhook;
