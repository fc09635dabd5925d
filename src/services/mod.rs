//! Service layer
//!
//! Business logic coordinating the domain model and the document store port.

pub mod issue_mirror;

pub use issue_mirror::IssueMirrorService;
