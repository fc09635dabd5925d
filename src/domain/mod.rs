//! Domain layer for the issue mirror
//!
//! This module contains the record model, the document store port and the
//! error types shared by the pipeline and its adapters.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{MirrorError, MirrorResult, PipelineStage};
