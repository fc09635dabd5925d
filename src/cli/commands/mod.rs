//! Command handlers.

pub mod serve;
pub mod submit;
