//! Integration test modules for hush

pub mod flush;
pub mod pipeline;
