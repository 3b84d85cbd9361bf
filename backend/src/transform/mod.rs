//! Transformation module.
//!
//! - Operations: the closed set of matrix operations and their dispatch
//! - Pipeline: the request orchestrator

pub mod operations;
pub mod pipeline;

pub use operations::*;
pub use pipeline::MatrixService;
