//! # League Matrix - CSV integer matrix operations over HTTP
//!
//! Reads a small CSV matrix from a sandboxed data directory, validates it and
//! applies one of five operations: `sum`, `multiply`, `echo`, `invert`
//! (transpose) or `flatten`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐   ┌──────────┐
//! │   Path   │──▶│ Operation│──▶│   CSV    │──▶│  Matrix  │──▶│ Execute  │
//! │ validate │   │ validate │   │ provider │   │ validate │   │ & render │
//! └──────────┘   └──────────┘   └──────────┘   └──────────┘   └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use league_matrix::{MatrixService, RequestContext};
//!
//! #[tokio::main]
//! async fn main() {
//!     let service = MatrixService::from_dir(".");
//!     let ctx = RequestContext::new();
//!     let out = service.process_matrix(&ctx, "invert", "testdata/matrix2.csv").await.unwrap();
//!     println!("{}", out);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Classified error types
//! - [`context`] - Per-request cancellation and deadline
//! - [`models`] - `Matrix` and `RawFileContent`
//! - [`parser`] - CSV content provider
//! - [`validation`] - Path and matrix validation
//! - [`transform`] - Operations and the request pipeline
//! - [`config`] - Server configuration
//! - [`api`] - HTTP API server

// Core modules
pub mod context;
pub mod error;
pub mod models;

// Content
pub mod parser;

// Validation
pub mod validation;

// Operations and pipeline
pub mod transform;

// Configuration
pub mod config;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Errors and context
// =============================================================================

pub use context::RequestContext;
pub use error::{
    ConfigError, ErrorKind, MatrixError, MatrixResult, ResultExt, ServerError, ServerResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Matrix, RawFileContent, MAX_COLS, MAX_ROWS};

// =============================================================================
// Re-exports - Content provider
// =============================================================================

pub use parser::{parse_csv, ContentProvider, FileContentProvider, DEFAULT_MAX_FILE_BYTES};

// =============================================================================
// Re-exports - Validation
// =============================================================================

pub use validation::{validate_file_path, validate_matrix};

// =============================================================================
// Re-exports - Operations and pipeline
// =============================================================================

pub use transform::{
    is_valid_operation, list_operations, operations_description, run_operation, MatrixService,
    Operation,
};

// =============================================================================
// Re-exports - Configuration and API
// =============================================================================

pub use config::ServerConfig;

// Server
pub mod server {
    pub use crate::api::server::{router, start_server, AppState};
}
