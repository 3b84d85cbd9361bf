//! CSV content provider.
//!
//! Resolves a request path to raw CSV rows. Shape and value checks are left to
//! [`crate::validation::validate_matrix`]: a file whose rows have different
//! lengths still parses here.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, error};

use crate::context::RequestContext;
use crate::error::{MatrixError, MatrixResult};
use crate::models::RawFileContent;

/// Default size ceiling for matrix files (1 KiB).
///
/// A 10×10 matrix of 7-digit numbers is about 800 bytes.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 1024;

/// Source of raw matrix content.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Fetch and parse the CSV file at `file_path`.
    ///
    /// Fails NotFound for an absent file and PayloadTooLarge for a file above
    /// the size ceiling.
    async fn get_file_content(
        &self,
        ctx: &RequestContext,
        file_path: &str,
    ) -> MatrixResult<RawFileContent>;
}

/// Reads CSV files from a base directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileContentProvider {
    base_dir: PathBuf,
    max_file_bytes: u64,
}

impl FileContentProvider {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }

    pub fn with_max_file_bytes(mut self, max_file_bytes: u64) -> Self {
        self.max_file_bytes = max_file_bytes;
        self
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_bytes
    }

    async fn read_bytes(&self, file_path: &str) -> MatrixResult<Vec<u8>> {
        let full_path = self.base_dir.join(file_path);

        let metadata = tokio::fs::metadata(&full_path).await.map_err(|e| {
            error!(file_path, error = %e, "failed to open file");
            open_error(e)
        })?;
        if !metadata.is_file() {
            return Err(MatrixError::not_found(format!(
                "failed to open file: {} is not a regular file",
                file_path
            )));
        }
        self.check_size(metadata.len())?;

        let bytes = tokio::fs::read(&full_path).await.map_err(|e| {
            error!(file_path, error = %e, "failed to read file");
            open_error(e)
        })?;
        // The file may have grown between stat and read.
        self.check_size(bytes.len() as u64)?;

        Ok(bytes)
    }

    fn check_size(&self, size: u64) -> MatrixResult<()> {
        if size > self.max_file_bytes {
            return Err(MatrixError::payload_too_large(format!(
                "file too large: {} bytes (maximum: {} bytes)",
                size, self.max_file_bytes
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentProvider for FileContentProvider {
    async fn get_file_content(
        &self,
        ctx: &RequestContext,
        file_path: &str,
    ) -> MatrixResult<RawFileContent> {
        ctx.check()?;

        let read = self.read_bytes(file_path);
        let bytes = match ctx.deadline() {
            Some(deadline) => tokio::select! {
                _ = ctx.token().cancelled() => return Err(MatrixError::Cancelled),
                result = tokio::time::timeout_at(deadline, read) => {
                    result.map_err(|_| MatrixError::DeadlineExceeded)??
                }
            },
            None => tokio::select! {
                _ = ctx.token().cancelled() => return Err(MatrixError::Cancelled),
                result = read => result?,
            },
        };

        let content = parse_csv(&bytes).map_err(|e| {
            error!(file_path, error = %e, "failed to parse CSV");
            e
        })?;
        debug!(file_path, rows = content.rows.len(), "read matrix file");

        Ok(content)
    }
}

fn open_error(e: std::io::Error) -> MatrixError {
    match e.kind() {
        std::io::ErrorKind::NotFound => MatrixError::not_found(format!("failed to open file: {}", e)),
        _ => MatrixError::internal(format!("failed to read file: {}", e)),
    }
}

/// Parse headerless, comma-delimited CSV into rows of fields.
///
/// Records may differ in length and fields are not trimmed.
pub fn parse_csv(bytes: &[u8]) -> MatrixResult<RawFileContent> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(|e| MatrixError::unprocessable(format!("failed to read CSV file: {}", e)))
        })
        .collect::<MatrixResult<Vec<_>>>()?;

    Ok(RawFileContent::new(rows))
}
