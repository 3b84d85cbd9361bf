//! High-level pipeline API: file path + operation name → rendered result.
//!
//! [`MatrixService`] sequences every step and stops at the first failure:
//!
//! 1. Context check
//! 2. Operation name required
//! 3. File path validation
//! 4. Operation validation
//! 5. Content retrieval through the [`ContentProvider`]
//! 6. Matrix validation
//! 7. Operation execution
//!
//! # Example
//!
//! ```rust,ignore
//! use league_matrix::{MatrixService, RequestContext};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = MatrixService::from_dir(".");
//!     let result = service
//!         .process_matrix(&RequestContext::new(), "sum", "testdata/matrix1.csv")
//!         .await?;
//!     println!("{}", result);
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error};

use super::operations::{is_valid_operation, list_operations, operations_description, run_operation};
use crate::context::RequestContext;
use crate::error::{MatrixError, MatrixResult, ResultExt};
use crate::parser::{ContentProvider, FileContentProvider};
use crate::validation::{validate_file_path, validate_matrix};

/// Stateless matrix processing service.
///
/// Cheap to clone; every request runs independently.
#[derive(Clone)]
pub struct MatrixService {
    provider: Arc<dyn ContentProvider>,
}

impl MatrixService {
    pub fn new(provider: Arc<dyn ContentProvider>) -> Self {
        Self { provider }
    }

    /// Service reading files relative to `base_dir` with the default size ceiling.
    pub fn from_dir(base_dir: impl AsRef<Path>) -> Self {
        Self::new(Arc::new(FileContentProvider::new(base_dir)))
    }

    /// Names of every supported operation.
    pub fn list_operations(&self) -> Vec<&'static str> {
        list_operations()
    }

    /// Help text with a sample URL rooted at `base_url` and the operation names.
    pub fn operations_banner(&self, base_url: &str) -> String {
        operations_description(base_url)
    }

    /// Run `operation` on the matrix stored at `file_path`.
    pub async fn process_matrix(
        &self,
        ctx: &RequestContext,
        operation: &str,
        file_path: &str,
    ) -> MatrixResult<String> {
        ctx.check()?;

        if operation.is_empty() {
            return Err(MatrixError::invalid_input("operation parameter is required"));
        }

        validate_file_path(ctx, file_path)?;
        is_valid_operation(ctx, operation)?;

        let raw = self.provider.get_file_content(ctx, file_path).await?;
        let matrix = validate_matrix(ctx, &raw)?;
        debug!(
            operation,
            file_path,
            rows = matrix.rows(),
            cols = matrix.cols(),
            "matrix validated"
        );

        run_operation(ctx, &matrix, operation)
            .map_err(|e| {
                error!(operation, error = %e, "operation execution failed");
                e
            })
            .context(format!("operation '{}' failed", operation))
    }
}

impl std::fmt::Debug for MatrixService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixService").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::RawFileContent;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory provider that counts how often it is asked for content.
    struct StubProvider {
        result: fn() -> MatrixResult<RawFileContent>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn returning(result: fn() -> MatrixResult<RawFileContent>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ContentProvider for StubProvider {
        async fn get_file_content(
            &self,
            ctx: &RequestContext,
            _file_path: &str,
        ) -> MatrixResult<RawFileContent> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ctx.check()?;
            (self.result)()
        }
    }

    fn two_by_three() -> MatrixResult<RawFileContent> {
        Ok(RawFileContent::from(vec![vec!["1", "2", "3"], vec!["4", "5", "6"]]))
    }

    fn two_by_two() -> MatrixResult<RawFileContent> {
        Ok(RawFileContent::from(vec![vec!["2", "3"], vec!["4", "5"]]))
    }

    async fn process(
        provider: &Arc<StubProvider>,
        operation: &str,
        file_path: &str,
    ) -> MatrixResult<String> {
        MatrixService::new(provider.clone())
            .process_matrix(&RequestContext::new(), operation, file_path)
            .await
    }

    #[tokio::test]
    async fn test_sum() {
        let provider = StubProvider::returning(two_by_three);
        assert_eq!(process(&provider, "sum", "testdata/m.csv").await.unwrap(), "21");
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_multiply() {
        let provider = StubProvider::returning(two_by_two);
        assert_eq!(process(&provider, "multiply", "testdata/m.csv").await.unwrap(), "120");
    }

    #[tokio::test]
    async fn test_invert() {
        let provider = StubProvider::returning(two_by_three);
        assert_eq!(
            process(&provider, "invert", "testdata/m.csv").await.unwrap(),
            "1,4\n2,5\n3,6"
        );
    }

    #[tokio::test]
    async fn test_unsupported_operation_skips_provider() {
        let provider = StubProvider::returning(two_by_three);
        let err = process(&provider, "divide", "testdata/m.csv").await.unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_operation_skips_provider() {
        let provider = StubProvider::returning(two_by_three);
        let err = process(&provider, "", "testdata/m.csv").await.unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
        assert!(err.to_string().contains("operation parameter is required"));
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_bad_path_skips_provider() {
        let provider = StubProvider::returning(two_by_three);
        for path in ["", "../secret.csv", "data/x.csv", "testdata/x.txt"] {
            let err = process(&provider, "sum", path).await.unwrap_err();
            assert!(err.is(ErrorKind::InvalidInput), "{:?}", path);
        }
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let provider = StubProvider::returning(two_by_three);
        let ctx = RequestContext::new();
        ctx.cancel();

        let err = MatrixService::new(provider.clone())
            .process_matrix(&ctx, "", "")
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(err.kind(), None);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_provider_errors_propagate_unchanged() {
        let not_found = StubProvider::returning(|| Err(MatrixError::not_found("no such file")));
        let err = process(&not_found, "sum", "testdata/m.csv").await.unwrap_err();
        assert!(matches!(err, MatrixError::NotFound(_)));

        let too_large = StubProvider::returning(|| Err(MatrixError::payload_too_large("2048 bytes")));
        let err = process(&too_large, "sum", "testdata/m.csv").await.unwrap_err();
        assert!(matches!(err, MatrixError::PayloadTooLarge(_)));
    }

    #[tokio::test]
    async fn test_invalid_content() {
        let ragged = StubProvider::returning(|| {
            Ok(RawFileContent::from(vec![vec!["1", "2", "3"], vec!["4", "5"]]))
        });
        let err = process(&ragged, "echo", "testdata/m.csv").await.unwrap_err();
        assert!(err.is(ErrorKind::UnprocessableEntity));

        let empty = StubProvider::returning(|| Ok(RawFileContent::default()));
        let err = process(&empty, "echo", "testdata/m.csv").await.unwrap_err();
        assert!(err.is(ErrorKind::UnprocessableEntity));
    }

    #[test]
    fn test_banner_lists_operations() {
        let service = MatrixService::new(StubProvider::returning(two_by_two));
        let banner = service.operations_banner("http://localhost:8080");
        assert!(banner.contains("/matrix/sum?file=testdata/matrix1.csv"));
        for name in service.list_operations() {
            assert!(banner.contains(name));
        }
    }
}
