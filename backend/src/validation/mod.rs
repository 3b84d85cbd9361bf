//! Request and content validation.
//!
//! Two checks guard the pipeline:
//!
//! - [`validate_file_path`] - rejects unsafe or out-of-policy paths before any I/O
//! - [`validate_matrix`] - converts raw CSV rows into a rectangular [`Matrix`]
//!
//! # Example
//!
//! ```rust,ignore
//! use league_matrix::{validate_file_path, validate_matrix, RawFileContent, RequestContext};
//!
//! let ctx = RequestContext::new();
//! validate_file_path(&ctx, "testdata/matrix1.csv")?;
//!
//! let raw = RawFileContent::from(vec![vec!["1", "2"], vec!["3", "4"]]);
//! let matrix = validate_matrix(&ctx, &raw)?;
//! assert_eq!(matrix.rows(), 2);
//! ```

use crate::context::RequestContext;
use crate::error::{MatrixError, MatrixResult};
use crate::models::{Matrix, RawFileContent, MAX_COLS, MAX_ROWS};

/// Directory every requested file must live in.
pub const SANDBOX_PREFIX: &str = "testdata/";

/// Only CSV files are served.
pub const REQUIRED_EXTENSION: &str = ".csv";

/// Check that `path` is safe to hand to the content provider.
///
/// Checks run in a fixed order so the first failing rule decides the message.
pub fn validate_file_path(ctx: &RequestContext, path: &str) -> MatrixResult<()> {
    ctx.check()?;

    if path.is_empty() {
        return Err(MatrixError::invalid_input("file parameter is required"));
    }
    if path.contains("..") {
        return Err(MatrixError::invalid_input("path traversal not allowed"));
    }
    if !path.starts_with(SANDBOX_PREFIX) {
        return Err(MatrixError::invalid_input(format!(
            "only files in {} are allowed",
            SANDBOX_PREFIX
        )));
    }
    if !path.ends_with(REQUIRED_EXTENSION) {
        return Err(MatrixError::invalid_input(format!(
            "only {} files are supported",
            REQUIRED_EXTENSION
        )));
    }
    Ok(())
}

/// Convert raw CSV rows into a validated [`Matrix`].
pub fn validate_matrix(ctx: &RequestContext, raw: &RawFileContent) -> MatrixResult<Matrix> {
    ctx.check()?;

    let Some(first) = raw.rows.first() else {
        return Err(MatrixError::unprocessable("empty matrix data"));
    };

    let rows = raw.rows.len();
    let cols = first.len();

    if rows > MAX_ROWS {
        return Err(MatrixError::unprocessable(format!(
            "matrix exceeds maximum row limit: got {} rows, maximum is {}",
            rows, MAX_ROWS
        )));
    }
    if cols > MAX_COLS {
        return Err(MatrixError::unprocessable(format!(
            "matrix exceeds maximum column limit: got {} columns, maximum is {}",
            cols, MAX_COLS
        )));
    }

    for (i, row) in raw.rows.iter().enumerate() {
        if row.len() != cols {
            return Err(MatrixError::unprocessable(format!(
                "inconsistent row length at row {}: expected {} columns, got {}",
                i,
                cols,
                row.len()
            )));
        }
    }

    let data = raw
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.iter()
                .enumerate()
                .map(|(j, field)| parse_field(field, i, j))
                .collect::<MatrixResult<Vec<i64>>>()
        })
        .collect::<MatrixResult<Vec<Vec<i64>>>>()?;

    Ok(Matrix::from_rows(data))
}

/// Parse one field as a whole base-10 `i64`.
///
/// No trimming and no partial parses: `" 7"`, `"12abc"` and `"1.5"` all fail.
fn parse_field(field: &str, row: usize, col: usize) -> MatrixResult<i64> {
    field.parse::<i64>().map_err(|e| {
        MatrixError::unprocessable(format!(
            "invalid integer value at row {}, column {}: '{}' ({})",
            row, col, field, e
        ))
    })
}
