//! Domain models for the matrix pipeline.
//!
//! - [`RawFileContent`] - CSV rows exactly as read, no shape guarantee
//! - [`Matrix`] - Validated rectangular grid of `i64`

use serde::{Deserialize, Serialize};

/// Maximum number of rows accepted by the validator.
pub const MAX_ROWS: usize = 10;

/// Maximum number of columns accepted by the validator.
pub const MAX_COLS: usize = 10;

// =============================================================================
// Raw File Content
// =============================================================================

/// Rows of string fields as parsed from a CSV file.
///
/// Rows may have different lengths; shape is checked by
/// [`crate::validation::validate_matrix`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFileContent {
    pub rows: Vec<Vec<String>>,
}

impl RawFileContent {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<S: Into<String>> From<Vec<Vec<S>>> for RawFileContent {
    fn from(rows: Vec<Vec<S>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }
}

// =============================================================================
// Matrix
// =============================================================================

/// A grid of signed integers, stored row-major.
///
/// [`crate::validation::validate_matrix`] is the checked way to build one and
/// guarantees a non-empty rectangular grid within [`MAX_ROWS`] × [`MAX_COLS`].
/// [`Matrix::from_rows`] skips those checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matrix {
    data: Vec<Vec<i64>>,
}

impl Matrix {
    pub fn from_rows(data: Vec<Vec<i64>>) -> Self {
        Self { data }
    }

    pub fn rows(&self) -> usize {
        self.data.len()
    }

    /// Length of the first row, or 0 for an empty matrix.
    pub fn cols(&self) -> usize {
        self.data.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_rows(&self) -> &[Vec<i64>] {
        &self.data
    }

    /// All elements in row-major order.
    pub fn elements(&self) -> impl Iterator<Item = i64> + '_ {
        self.data.iter().flatten().copied()
    }

    /// Column-major copy: `out[j][i] == self[i][j]`.
    pub fn transposed(&self) -> Matrix {
        let data = (0..self.cols())
            .map(|j| self.data.iter().filter_map(|row| row.get(j).copied()).collect())
            .collect();
        Matrix { data }
    }

    pub fn into_rows(self) -> Vec<Vec<i64>> {
        self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions() {
        let m = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert!(!m.is_empty());

        let empty = Matrix::default();
        assert_eq!(empty.rows(), 0);
        assert_eq!(empty.cols(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_elements_row_major() {
        let m = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(m.elements().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_transposed_non_square() {
        let m = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let t = m.transposed();
        assert_eq!(t.as_rows(), &[vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn test_raw_content_from_strs() {
        let raw = RawFileContent::from(vec![vec!["1", "2"], vec!["3"]]);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.rows[1], vec!["3".to_string()]);
        assert!(RawFileContent::default().is_empty());
    }
}
