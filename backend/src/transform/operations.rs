//! Matrix operations
//!
//! The closed set of operations that can be applied to a validated [`Matrix`].

use std::fmt;
use std::str::FromStr;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

use crate::context::RequestContext;
use crate::error::{MatrixError, MatrixResult};
use crate::models::Matrix;

/// All available matrix operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Arbitrary-precision sum of every element
    Sum,

    /// Arbitrary-precision product of every element
    Multiply,

    /// Render the matrix unchanged
    Echo,

    /// Transpose rows and columns
    Invert,

    /// All elements on a single comma-separated line
    Flatten,
}

impl Operation {
    /// Every operation, in display order.
    pub const ALL: [Operation; 5] = [
        Operation::Sum,
        Operation::Multiply,
        Operation::Echo,
        Operation::Invert,
        Operation::Flatten,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operation::Sum => "sum",
            Operation::Multiply => "multiply",
            Operation::Echo => "echo",
            Operation::Invert => "invert",
            Operation::Flatten => "flatten",
        }
    }

    /// Apply this operation to a matrix
    pub fn apply(self, matrix: &Matrix) -> MatrixResult<String> {
        if matrix.is_empty() {
            return Err(MatrixError::invalid_input("empty matrix"));
        }

        let rendered = match self {
            Operation::Sum => Self::apply_sum(matrix),
            Operation::Multiply => Self::apply_multiply(matrix),
            Operation::Echo => render_grid(matrix),
            Operation::Invert => render_grid(&matrix.transposed()),
            Operation::Flatten => join_values(matrix.elements()),
        };
        Ok(rendered)
    }

    fn apply_sum(matrix: &Matrix) -> String {
        matrix.elements().map(BigInt::from).sum::<BigInt>().to_string()
    }

    fn apply_multiply(matrix: &Matrix) -> String {
        matrix
            .elements()
            .map(BigInt::from)
            .product::<BigInt>()
            .to_string()
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = MatrixError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == name)
            .ok_or_else(|| MatrixError::invalid_input(format!("unsupported operation: {}", name)))
    }
}

fn join_values(values: impl Iterator<Item = i64>) -> String {
    values.map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

/// Rows on separate lines, no trailing newline.
fn render_grid(matrix: &Matrix) -> String {
    matrix
        .as_rows()
        .iter()
        .map(|row| join_values(row.iter().copied()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Names of every supported operation.
pub fn list_operations() -> Vec<&'static str> {
    Operation::ALL.iter().map(|op| op.as_str()).collect()
}

/// Check that `name` is a supported operation.
pub fn is_valid_operation(ctx: &RequestContext, name: &str) -> MatrixResult<Operation> {
    ctx.check()?;

    name.parse::<Operation>()
        .map_err(|_| MatrixError::invalid_input(format!("invalid operation: {}", name)))
}

/// Run the operation called `name` on `matrix`.
///
/// Unknown names are rejected here too, so callers that skip
/// [`is_valid_operation`] still get an InvalidInput error.
pub fn run_operation(ctx: &RequestContext, matrix: &Matrix, name: &str) -> MatrixResult<String> {
    ctx.check()?;

    let operation: Operation = name.parse()?;
    operation.apply(matrix)
}

/// Get a description of all available operations, with a sample URL.
pub fn operations_description(base_url: &str) -> String {
    format!(
        r#"Are you lost?
Try using this sample URL:
{}/matrix/sum?file=testdata/matrix1.csv

Other available operations:
{}"#,
        base_url.trim_end_matches('/'),
        list_operations().join(",")
    )
}
