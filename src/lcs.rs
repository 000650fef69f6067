//! Matrix-backtracking diff.
//!
//! Builds the full similarity matrix and walks it from `(0, 0)`, emitting
//! MATCH on comparator equality and otherwise following the direction with
//! the larger remaining score. The script is optimal in edit count for the
//! comparator used to build the matrix.

use crate::Processor;
use crate::action::Operator;
use crate::error::DiffError;
use crate::handler::DiffHandler;
use crate::matrix::{FillOrder, Matrix, MatrixBuilder};
use crate::token::{Token, TokenComparator};
use crate::trace;

/// Diff algorithm backed by the full similarity matrix.
///
/// O(n·m) time and space; exact. Prefer [`GreedyProcessor`] for long,
/// mostly-similar sequences.
///
/// [`GreedyProcessor`]: crate::myers::GreedyProcessor
#[derive(Debug, Clone, Default)]
pub struct MatrixProcessor {
    order: FillOrder,
}

impl MatrixProcessor {
    /// Processor using the default fill order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor using the given fill order. Scores and output are
    /// identical for both orders.
    pub fn with_order(order: FillOrder) -> Self {
        Self { order }
    }
}

impl Processor for MatrixProcessor {
    fn process(
        &self,
        first: &[Token],
        second: &[Token],
        cmp: TokenComparator,
        handler: &mut dyn DiffHandler,
    ) -> Result<(), DiffError> {
        let matrix = MatrixBuilder::with_order(self.order).build(first, second, cmp);
        backtrack(&matrix, first, second, cmp, handler)
    }
}

/// Walks a prebuilt matrix and emits the edit script to `handler`.
///
/// From `(i, j)`: comparator-equal tokens are a MATCH (carrying the first
/// sequence's token); otherwise the walk steps toward the larger of
/// `matrix[i+1][j]` (DELETE) and `matrix[i][j+1]` (INSERT). On an exact
/// score tie it prefers advancing the side whose next token closes an
/// element, and deletes first when neither or both do, so output is
/// deterministic.
///
/// Returns [`DiffError::DimensionMismatch`] when the matrix was not built
/// for sequences of these lengths.
pub fn backtrack(
    matrix: &Matrix,
    first: &[Token],
    second: &[Token],
    cmp: TokenComparator,
    handler: &mut dyn DiffHandler,
) -> Result<(), DiffError> {
    let n = first.len();
    let m = second.len();
    if matrix.rows() != n + 1 || matrix.cols() != m + 1 {
        return Err(DiffError::DimensionMismatch {
            rows: matrix.rows(),
            cols: matrix.cols(),
            first_len: n,
            second_len: m,
        });
    }

    let mut i = 0;
    let mut j = 0;
    while i < n && j < m {
        if cmp.matches(&first[i], &second[j]) {
            trace!(i, j, "match");
            handler.handle(Operator::Match, &first[i]);
            i += 1;
            j += 1;
        } else {
            let down = matrix.get(i + 1, j);
            let right = matrix.get(i, j + 1);
            let delete = if down != right {
                down > right
            } else {
                tie_break(&first[i], &second[j])
            };
            if delete {
                handler.handle(Operator::Delete, &first[i]);
                i += 1;
            } else {
                handler.handle(Operator::Insert, &second[j]);
                j += 1;
            }
        }
    }
    for token in &first[i..] {
        handler.handle(Operator::Delete, token);
    }
    for token in &second[j..] {
        handler.handle(Operator::Insert, token);
    }
    Ok(())
}

/// Tie-break for equal remaining scores: advance the side whose next token
/// closes an element, keeping structural tokens aligned with their subtree;
/// otherwise delete first. Returns true to delete.
fn tie_break(first_next: &Token, second_next: &Token) -> bool {
    first_next.is_close_element() || !second_next.is_close_element()
}
