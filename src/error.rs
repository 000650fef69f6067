//! Error type for the diff engine.

use thiserror::Error;

/// Errors produced by the diff engine.
///
/// A comparison either completes with a fully self-consistent operation
/// stream or fails before producing output; there is no partial-failure
/// mode. Contract violations that indicate programming errors (empty token
/// names, malformed text runs) panic at construction instead; see the
/// `# Panics` sections on the token constructors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DiffError {
    /// The matrix handed to the backtracking walk does not cover the
    /// sequences being compared.
    #[error(
        "matrix is {rows}x{cols} but sequences have lengths {first_len} and {second_len}"
    )]
    DimensionMismatch {
        /// Rows in the matrix.
        rows: usize,
        /// Columns in the matrix.
        cols: usize,
        /// Length of the first sequence.
        first_len: usize,
        /// Length of the second sequence.
        second_len: usize,
    },

    /// An action list was replayed against a base sequence it was not
    /// computed from.
    #[error("edit script does not apply at token {index}: expected {expected}, found {found}")]
    CannotApply {
        /// Index into the base sequence where replay diverged.
        index: usize,
        /// Short form of the token the script expected, or "end of sequence".
        expected: String,
        /// Short form of the token actually present, or "end of sequence".
        found: String,
    },
}
