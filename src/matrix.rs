//! The similarity matrix and its builder.
//!
//! `matrix[i][j]` holds the length of the longest common token subsequence
//! of `first[i..n)` and `second[j..m)`; the boundary row `i == n` and column
//! `j == m` are zero. Storage uses 16-bit cells for small inputs and 32-bit
//! cells above [`Matrix::for_lengths`]'s size threshold. The backing choice
//! only affects memory; scores are identical either way, and callers never
//! pick it themselves.

use crate::debug;
use crate::token::{Token, TokenComparator};
use core::fmt;

/// Largest dimension (sequence length plus one) the narrow backing can
/// address without risking cell overflow.
const NARROW_LIMIT: usize = i16::MAX as usize;

/// Storage cell for the score grid.
trait Cell: Copy + Default {
    fn from_usize(value: usize) -> Self;
    fn to_usize(self) -> usize;
}

impl Cell for u16 {
    #[inline]
    fn from_usize(value: usize) -> Self {
        debug_assert!(value <= u16::MAX as usize);
        value as u16
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl Cell for u32 {
    #[inline]
    fn from_usize(value: usize) -> Self {
        debug_assert!(value <= u32::MAX as usize);
        value as u32
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

/// Row-major score grid, generic over cell width.
#[derive(Debug, Clone)]
struct Grid<C> {
    rows: usize,
    cols: usize,
    cells: Vec<C>,
}

impl<C: Cell> Grid<C> {
    fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![C::default(); rows * cols],
        }
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j].to_usize()
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: usize) {
        self.cells[i * self.cols + j] = C::from_usize(value);
    }
}

enum Backing {
    Narrow(Grid<u16>),
    Wide(Grid<u32>),
}

impl fmt::Debug for Backing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backing::Narrow(g) => write!(f, "Narrow({}x{})", g.rows, g.cols),
            Backing::Wide(g) => write!(f, "Wide({}x{})", g.rows, g.cols),
        }
    }
}

/// The suffix-LCS score matrix over two token sequences.
///
/// Construct through [`Matrix::for_lengths`] or [`MatrixBuilder::build`];
/// the factory picks a cell width wide enough for the given lengths, so
/// overflow is impossible by construction.
#[derive(Debug)]
pub struct Matrix {
    backing: Backing,
}

impl Matrix {
    /// An all-zero matrix sized for sequences of `first_len` and
    /// `second_len` tokens, with the cell width chosen from those lengths.
    pub fn for_lengths(first_len: usize, second_len: usize) -> Matrix {
        let rows = first_len + 1;
        let cols = second_len + 1;
        let backing = if rows > NARROW_LIMIT || cols > NARROW_LIMIT {
            Backing::Wide(Grid::new(rows, cols))
        } else {
            Backing::Narrow(Grid::new(rows, cols))
        };
        debug!(rows, cols, ?backing, "allocated matrix");
        Matrix { backing }
    }

    // Wide backing for inputs that would normally fit the narrow one; the
    // backing-equivalence tests compare the two cell widths on identical
    // inputs.
    #[cfg(test)]
    fn wide_for_lengths(first_len: usize, second_len: usize) -> Matrix {
        Matrix {
            backing: Backing::Wide(Grid::new(first_len + 1, second_len + 1)),
        }
    }

    /// Number of rows (first sequence length plus one).
    pub fn rows(&self) -> usize {
        match &self.backing {
            Backing::Narrow(g) => g.rows,
            Backing::Wide(g) => g.rows,
        }
    }

    /// Number of columns (second sequence length plus one).
    pub fn cols(&self) -> usize {
        match &self.backing {
            Backing::Narrow(g) => g.cols,
            Backing::Wide(g) => g.cols,
        }
    }

    /// The score at `(i, j)`: the LCS length of `first[i..]` vs
    /// `second[j..]`.
    ///
    /// # Panics
    ///
    /// Panics if `(i, j)` is out of bounds.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> usize {
        match &self.backing {
            Backing::Narrow(g) => g.get(i, j),
            Backing::Wide(g) => g.get(i, j),
        }
    }

    /// The LCS length of the two full sequences.
    pub fn lcs_length(&self) -> usize {
        self.get(0, 0)
    }

    /// Whether the 16-bit backing is active. Diagnostic only; scores do not
    /// depend on it.
    pub fn is_narrow(&self) -> bool {
        matches!(self.backing, Backing::Narrow(_))
    }

    /// Writes the two sequences' short forms and the full score grid to
    /// `out`, one matrix row per line. A debugging aid, driven by an
    /// explicit call rather than a global switch.
    pub fn dump(
        &self,
        first: &[Token],
        second: &[Token],
        out: &mut impl fmt::Write,
    ) -> fmt::Result {
        write!(out, "A:")?;
        for token in first {
            write!(out, " {token}")?;
        }
        writeln!(out)?;
        write!(out, "B:")?;
        for token in second {
            write!(out, " {token}")?;
        }
        writeln!(out)?;
        for i in 0..self.rows() {
            for j in 0..self.cols() {
                write!(out, "{:>4}", self.get(i, j))?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

/// Order in which the builder visits cells.
///
/// Both orders fill the same suffix-addressed scores; the forward order is
/// a re-indexed traversal that writes cell `(n - i, m - j)` while its loop
/// counters increase. The resulting matrices are numerically identical.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FillOrder {
    /// Iterate `(i, j)` downward from `(n, m)`.
    #[default]
    Reverse,
    /// Iterate loop counters upward from zero, addressing inversely.
    Forward,
}

/// Builds the similarity matrix by dynamic programming.
///
/// The comparison predicate is pluggable through [`TokenComparator`]; the
/// recurrence itself is fixed:
///
/// - `matrix[i][j] = matrix[i+1][j+1] + 1` when the tokens match
/// - `matrix[i][j] = max(matrix[i+1][j], matrix[i][j+1])` otherwise
#[derive(Debug, Clone, Default)]
pub struct MatrixBuilder {
    order: FillOrder,
}

impl MatrixBuilder {
    /// Builder using the default (reverse) fill order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder using the given fill order.
    pub fn with_order(order: FillOrder) -> Self {
        Self { order }
    }

    /// Builds the matrix for two token slices.
    pub fn build(&self, first: &[Token], second: &[Token], cmp: TokenComparator) -> Matrix {
        let mut matrix = Matrix::for_lengths(first.len(), second.len());
        match &mut matrix.backing {
            Backing::Narrow(grid) => fill(grid, first, second, cmp, self.order),
            Backing::Wide(grid) => fill(grid, first, second, cmp, self.order),
        }
        debug!(lcs = matrix.lcs_length(), order = ?self.order, "matrix built");
        matrix
    }
}

fn fill<C: Cell>(
    grid: &mut Grid<C>,
    first: &[Token],
    second: &[Token],
    cmp: TokenComparator,
    order: FillOrder,
) {
    match order {
        FillOrder::Reverse => fill_reverse(grid, first, second, cmp),
        FillOrder::Forward => fill_forward(grid, first, second, cmp),
    }
}

fn fill_reverse<C: Cell>(
    grid: &mut Grid<C>,
    first: &[Token],
    second: &[Token],
    cmp: TokenComparator,
) {
    let n = first.len();
    let m = second.len();
    // The boundary row and column stay zero.
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            let score = if cmp.matches(&first[i], &second[j]) {
                grid.get(i + 1, j + 1) + 1
            } else {
                grid.get(i + 1, j).max(grid.get(i, j + 1))
            };
            grid.set(i, j, score);
        }
    }
}

fn fill_forward<C: Cell>(
    grid: &mut Grid<C>,
    first: &[Token],
    second: &[Token],
    cmp: TokenComparator,
) {
    let n = first.len();
    let m = second.len();
    // Counters run upward; the cell written is (n - ci, m - cj), so every
    // dependency was produced by an earlier iteration.
    for ci in 1..=n {
        let i = n - ci;
        for cj in 1..=m {
            let j = m - cj;
            let score = if cmp.matches(&first[i], &second[j]) {
                grid.get(i + 1, j + 1) + 1
            } else {
                grid.get(i + 1, j).max(grid.get(i, j + 1))
            };
            grid.set(i, j, score);
        }
    }
}
