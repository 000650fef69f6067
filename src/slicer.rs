//! Common prefix/suffix stripping.
//!
//! Most real edits touch a small region of a document; slicing the common
//! prefix and suffix off before running a quadratic algorithm turns the
//! typical comparison into a small-core problem with two linear scans of
//! overhead.

use crate::token::{Token, TokenComparator};

/// Lengths of the common prefix and suffix of two token slices.
///
/// The two never overlap: `prefix + suffix` is at most the shorter
/// sequence's length, with the prefix claiming shared tokens first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    prefix: usize,
    suffix: usize,
}

impl Slice {
    /// Computes the maximal non-overlapping common prefix and suffix under
    /// `cmp`.
    pub fn analyze(first: &[Token], second: &[Token], cmp: TokenComparator) -> Slice {
        let shorter = first.len().min(second.len());
        let prefix = first
            .iter()
            .zip(second)
            .take(shorter)
            .take_while(|(a, b)| cmp.matches(a, b))
            .count();
        let suffix = first
            .iter()
            .rev()
            .zip(second.iter().rev())
            .take(shorter - prefix)
            .take_while(|(a, b)| cmp.matches(a, b))
            .count();
        Slice { prefix, suffix }
    }

    /// Length of the common prefix.
    pub fn prefix_len(&self) -> usize {
        self.prefix
    }

    /// Length of the common suffix.
    pub fn suffix_len(&self) -> usize {
        self.suffix
    }

    /// The tokens of one input that fall between the common prefix and
    /// suffix.
    pub fn middle<'a>(&self, tokens: &'a [Token]) -> &'a [Token] {
        &tokens[self.prefix..tokens.len() - self.suffix]
    }

    /// Whether slicing consumed one input entirely (the middle of at least
    /// one side is empty, so no matrix is needed).
    pub fn covers(&self, tokens: &[Token]) -> bool {
        self.prefix + self.suffix >= tokens.len()
    }
}
