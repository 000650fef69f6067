//! Comparison configuration.
//!
//! A small value object passed explicitly to every comparison; there are no
//! process-wide toggles.

use crate::token::TokenComparator;

/// The unit size at which free text is split into tokens before comparison.
///
/// This drives [`tokenize_text`](crate::text::tokenize_text); the diff
/// engine itself never re-splits text it is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextGranularity {
    /// Each character becomes its own token.
    Character,
    /// Words and whitespace runs alternate as tokens.
    #[default]
    Word,
    /// A whole text run is a single token.
    Text,
}

/// How whitespace-only tokens participate in equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WhitespaceProcessing {
    /// Whitespace differences are significant, and whitespace tokens must
    /// not be dropped from output. Equivalent to [`Compare`] for equality.
    ///
    /// [`Compare`]: WhitespaceProcessing::Compare
    #[default]
    Preserve,
    /// Whitespace differences are significant; renderers may normalize.
    Compare,
    /// Any two whitespace tokens compare equal.
    Ignore,
}

/// Configuration for one comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffConfig {
    /// Text splitting granularity (a tokenizer concern).
    pub granularity: TextGranularity,
    /// Whitespace policy consulted by token equality.
    pub whitespace: WhitespaceProcessing,
}

impl DiffConfig {
    /// Default configuration: word granularity, whitespace preserved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration that ignores whitespace differences.
    pub fn ignore_whitespace() -> Self {
        Self {
            whitespace: WhitespaceProcessing::Ignore,
            ..Self::default()
        }
    }

    /// The token equality predicate implied by this configuration.
    pub fn comparator(&self) -> TokenComparator {
        TokenComparator::new(self.whitespace)
    }
}
