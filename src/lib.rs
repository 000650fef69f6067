//! Token-level structural diffing for markup sequences.
//!
//! Two documents are compared as flat sequences of [`Token`]s (element
//! boundaries, attributes, words, whitespace). The engine produces an edit
//! script of MATCH / INSERT / DELETE operations that reconstructs either
//! input exactly, via one of two algorithms:
//!
//! - [`MatrixProcessor`]: the full suffix-LCS similarity matrix plus a
//!   deterministic backtracking walk. O(n·m), exact.
//! - [`GreedyProcessor`]: Myers' O(ND) frontier search. Same minimal edit
//!   count, far cheaper on mostly-similar inputs.
//!
//! Both run behind a common-prefix/suffix [slicer](slicer::Slice), so
//! identical or near-identical inputs never pay for a matrix.
//!
//! ```
//! use sequin::{DiffConfig, Sequence, Token, action, diff_actions};
//!
//! let first: Sequence = [Token::open("p"), Token::word("hi"), Token::close("p")]
//!     .into_iter()
//!     .collect();
//! let second: Sequence = [Token::open("p"), Token::word("bye"), Token::close("p")]
//!     .into_iter()
//!     .collect();
//!
//! let actions = diff_actions(&first, &second, &DiffConfig::new())?;
//! assert!(action::is_applicable(&first, &second, &actions));
//! assert_eq!(action::apply(&first, &actions, true)?, second);
//! # Ok::<(), sequin::DiffError>(())
//! ```
//!
//! Operations stream into a [`DiffHandler`]; [`ActionCollector`] gathers
//! them into grouped [`Action`]s with an apply/reverse algebra, and
//! [`OpWriter`] renders them as a compact one-line script.
//!
//! Structured logging is available behind the `tracing` cargo feature and
//! compiles to nothing otherwise.

#![warn(missing_docs)]
#![warn(clippy::std_instead_of_core)]

mod tracing_macros;
pub(crate) use tracing_macros::{debug, trace};

pub mod action;
pub mod config;
pub mod error;
pub mod handler;
pub mod lcs;
pub mod matrix;
pub mod myers;
pub mod sequence;
pub mod slicer;
pub mod text;
pub mod token;

pub use action::{Action, Operator};
pub use config::{DiffConfig, TextGranularity, WhitespaceProcessing};
pub use error::DiffError;
pub use handler::{ActionCollector, DiffHandler, OpWriter};
pub use lcs::MatrixProcessor;
pub use matrix::{FillOrder, Matrix, MatrixBuilder};
pub use myers::GreedyProcessor;
pub use sequence::{Namespaces, Sequence};
pub use slicer::Slice;
pub use text::tokenize_text;
pub use token::{QName, Token, TokenComparator, TokenIndex};

use rayon::prelude::*;

/// A diff algorithm: turns two token slices into an operation stream.
///
/// Implementations emit a script that visits every token of both inputs
/// exactly once, in order — MATCH and DELETE walk the first sequence,
/// MATCH and INSERT the second — so replaying it reconstructs either side.
pub trait Processor {
    /// Emits the edit script for `first` vs `second` to `handler`, without
    /// calling [`DiffHandler::start`] or [`DiffHandler::end`]. This is the
    /// hook the slicer-driven entry points compose around; most callers
    /// want [`diff`](Processor::diff) or the free functions instead.
    fn process(
        &self,
        first: &[Token],
        second: &[Token],
        cmp: TokenComparator,
        handler: &mut dyn DiffHandler,
    ) -> Result<(), DiffError>;

    /// Emits the full bracketed stream: `start`, the script, `end`.
    fn diff(
        &self,
        first: &[Token],
        second: &[Token],
        cmp: TokenComparator,
        handler: &mut dyn DiffHandler,
    ) -> Result<(), DiffError> {
        handler.start();
        self.process(first, second, cmp, handler)?;
        handler.end();
        Ok(())
    }
}

/// Compares two sequences with the default configuration and the matrix
/// algorithm, streaming operations into `handler`.
pub fn diff(
    first: &Sequence,
    second: &Sequence,
    handler: &mut dyn DiffHandler,
) -> Result<(), DiffError> {
    diff_with(
        first,
        second,
        &DiffConfig::new(),
        &MatrixProcessor::new(),
        handler,
    )
}

/// Compares two sequences with an explicit configuration and algorithm.
///
/// The common prefix and suffix are stripped first and re-attached as MATCH
/// runs around the processor's output; when slicing consumes one input
/// entirely the remainder of the other is emitted as pure INSERTs or
/// DELETEs and the processor never runs.
pub fn diff_with(
    first: &Sequence,
    second: &Sequence,
    config: &DiffConfig,
    processor: &dyn Processor,
    handler: &mut dyn DiffHandler,
) -> Result<(), DiffError> {
    let cmp = config.comparator();
    let slice = Slice::analyze(first.tokens(), second.tokens(), cmp);
    debug!(
        prefix = slice.prefix_len(),
        suffix = slice.suffix_len(),
        first = first.len(),
        second = second.len(),
        "sliced"
    );

    handler.start();
    for token in &first.tokens()[..slice.prefix_len()] {
        handler.handle(Operator::Match, token);
    }

    let middle_first = slice.middle(first.tokens());
    let middle_second = slice.middle(second.tokens());
    match (middle_first.is_empty(), middle_second.is_empty()) {
        (true, true) => {}
        (true, false) => {
            for token in middle_second {
                handler.handle(Operator::Insert, token);
            }
        }
        (false, true) => {
            for token in middle_first {
                handler.handle(Operator::Delete, token);
            }
        }
        (false, false) => processor.process(middle_first, middle_second, cmp, handler)?,
    }

    let suffix_start = first.len() - slice.suffix_len();
    for token in &first.tokens()[suffix_start..] {
        handler.handle(Operator::Match, token);
    }
    handler.end();
    Ok(())
}

/// Compares two sequences and returns the grouped action list.
pub fn diff_actions(
    first: &Sequence,
    second: &Sequence,
    config: &DiffConfig,
) -> Result<Vec<Action>, DiffError> {
    let mut collector = ActionCollector::new();
    diff_with(first, second, config, &MatrixProcessor::new(), &mut collector)?;
    Ok(collector.into_actions())
}

/// Runs many independent comparisons in parallel, returning one action
/// list per input pair, in input order.
///
/// Each comparison is self-contained; nothing is shared across the pool.
pub fn diff_batch(
    pairs: &[(Sequence, Sequence)],
    config: &DiffConfig,
) -> Result<Vec<Vec<Action>>, DiffError> {
    pairs
        .par_iter()
        .map(|(first, second)| diff_actions(first, second, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(tokens: impl IntoIterator<Item = Token>) -> Sequence {
        tokens.into_iter().collect()
    }

    #[test]
    fn test_diff_streams_sliced_script() {
        let first = seq([Token::open("a"), Token::word("x"), Token::close("a")]);
        let second = seq([Token::open("a"), Token::word("y"), Token::close("a")]);
        let mut writer = OpWriter::new();
        diff(&first, &second, &mut writer).unwrap();
        assert_eq!(writer.as_str(), r#"<a>-"x"+"y"</a>"#);
    }

    #[test]
    fn test_identical_inputs_short_circuit() {
        // The slicer covers everything; a processor that panics proves the
        // matrix path is never reached.
        struct Unreachable;
        impl Processor for Unreachable {
            fn process(
                &self,
                _: &[Token],
                _: &[Token],
                _: TokenComparator,
                _: &mut dyn DiffHandler,
            ) -> Result<(), DiffError> {
                panic!("processor must not run for identical inputs");
            }
        }

        let tokens = seq([Token::open("a"), Token::word("x"), Token::close("a")]);
        let mut writer = OpWriter::new();
        diff_with(
            &tokens,
            &tokens,
            &DiffConfig::new(),
            &Unreachable,
            &mut writer,
        )
        .unwrap();
        assert_eq!(writer.as_str(), r#"<a>"x"</a>"#);
    }

    #[test]
    fn test_insertion_only_middle_short_circuits() {
        struct Unreachable;
        impl Processor for Unreachable {
            fn process(
                &self,
                _: &[Token],
                _: &[Token],
                _: TokenComparator,
                _: &mut dyn DiffHandler,
            ) -> Result<(), DiffError> {
                panic!("processor must not run when one middle is empty");
            }
        }

        let first = seq([Token::open("a"), Token::close("a")]);
        let second = seq([Token::open("a"), Token::word("new"), Token::close("a")]);
        let mut writer = OpWriter::new();
        diff_with(
            &first,
            &second,
            &DiffConfig::new(),
            &Unreachable,
            &mut writer,
        )
        .unwrap();
        assert_eq!(writer.as_str(), r#"<a>+"new"</a>"#);
    }

    #[test]
    fn test_diff_actions_round_trips() {
        let first = seq([
            Token::open("p"),
            Token::word("one"),
            Token::whitespace(" "),
            Token::word("two"),
            Token::close("p"),
        ]);
        let second = seq([
            Token::open("p"),
            Token::word("one"),
            Token::whitespace(" "),
            Token::word("three"),
            Token::close("p"),
        ]);
        let actions = diff_actions(&first, &second, &DiffConfig::new()).unwrap();
        assert!(action::is_applicable(&first, &second, &actions));
        assert_eq!(action::apply(&first, &actions, true).unwrap(), second);
        assert_eq!(action::apply(&first, &actions, false).unwrap(), first);
    }

    #[test]
    fn test_ignore_whitespace_round_trips_modulo_comparator() {
        let first = seq([Token::word("a"), Token::whitespace(" "), Token::word("b")]);
        let second = seq([Token::word("a"), Token::whitespace("\n"), Token::word("b")]);
        let config = DiffConfig::ignore_whitespace();
        let actions = diff_actions(&first, &second, &config).unwrap();
        assert!(actions.iter().all(|a| a.operator() == Operator::Match));
        assert!(action::is_applicable_with(
            &first,
            &second,
            &actions,
            config.comparator()
        ));
    }

    #[test]
    fn test_diff_batch_preserves_order() {
        let a = seq([Token::word("a")]);
        let b = seq([Token::word("b")]);
        let pairs = vec![(a.clone(), a.clone()), (a.clone(), b.clone())];
        let results = diff_batch(&pairs, &DiffConfig::new()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].iter().all(|x| x.operator() == Operator::Match));
        assert!(results[1].iter().any(|x| x.operator().is_edit()));
    }
}
