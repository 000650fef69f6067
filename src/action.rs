//! Edit operators, grouped actions, and the action algebra.
//!
//! An edit script arrives as a stream of `(operator, token)` operations;
//! grouping runs of the same operator yields [`Action`]s. Actions can be
//! applied to reconstruct either input, reversed to describe the opposite
//! direction, and checked for applicability — the strongest correctness
//! check on the whole engine.

use crate::error::DiffError;
use crate::sequence::Sequence;
use crate::token::{Token, TokenComparator};
use core::fmt;

/// The three edit operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Token present in both sequences.
    Match,
    /// Token only present in the second sequence.
    Insert,
    /// Token only present in the first sequence.
    Delete,
}

impl Operator {
    /// Swaps INSERT and DELETE; MATCH is unchanged.
    pub fn flip(self) -> Operator {
        match self {
            Operator::Insert => Operator::Delete,
            Operator::Delete => Operator::Insert,
            Operator::Match => Operator::Match,
        }
    }

    /// Whether this operator denotes an edit rather than a match.
    pub fn is_edit(self) -> bool {
        !matches!(self, Operator::Match)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::Match => "=",
            Operator::Insert => "+",
            Operator::Delete => "-",
        })
    }
}

/// A run of consecutive operations sharing one operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    operator: Operator,
    tokens: Vec<Token>,
}

impl Action {
    /// Empty action for an operator.
    pub fn new(operator: Operator) -> Self {
        Self {
            operator,
            tokens: Vec::new(),
        }
    }

    /// Action over an existing token list.
    pub fn with_tokens(operator: Operator, tokens: Vec<Token>) -> Self {
        Self { operator, tokens }
    }

    /// Appends a token to this run.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// This action's operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The tokens in this run, in edit-script order.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens in this run.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether this run holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The same token list under the flipped operator. No tokens are
    /// allocated; the list is cloned as-is.
    pub fn reverse(&self) -> Action {
        Action {
            operator: self.operator.flip(),
            tokens: self.tokens.clone(),
        }
    }

    /// Whether every token in this run is text (word, character or
    /// whitespace).
    pub fn is_text_only(&self) -> bool {
        self.tokens.iter().all(Token::is_text)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.operator)?;
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        f.write_str("]")
    }
}

/// Flips every action, preserving order and token lists.
///
/// Applying the reversed list to the second sequence describes the
/// first; reversing twice restores the original list.
pub fn reverse(actions: &[Action]) -> Vec<Action> {
    actions.iter().map(Action::reverse).collect()
}

/// Replays `actions` against `base` (the first sequence of the comparison)
/// and reconstructs one side: with `keep_inserted` the "after" sequence
/// (MATCH and INSERT tokens), without it the "before" sequence (MATCH and
/// DELETE tokens).
///
/// Replay verifies that every MATCH and DELETE token lines up with `base`;
/// a divergence or leftover base tokens yield [`DiffError::CannotApply`].
/// The namespace declarations of `base` carry over to the result.
pub fn apply(base: &Sequence, actions: &[Action], keep_inserted: bool) -> Result<Sequence, DiffError> {
    let tokens = base.tokens();
    let mut cursor = 0usize;
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for action in actions {
        for token in action.tokens() {
            match action.operator() {
                Operator::Match => {
                    expect_at(tokens, cursor, token)?;
                    cursor += 1;
                    out.push(token.clone());
                }
                Operator::Delete => {
                    expect_at(tokens, cursor, token)?;
                    cursor += 1;
                    if !keep_inserted {
                        out.push(token.clone());
                    }
                }
                Operator::Insert => {
                    if keep_inserted {
                        out.push(token.clone());
                    }
                }
            }
        }
    }
    if cursor != tokens.len() {
        return Err(DiffError::CannotApply {
            index: cursor,
            expected: "end of sequence".to_string(),
            found: tokens[cursor].to_string(),
        });
    }
    let mut sequence = Sequence::from_tokens(out);
    *sequence.namespaces_mut() = base.namespaces().clone();
    Ok(sequence)
}

fn expect_at(tokens: &[Token], cursor: usize, token: &Token) -> Result<(), DiffError> {
    match tokens.get(cursor) {
        Some(found) if found == token => Ok(()),
        Some(found) => Err(DiffError::CannotApply {
            index: cursor,
            expected: token.to_string(),
            found: found.to_string(),
        }),
        None => Err(DiffError::CannotApply {
            index: cursor,
            expected: token.to_string(),
            found: "end of sequence".to_string(),
        }),
    }
}

/// Whether `actions` reconstructs `first` in the keep-deleted direction and
/// `second` in the keep-inserted direction.
///
/// Uses strict token equality; when whitespace differences were ignored
/// during the comparison, use [`is_applicable_with`] with the same
/// comparator.
pub fn is_applicable(first: &Sequence, second: &Sequence, actions: &[Action]) -> bool {
    is_applicable_with(first, second, actions, TokenComparator::strict())
}

/// [`is_applicable`] with an explicit comparator.
///
/// Under an ignoring comparator MATCH operations carry the first
/// sequence's whitespace, so reconstruction of the second side is checked
/// modulo the comparator rather than byte-for-byte.
pub fn is_applicable_with(
    first: &Sequence,
    second: &Sequence,
    actions: &[Action],
    cmp: TokenComparator,
) -> bool {
    let Ok(before) = apply(first, actions, false) else {
        return false;
    };
    let Ok(after) = apply(first, actions, true) else {
        return false;
    };
    cmp.slices_match(before.tokens(), first.tokens())
        && cmp.slices_match(after.tokens(), second.tokens())
}

/// Merges adjacent actions that share an operator and wrap text-only
/// tokens, reducing fragmentation in formatted output. Apply and reverse
/// semantics are unchanged.
pub fn coalesce(actions: Vec<Action>) -> Vec<Action> {
    let mut out: Vec<Action> = Vec::with_capacity(actions.len());
    for action in actions {
        if let Some(last) = out.last_mut()
            && last.operator() == action.operator()
            && last.is_text_only()
            && action.is_text_only()
        {
            last.tokens.extend(action.tokens);
            continue;
        }
        out.push(action);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_script() -> (Sequence, Sequence, Vec<Action>) {
        // A = <a> "x" </a>, B = <a> "y" </a>
        let first: Sequence = [Token::open("a"), Token::word("x"), Token::close("a")]
            .into_iter()
            .collect();
        let second: Sequence = [Token::open("a"), Token::word("y"), Token::close("a")]
            .into_iter()
            .collect();
        let actions = vec![
            Action::with_tokens(Operator::Match, vec![Token::open("a")]),
            Action::with_tokens(Operator::Delete, vec![Token::word("x")]),
            Action::with_tokens(Operator::Insert, vec![Token::word("y")]),
            Action::with_tokens(Operator::Match, vec![Token::close("a")]),
        ];
        (first, second, actions)
    }

    #[test]
    fn test_operator_flip() {
        assert_eq!(Operator::Insert.flip(), Operator::Delete);
        assert_eq!(Operator::Delete.flip(), Operator::Insert);
        assert_eq!(Operator::Match.flip(), Operator::Match);
        assert!(Operator::Insert.is_edit());
        assert!(!Operator::Match.is_edit());
    }

    #[test]
    fn test_apply_reconstructs_both_sides() {
        let (first, second, actions) = sample_script();
        let before = apply(&first, &actions, false).unwrap();
        let after = apply(&first, &actions, true).unwrap();
        assert_eq!(before.tokens(), first.tokens());
        assert_eq!(after.tokens(), second.tokens());
    }

    #[test]
    fn test_apply_rejects_foreign_base() {
        let (_, second, actions) = sample_script();
        // The script deletes "x", but the second sequence holds "y" there.
        let err = apply(&second, &actions, true).unwrap_err();
        let DiffError::CannotApply { index, .. } = err else {
            panic!("expected CannotApply");
        };
        assert_eq!(index, 1);
    }

    #[test]
    fn test_apply_rejects_leftover_base_tokens() {
        let (first, _, _) = sample_script();
        let actions = vec![Action::with_tokens(
            Operator::Match,
            vec![Token::open("a")],
        )];
        let err = apply(&first, &actions, true).unwrap_err();
        assert!(matches!(err, DiffError::CannotApply { index: 1, .. }));
    }

    #[test]
    fn test_reverse_swaps_direction() {
        let (first, second, actions) = sample_script();
        let reversed = reverse(&actions);
        // Reversed script replays against the second sequence.
        let before = apply(&second, &reversed, false).unwrap();
        let after = apply(&second, &reversed, true).unwrap();
        assert_eq!(before.tokens(), second.tokens());
        assert_eq!(after.tokens(), first.tokens());
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let (_, _, actions) = sample_script();
        assert_eq!(reverse(&reverse(&actions)), actions);
    }

    #[test]
    fn test_is_applicable() {
        let (first, second, actions) = sample_script();
        assert!(is_applicable(&first, &second, &actions));
        assert!(
            !is_applicable(&second, &first, &actions),
            "script direction matters"
        );
        assert!(is_applicable(&second, &first, &reverse(&actions)));
    }

    #[test]
    fn test_coalesce_merges_text_runs() {
        let actions = vec![
            Action::with_tokens(Operator::Insert, vec![Token::word("a")]),
            Action::with_tokens(Operator::Insert, vec![Token::whitespace(" ")]),
            Action::with_tokens(Operator::Insert, vec![Token::word("b")]),
            Action::with_tokens(Operator::Match, vec![Token::close("p")]),
        ];
        let coalesced = coalesce(actions);
        assert_eq!(coalesced.len(), 2);
        assert_eq!(coalesced[0].len(), 3);
        assert_eq!(coalesced[0].operator(), Operator::Insert);
    }

    #[test]
    fn test_coalesce_leaves_structure_alone() {
        let actions = vec![
            Action::with_tokens(Operator::Insert, vec![Token::open("b")]),
            Action::with_tokens(Operator::Insert, vec![Token::word("x")]),
        ];
        // The first action wraps an element token; nothing merges.
        assert_eq!(coalesce(actions.clone()), actions);
    }

    #[test]
    fn test_coalesce_preserves_apply_semantics() {
        let (first, second, actions) = sample_script();
        let coalesced = coalesce(actions);
        assert!(is_applicable(&first, &second, &coalesced));
    }
}
