//! Token sequences and their namespace metadata.

use crate::token::{Token, TokenIndex};
use compact_str::CompactString;
use core::ops::Index;

/// Namespace URI to prefix declarations attached to a sequence.
///
/// Collaborator metadata for renderers; the diff algorithms never consult
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    bindings: Vec<(CompactString, CompactString)>,
}

impl Namespaces {
    /// Empty declaration set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a prefix for a URI unless the URI is already mapped.
    pub fn add(&mut self, uri: impl Into<CompactString>, prefix: impl Into<CompactString>) {
        let uri = uri.into();
        if self.prefix(&uri).is_none() {
            self.bindings.push((uri, prefix.into()));
        }
    }

    /// Declares a prefix for a URI, overwriting any existing mapping.
    ///
    /// Typically used for the document element to override the default
    /// namespace prefix.
    pub fn replace(&mut self, uri: impl Into<CompactString>, prefix: impl Into<CompactString>) {
        let uri = uri.into();
        let prefix = prefix.into();
        if let Some(binding) = self.bindings.iter_mut().find(|(u, _)| *u == uri) {
            binding.1 = prefix;
        } else {
            self.bindings.push((uri, prefix));
        }
    }

    /// The prefix mapped to a URI, if any.
    pub fn prefix(&self, uri: &str) -> Option<&str> {
        self.bindings
            .iter()
            .find(|(u, _)| u == uri)
            .map(|(_, p)| p.as_str())
    }

    /// Iterates over `(uri, prefix)` declarations in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(u, p)| (u.as_str(), p.as_str()))
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no declarations.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Union of two declaration sets; `first` wins on conflicting URIs.
    pub fn merge(first: &Namespaces, second: &Namespaces) -> Namespaces {
        let mut merged = first.clone();
        for (uri, prefix) in second.iter() {
            merged.add(uri, prefix);
        }
        merged
    }
}

/// An ordered, index-addressable sequence of tokens.
///
/// Built once by a loader, then treated as immutable for the lifetime of a
/// comparison. Random access is O(1): the matrix algorithms look up
/// arbitrary positions on both sequences.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    tokens: Vec<Token>,
    namespaces: Namespaces,
}

impl Sequence {
    /// Empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty sequence with room for `capacity` tokens.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            tokens: Vec::with_capacity(capacity),
            namespaces: Namespaces::new(),
        }
    }

    /// Sequence over an existing token list.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            namespaces: Namespaces::new(),
        }
    }

    /// Appends a token.
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// The token at `index`, if in bounds.
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sequence holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// All tokens as a slice.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Iterates over the tokens in order.
    pub fn iter(&self) -> core::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// The namespace declarations carried by this sequence.
    pub fn namespaces(&self) -> &Namespaces {
        &self.namespaces
    }

    /// Mutable access to the namespace declarations (loader-side).
    pub fn namespaces_mut(&mut self) -> &mut Namespaces {
        &mut self.namespaces
    }

    /// Links every close-element token to the index of its matching opener.
    ///
    /// A loader-side pass over well-nested markup; unbalanced close tokens
    /// are left unlinked. Runs before the sequence enters a comparison.
    pub fn link_openers(&mut self) {
        let mut stack: Vec<TokenIndex> = Vec::new();
        for index in 0..self.tokens.len() {
            match &self.tokens[index] {
                Token::OpenElement { .. } => stack.push(index),
                Token::CloseElement { .. } => {
                    let top = stack.pop();
                    if let Token::CloseElement { opener, .. } = &mut self.tokens[index] {
                        *opener = top;
                    }
                }
                _ => {}
            }
        }
    }
}

impl Index<usize> for Sequence {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl FromIterator<Token> for Sequence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::from_tokens(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Token;
    type IntoIter = core::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl IntoIterator for Sequence {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}
