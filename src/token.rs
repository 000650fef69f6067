//! The token data model.
//!
//! Tokens are immutable value types; equality between them is the sole
//! predicate the similarity matrix uses to decide that two positions in the
//! compared sequences match. The opener back-reference carried by
//! [`Token::CloseElement`] exists for formatting consumers and never
//! participates in equality or hashing.

use crate::config::WhitespaceProcessing;
use compact_str::CompactString;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem;

/// A namespace-qualified name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI; empty when the name is in no namespace.
    pub uri: CompactString,
    /// Local part of the name.
    pub local: CompactString,
}

impl QName {
    /// Creates a namespace-qualified name.
    ///
    /// # Panics
    ///
    /// Panics if `local` is empty. A token without a name is a contract
    /// violation and must never enter a sequence.
    pub fn new(uri: impl Into<CompactString>, local: impl Into<CompactString>) -> Self {
        let uri = uri.into();
        let local = local.into();
        assert!(
            !local.is_empty(),
            "element and attribute names must not be empty"
        );
        Self { uri, local }
    }

    /// Creates a name in no namespace.
    ///
    /// # Panics
    ///
    /// Panics if `local` is empty.
    pub fn local(local: impl Into<CompactString>) -> Self {
        Self::new("", local)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.uri.is_empty() {
            write!(f, "{}", self.local)
        } else {
            write!(f, "{{{}}}{}", self.uri, self.local)
        }
    }
}

/// Index of a token within its owning [`Sequence`](crate::Sequence).
pub type TokenIndex = usize;

/// An atomic unit of markup structure or text.
///
/// Construct tokens through the associated functions ([`Token::open`],
/// [`Token::word`], ...) which enforce the construction contract (names and
/// text runs must be non-empty).
#[derive(Debug, Clone)]
pub enum Token {
    /// Start of an element.
    OpenElement {
        /// Element name.
        name: QName,
    },
    /// End of an element.
    CloseElement {
        /// Element name.
        name: QName,
        /// Index of the matching opener within the owning sequence, when
        /// known. Formatting metadata only; excluded from equality.
        opener: Option<TokenIndex>,
    },
    /// An attribute and its value.
    Attribute {
        /// Attribute name.
        name: QName,
        /// Attribute value.
        value: CompactString,
    },
    /// A run of text with at least one non-whitespace character. Under
    /// word granularity it never contains whitespace; under text
    /// granularity a whole run, internal whitespace included, is one
    /// token.
    Word {
        /// The text.
        text: CompactString,
    },
    /// A single character of text (character granularity).
    SingleChar {
        /// The character.
        ch: char,
    },
    /// A run of whitespace.
    Whitespace {
        /// The whitespace text.
        text: CompactString,
    },
    /// A processing instruction.
    ProcessingInstruction {
        /// The PI target.
        target: CompactString,
        /// The PI data.
        data: CompactString,
    },
}

impl Token {
    /// Open-element token with a name in no namespace.
    pub fn open(local: impl Into<CompactString>) -> Self {
        Token::OpenElement {
            name: QName::local(local),
        }
    }

    /// Open-element token with a namespaced name.
    pub fn open_ns(uri: impl Into<CompactString>, local: impl Into<CompactString>) -> Self {
        Token::OpenElement {
            name: QName::new(uri, local),
        }
    }

    /// Close-element token with a name in no namespace.
    pub fn close(local: impl Into<CompactString>) -> Self {
        Token::CloseElement {
            name: QName::local(local),
            opener: None,
        }
    }

    /// Close-element token linked to the opener at `opener` in the owning
    /// sequence.
    pub fn close_linked(local: impl Into<CompactString>, opener: TokenIndex) -> Self {
        Token::CloseElement {
            name: QName::local(local),
            opener: Some(opener),
        }
    }

    /// Close-element token with a namespaced name.
    pub fn close_ns(uri: impl Into<CompactString>, local: impl Into<CompactString>) -> Self {
        Token::CloseElement {
            name: QName::new(uri, local),
            opener: None,
        }
    }

    /// Attribute token with a name in no namespace.
    pub fn attribute(local: impl Into<CompactString>, value: impl Into<CompactString>) -> Self {
        Token::Attribute {
            name: QName::local(local),
            value: value.into(),
        }
    }

    /// Attribute token with a namespaced name.
    pub fn attribute_ns(
        uri: impl Into<CompactString>,
        local: impl Into<CompactString>,
        value: impl Into<CompactString>,
    ) -> Self {
        Token::Attribute {
            name: QName::new(uri, local),
            value: value.into(),
        }
    }

    /// Word token for a run of non-whitespace text.
    ///
    /// # Panics
    ///
    /// Panics if `text` is empty or contains whitespace.
    pub fn word(text: impl Into<CompactString>) -> Self {
        let text = text.into();
        assert!(!text.is_empty(), "a word token must not be empty");
        assert!(
            !text.chars().any(char::is_whitespace),
            "a word token must not contain whitespace"
        );
        Token::Word { text }
    }

    /// Word token for a whole text run (text granularity). Unlike
    /// [`Token::word`], internal whitespace is allowed.
    ///
    /// # Panics
    ///
    /// Panics if `text` is empty or entirely whitespace; a whitespace-only
    /// run is a [`Token::whitespace`].
    pub fn text(text: impl Into<CompactString>) -> Self {
        let text = text.into();
        assert!(!text.is_empty(), "a text token must not be empty");
        assert!(
            !text.chars().all(char::is_whitespace),
            "a whitespace-only run must be a whitespace token"
        );
        Token::Word { text }
    }

    /// Single-character token.
    pub fn single_char(ch: char) -> Self {
        Token::SingleChar { ch }
    }

    /// Whitespace token.
    ///
    /// # Panics
    ///
    /// Panics if `text` is empty or contains non-whitespace characters.
    pub fn whitespace(text: impl Into<CompactString>) -> Self {
        let text = text.into();
        assert!(!text.is_empty(), "a whitespace token must not be empty");
        assert!(
            text.chars().all(char::is_whitespace),
            "a whitespace token must only contain whitespace"
        );
        Token::Whitespace { text }
    }

    /// Processing-instruction token.
    ///
    /// # Panics
    ///
    /// Panics if `target` is empty.
    pub fn pi(target: impl Into<CompactString>, data: impl Into<CompactString>) -> Self {
        let target = target.into();
        assert!(
            !target.is_empty(),
            "a processing instruction must have a target"
        );
        Token::ProcessingInstruction {
            target,
            data: data.into(),
        }
    }

    /// Whether this token ends an element.
    pub fn is_close_element(&self) -> bool {
        matches!(self, Token::CloseElement { .. })
    }

    /// Whether this token is text content (word, character or whitespace).
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Token::Word { .. } | Token::SingleChar { .. } | Token::Whitespace { .. }
        )
    }

    /// Whether this token is whitespace-only text.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Token::Whitespace { .. })
    }
}

// Equality is structural and deliberately skips the opener back-reference:
// two close tokens for the same element name are the same token no matter
// where their openers sit.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Token::OpenElement { name: a }, Token::OpenElement { name: b }) => a == b,
            (Token::CloseElement { name: a, .. }, Token::CloseElement { name: b, .. }) => a == b,
            (
                Token::Attribute { name: a, value: av },
                Token::Attribute { name: b, value: bv },
            ) => a == b && av == bv,
            (Token::Word { text: a }, Token::Word { text: b }) => a == b,
            (Token::SingleChar { ch: a }, Token::SingleChar { ch: b }) => a == b,
            (Token::Whitespace { text: a }, Token::Whitespace { text: b }) => a == b,
            (
                Token::ProcessingInstruction {
                    target: at,
                    data: ad,
                },
                Token::ProcessingInstruction {
                    target: bt,
                    data: bd,
                },
            ) => at == bt && ad == bd,
            _ => false,
        }
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        mem::discriminant(self).hash(state);
        match self {
            Token::OpenElement { name } => name.hash(state),
            Token::CloseElement { name, .. } => name.hash(state),
            Token::Attribute { name, value } => {
                name.hash(state);
                value.hash(state);
            }
            Token::Word { text } => text.hash(state),
            Token::SingleChar { ch } => ch.hash(state),
            Token::Whitespace { text } => text.hash(state),
            Token::ProcessingInstruction { target, data } => {
                target.hash(state);
                data.hash(state);
            }
        }
    }
}

impl fmt::Display for Token {
    /// Short one-token form used by diagnostics and the matrix dump:
    /// `<a>`, `</a>`, `@class=x`, `"word"`, `'c'`, `~ ~`, `<?pi data?>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenElement { name } => write!(f, "<{name}>"),
            Token::CloseElement { name, .. } => write!(f, "</{name}>"),
            Token::Attribute { name, value } => write!(f, "@{name}={value}"),
            Token::Word { text } => write!(f, "\"{text}\""),
            Token::SingleChar { ch } => write!(f, "'{ch}'"),
            Token::Whitespace { text } => {
                f.write_str("~")?;
                for ch in text.chars() {
                    match ch {
                        '\n' => f.write_str("\\n")?,
                        '\t' => f.write_str("\\t")?,
                        '\r' => f.write_str("\\r")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("~")
            }
            Token::ProcessingInstruction { target, data } => {
                if data.is_empty() {
                    write!(f, "<?{target}?>")
                } else {
                    write!(f, "<?{target} {data}?>")
                }
            }
        }
    }
}

/// The equality predicate used by the matrix builder and the slicer.
///
/// Wraps strict token equality with the configured whitespace policy: under
/// [`WhitespaceProcessing::Ignore`] any two whitespace tokens compare equal
/// regardless of their text. `Compare` and `Preserve` both require identical
/// whitespace text; they differ only in what they signal to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenComparator {
    whitespace: WhitespaceProcessing,
}

impl TokenComparator {
    /// Comparator honoring the given whitespace policy.
    pub fn new(whitespace: WhitespaceProcessing) -> Self {
        Self { whitespace }
    }

    /// Comparator where whitespace differences are significant.
    pub fn strict() -> Self {
        Self::new(WhitespaceProcessing::Preserve)
    }

    /// Whether two tokens count as the same position in the matrix.
    #[inline]
    pub fn matches(&self, a: &Token, b: &Token) -> bool {
        if self.whitespace == WhitespaceProcessing::Ignore
            && let (Token::Whitespace { .. }, Token::Whitespace { .. }) = (a, b)
        {
            return true;
        }
        a == b
    }

    /// Whether two token slices match pairwise under this comparator.
    pub fn slices_match(&self, a: &[Token], b: &[Token]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.matches(x, y))
    }
}

impl Default for TokenComparator {
    fn default() -> Self {
        Self::strict()
    }
}
