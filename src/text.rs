//! Granularity-driven text tokenization.
//!
//! Splits an already-extracted text run into tokens. The diff engine never
//! re-splits text it is handed; granularity is decided once, at load time,
//! and both inputs of a comparison must use the same granularity.

use crate::config::TextGranularity;
use crate::token::Token;

/// Splits `text` into tokens at the given granularity.
///
/// - [`Text`]: the whole run is one token — a [`Token::Whitespace`] when it
///   is entirely whitespace, otherwise a single [`Token::Word`] carrying
///   the run verbatim, internal whitespace included.
/// - [`Word`]: alternating [`Token::Word`] and [`Token::Whitespace`].
/// - [`Character`]: one token per `char`; whitespace characters become
///   single-char [`Token::Whitespace`] tokens, the rest
///   [`Token::SingleChar`].
///
/// Empty input yields no tokens.
///
/// [`Text`]: TextGranularity::Text
/// [`Word`]: TextGranularity::Word
/// [`Character`]: TextGranularity::Character
pub fn tokenize_text(text: &str, granularity: TextGranularity) -> Vec<Token> {
    if text.is_empty() {
        return Vec::new();
    }
    match granularity {
        TextGranularity::Character => text
            .chars()
            .map(|ch| {
                if ch.is_whitespace() {
                    Token::whitespace(ch.to_string())
                } else {
                    Token::single_char(ch)
                }
            })
            .collect(),
        TextGranularity::Word => split_runs(text),
        TextGranularity::Text => {
            if text.chars().all(char::is_whitespace) {
                vec![Token::whitespace(text)]
            } else {
                vec![Token::text(text)]
            }
        }
    }
}

/// Splits into maximal same-kind spans: words and whitespace runs alternate.
fn split_runs(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_whitespace = text
        .chars()
        .next()
        .is_some_and(char::is_whitespace);
    for (pos, ch) in text.char_indices() {
        if ch.is_whitespace() != in_whitespace {
            tokens.push(run_token(&text[start..pos], in_whitespace));
            start = pos;
            in_whitespace = !in_whitespace;
        }
    }
    tokens.push(run_token(&text[start..], in_whitespace));
    tokens
}

fn run_token(run: &str, whitespace: bool) -> Token {
    if whitespace {
        Token::whitespace(run)
    } else {
        Token::word(run)
    }
}
