use alloc::vec::Vec;

use quickcheck::{QuickCheck, TestResult};

use super::arbitrary::{Document, test_count};
use crate::{Token, TokenKind, Tokenizer, validate_slice};

/// Property: removing any bracket from a valid document makes it invalid.
///
/// Brackets are located with the tokenizer, so quote characters inside
/// strings are never mistaken for structure.
#[test]
fn deleting_a_bracket_is_rejected() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document, pick: usize) -> TestResult {
        let bytes = doc.compact();
        let brackets: Vec<usize> = Tokenizer::new(&bytes[..])
            .map(Result::unwrap)
            .filter(|t| {
                matches!(
                    t.kind,
                    TokenKind::ObjectStart
                        | TokenKind::ObjectEnd
                        | TokenKind::ArrayStart
                        | TokenKind::ArrayEnd
                )
            })
            .map(|t| t.position.offset)
            .collect();
        if brackets.is_empty() {
            return TestResult::discard();
        }

        let mut mutated = bytes.clone();
        mutated.remove(brackets[pick % brackets.len()]);
        TestResult::from_bool(validate_slice(&mutated).is_err())
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document, usize) -> TestResult);
}

/// Offsets of every `:` and quote in `bytes`, and of every `,` that does not
/// sit between two numbers. Removing such a comma merges the numbers into one
/// (`[1,2]` becomes `[12]`), which is still valid.
fn separators(bytes: &[u8]) -> Vec<usize> {
    let tokens: Vec<Token> = Tokenizer::new(bytes).map(Result::unwrap).collect();
    let mut offsets = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        let at = token.position.offset;
        match token.kind {
            TokenKind::Colon => offsets.push(at),
            TokenKind::String => {
                let len = token.payload().map_or(0, |p| p.len());
                offsets.push(at);
                offsets.push(at + 1 + len);
            }
            TokenKind::Comma => {
                let between_numbers = i > 0
                    && tokens[i - 1].kind == TokenKind::Number
                    && tokens.get(i + 1).is_some_and(|t| t.kind == TokenKind::Number);
                if !between_numbers {
                    offsets.push(at);
                }
            }
            _ => {}
        }
    }
    offsets
}

/// Property: removing a colon, a quote, or a comma that separates anything
/// but two numbers makes a valid document invalid.
#[test]
fn deleting_a_separator_is_rejected() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document, pick: usize) -> TestResult {
        let bytes = doc.compact();
        let offsets = separators(&bytes);
        if offsets.is_empty() {
            return TestResult::discard();
        }

        let mut mutated = bytes.clone();
        mutated.remove(offsets[pick % offsets.len()]);
        TestResult::from_bool(validate_slice(&mutated).is_err())
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document, usize) -> TestResult);
}

#[test]
fn deleting_a_comma_between_numbers_merges_them() {
    assert!(validate_slice(b"[1,2]").is_ok());
    assert!(validate_slice(b"[12]").is_ok());
    assert_eq!(separators(b"[1,2]"), Vec::<usize>::new());
    assert_eq!(separators(br#"{"a":[1,"b"]}"#), [1, 3, 4, 7, 8, 10]);
}

/// Property: a comma before any closing bracket is rejected.
#[test]
fn trailing_commas_are_rejected() {
    #[allow(clippy::needless_pass_by_value)]
    fn prop(doc: Document, pick: usize) -> TestResult {
        let bytes = doc.compact();
        let closers: Vec<usize> = Tokenizer::new(&bytes[..])
            .map(Result::unwrap)
            .filter(|t| matches!(t.kind, TokenKind::ObjectEnd | TokenKind::ArrayEnd))
            .map(|t| t.position.offset)
            .collect();
        if closers.is_empty() {
            return TestResult::discard();
        }

        let mut mutated = bytes.clone();
        mutated.insert(closers[pick % closers.len()], b',');
        TestResult::from_bool(validate_slice(&mutated).is_err())
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(Document, usize) -> TestResult);
}
