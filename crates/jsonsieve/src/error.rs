use core::{convert::Infallible, fmt};

use thiserror::Error;

use crate::{Position, TokenKind, TokenSet};

/// Malformed bytes, or a failure of the byte source.
#[derive(Error, Debug, PartialEq)]
#[error("{kind} at {position}")]
pub struct LexicalError<E = Infallible> {
    /// What went wrong.
    pub kind: LexicalErrorKind<E>,
    /// Where the offending byte (or the token containing it) starts.
    pub position: Position,
}

impl<E> LexicalError<E> {
    pub(crate) fn new(kind: LexicalErrorKind<E>, position: Position) -> Self {
        Self { kind, position }
    }
}

/// The reasons a byte sequence does not tokenize.
#[derive(Error, Debug, PartialEq)]
pub enum LexicalErrorKind<E = Infallible> {
    /// A byte that cannot start a token.
    #[error("unexpected byte '{}'", .0.escape_ascii())]
    UnexpectedByte(u8),
    /// The stream ended inside a string.
    #[error("unterminated string")]
    UnterminatedString,
    /// A number that violates JSON's numeric grammar.
    #[error("invalid number: {0}")]
    InvalidNumber(NumberError),
    /// A keyword that did not match `true`, `false` or `null`.
    #[error("invalid literal, expected `{expected}`")]
    InvalidLiteral {
        /// The keyword being matched.
        expected: &'static str,
    },
    /// The stream ended inside a number or keyword.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
    /// An in-flight token outgrew the configured buffer limit.
    #[error("token exceeds the buffer limit of {limit} bytes")]
    BufferLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
    /// The byte source failed.
    #[error("read failed: {0}")]
    Source(#[source] E),
}

/// Ways a number can deviate from JSON's numeric grammar.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberError {
    /// `-` not followed by a digit.
    #[error("expected a digit after '-'")]
    MissingIntegerDigit,
    /// A digit directly after a leading `0`.
    #[error("leading zeros are not allowed")]
    LeadingZero,
    /// `.` not followed by a digit.
    #[error("expected a digit after '.'")]
    MissingFractionDigit,
    /// `e`/`E` (and optional sign) not followed by a digit.
    #[error("expected a digit in the exponent")]
    MissingExponentDigit,
}

/// The reasons a token sequence is not a JSON document.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GrammarErrorKind {
    /// A token that the current context does not allow.
    #[error("unexpected token")]
    UnexpectedToken,
    /// A token after the end of a complete document.
    #[error("trailing content")]
    TrailingContent,
    /// The stream ended with containers still open.
    #[error("unclosed container")]
    UnclosedContainer {
        /// How many containers were open.
        depth: usize,
    },
    /// The stream held no tokens at all.
    #[error("empty document")]
    EmptyDocument,
    /// Opening another container would exceed the configured nesting limit.
    #[error("nesting too deep")]
    DepthLimitExceeded {
        /// The configured limit.
        limit: usize,
    },
}

/// A well-formed token in a position the grammar does not allow.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GrammarError {
    /// What went wrong.
    pub kind: GrammarErrorKind,
    /// Position of the offending token, or of the end of input.
    pub position: Position,
    /// Zero-based index of the offending token; equals the token count for
    /// end-of-input errors.
    pub token_index: usize,
    /// Kinds that would have been accepted.
    pub expected: TokenSet,
    /// The kind that arrived, or `None` when the stream ended.
    pub actual: Option<TokenKind>,
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let position = self.position;
        let expected = self.expected;
        match (self.kind, self.actual) {
            (GrammarErrorKind::EmptyDocument, _) => write!(f, "empty document, expected a value"),
            (GrammarErrorKind::UnclosedContainer { depth }, _) => write!(
                f,
                "unexpected end of input at {position} with {depth} unclosed container(s), expected {expected}"
            ),
            (GrammarErrorKind::TrailingContent, Some(actual)) => write!(
                f,
                "trailing {actual} at {position} after the end of the document"
            ),
            (GrammarErrorKind::DepthLimitExceeded { limit }, Some(actual)) => write!(
                f,
                "{actual} at {position} exceeds the nesting limit of {limit}"
            ),
            (kind, Some(actual)) if kind == GrammarErrorKind::UnexpectedToken => write!(
                f,
                "unexpected {actual} at {position}, expected {expected}"
            ),
            (kind, _) => write!(f, "{kind} at {position}, expected {expected}"),
        }
    }
}

impl core::error::Error for GrammarError {}

/// Why a validation run failed. Lexical and grammar failures stay distinct.
#[derive(Error, Debug, PartialEq)]
pub enum ValidationError<E = Infallible> {
    /// The bytes did not tokenize.
    #[error("lexical error: {0}")]
    Lexical(#[from] LexicalError<E>),
    /// The tokens did not form a document.
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),
}

impl<E> ValidationError<E> {
    /// Where the failure was detected.
    pub fn position(&self) -> Position {
        match self {
            ValidationError::Lexical(err) => err.position,
            ValidationError::Grammar(err) => err.position,
        }
    }

    /// Returns `true` for failures of the byte source.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            ValidationError::Lexical(LexicalError {
                kind: LexicalErrorKind::Source(_),
                ..
            })
        )
    }
}
