//! Grammar validator.
//!
//! The validator consumes tokens one at a time and keeps a stack with one
//! [`Scope`] per open container. Each scope records what may come next, which
//! is what a transition table keyed on the previous token alone cannot do: it
//! tells a comma inside an array from a comma inside an object, tells a key
//! from a string value, and knows how deep the document is. There is no
//! recursion, so nesting depth is limited only by memory (or by
//! `max_depth`).


use alloc::vec::Vec;
use core::{borrow::Borrow, cmp};

use crate::{
    GrammarError, GrammarErrorKind, LexicalError, Position, SieveOptions, Token, TokenKind,
    TokenSet, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectExpect {
    /// Just opened: a key or `}`.
    KeyOrEnd,
    /// After a comma: a key, and nothing else.
    Key,
    Colon,
    Value,
    CommaOrEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayExpect {
    /// Just opened: a value or `]`.
    ValueOrEnd,
    /// After a comma: a value, and nothing else.
    Value,
    CommaOrEnd,
}

/// One open container and what it expects next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Object(ObjectExpect),
    Array(ArrayExpect),
}

impl Scope {
    const fn expected(self) -> TokenSet {
        use TokenKind::{ArrayEnd, Colon, Comma, ObjectEnd, String};

        match self {
            Scope::Object(ObjectExpect::KeyOrEnd) => TokenSet::of(String).with(ObjectEnd),
            Scope::Object(ObjectExpect::Key) => TokenSet::of(String),
            Scope::Object(ObjectExpect::Colon) => TokenSet::of(Colon),
            Scope::Object(ObjectExpect::Value) | Scope::Array(ArrayExpect::Value) => {
                TokenSet::VALUE
            }
            Scope::Object(ObjectExpect::CommaOrEnd) => TokenSet::of(Comma).with(ObjectEnd),
            Scope::Array(ArrayExpect::ValueOrEnd) => TokenSet::VALUE.with(ArrayEnd),
            Scope::Array(ArrayExpect::CommaOrEnd) => TokenSet::of(Comma).with(ArrayEnd),
        }
    }
}

const AFTER_VALUE: TokenSet = TokenSet::of(TokenKind::Comma)
    .with(TokenKind::ObjectEnd)
    .with(TokenKind::ArrayEnd);

/// Kinds that may directly follow each kind inside a container, indexed by
/// `TokenKind as usize`.
const FOLLOWS: [TokenSet; 11] = [
    // ObjectStart
    TokenSet::of(TokenKind::String).with(TokenKind::ObjectEnd),
    // ObjectEnd
    AFTER_VALUE,
    // ArrayStart
    TokenSet::VALUE.with(TokenKind::ArrayEnd),
    // ArrayEnd
    AFTER_VALUE,
    // Comma
    TokenSet::VALUE,
    // Colon
    TokenSet::VALUE,
    // String
    AFTER_VALUE.with(TokenKind::Colon),
    // Number
    AFTER_VALUE,
    // True
    AFTER_VALUE,
    // False
    AFTER_VALUE,
    // Null
    AFTER_VALUE,
];

const fn follows(kind: TokenKind) -> TokenSet {
    FOLLOWS[kind as usize]
}

/// Statistics about a document that validated successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Summary {
    /// Tokens consumed.
    pub tokens: usize,
    /// Complete top-level values. Always 1 unless multiple values are allowed.
    pub documents: usize,
    /// Deepest container nesting reached.
    pub max_depth: usize,
    /// Object keys seen.
    pub keys: usize,
}

/// Decides whether a token sequence forms a JSON document.
///
/// Feed tokens with [`push`](Self::push) and conclude with
/// [`finish`](Self::finish), or hand over a whole sequence with
/// [`validate`](Self::validate) or [`validate_tokens`](Self::validate_tokens).
///
/// ```
/// use jsonsieve::{Position, Token, TokenKind, Validator};
///
/// let mut validator = Validator::new();
/// for kind in [TokenKind::ArrayStart, TokenKind::Null, TokenKind::ArrayEnd] {
///     validator.push(&Token::new(kind, Position::START)).unwrap();
/// }
/// assert_eq!(validator.finish().unwrap().tokens, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    stack: Vec<Scope>,
    last_kind: Option<TokenKind>,
    last_position: Position,
    failed: Option<GrammarError>,
    summary: Summary,

    max_depth: Option<usize>,
    allow_multiple_values: bool,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// A validator for exactly one document, without a depth limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(&SieveOptions::default())
    }

    /// A validator honoring `max_depth` and `allow_multiple_values`.
    #[must_use]
    pub fn with_options(options: &SieveOptions) -> Self {
        Self {
            stack: Vec::new(),
            last_kind: None,
            last_position: Position::START,
            failed: None,
            summary: Summary::default(),
            max_depth: options.max_depth,
            allow_multiple_values: options.allow_multiple_values,
        }
    }

    /// Current nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The kinds the next token may have. Empty once a single document is
    /// complete.
    #[must_use]
    pub fn expected(&self) -> TokenSet {
        match (self.stack.last(), self.last_kind) {
            (Some(scope), Some(last)) => scope.expected() & follows(last),
            (Some(scope), None) => scope.expected(),
            (None, None) => TokenSet::VALUE,
            (None, Some(_)) if self.allow_multiple_values => TokenSet::VALUE,
            (None, Some(_)) => TokenSet::EMPTY,
        }
    }

    /// Whether the tokens so far form complete documents.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty() && self.last_kind.is_some()
    }

    /// Consumes one token.
    ///
    /// # Errors
    ///
    /// Returns a [`GrammarError`] if the token is not allowed here. The error
    /// is terminal: the same error is returned for every later call.
    pub fn push(&mut self, token: &Token) -> Result<(), GrammarError> {
        self.push_kind(token.kind, token.position)
    }

    /// Consumes one token given only its kind and position.
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn push_kind(&mut self, kind: TokenKind, position: Position) -> Result<(), GrammarError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }

        let expected = self.expected();
        if !expected.contains(kind) {
            let error_kind = if expected.is_empty() {
                GrammarErrorKind::TrailingContent
            } else {
                GrammarErrorKind::UnexpectedToken
            };
            return Err(self.fail(error_kind, position, expected, Some(kind)));
        }

        match kind {
            TokenKind::ObjectStart | TokenKind::ArrayStart => {
                if let Some(limit) = self.max_depth {
                    if self.stack.len() >= limit {
                        let error_kind = GrammarErrorKind::DepthLimitExceeded { limit };
                        return Err(self.fail(error_kind, position, expected, Some(kind)));
                    }
                }
                self.stack.push(if kind == TokenKind::ObjectStart {
                    Scope::Object(ObjectExpect::KeyOrEnd)
                } else {
                    Scope::Array(ArrayExpect::ValueOrEnd)
                });
                self.summary.max_depth = cmp::max(self.summary.max_depth, self.stack.len());
            }
            TokenKind::ObjectEnd | TokenKind::ArrayEnd => {
                self.stack.pop();
                self.complete_value();
            }
            TokenKind::Comma => match self.stack.last_mut() {
                Some(Scope::Object(expect)) => *expect = ObjectExpect::Key,
                Some(Scope::Array(expect)) => *expect = ArrayExpect::Value,
                None => {}
            },
            TokenKind::Colon => {
                if let Some(Scope::Object(expect)) = self.stack.last_mut() {
                    *expect = ObjectExpect::Value;
                }
            }
            TokenKind::String
                if matches!(
                    self.stack.last(),
                    Some(Scope::Object(ObjectExpect::KeyOrEnd | ObjectExpect::Key))
                ) =>
            {
                if let Some(Scope::Object(expect)) = self.stack.last_mut() {
                    *expect = ObjectExpect::Colon;
                }
                self.summary.keys += 1;
            }
            TokenKind::String
            | TokenKind::Number
            | TokenKind::True
            | TokenKind::False
            | TokenKind::Null => self.complete_value(),
        }

        self.last_kind = Some(kind);
        self.last_position = position;
        self.summary.tokens += 1;
        Ok(())
    }

    /// Concludes validation at the position of the last token.
    ///
    /// # Errors
    ///
    /// [`GrammarErrorKind::EmptyDocument`] if no token arrived,
    /// [`GrammarErrorKind::UnclosedContainer`] if containers are still open,
    /// or the error an earlier [`push`](Self::push) returned.
    pub fn finish(self) -> Result<Summary, GrammarError> {
        let end = self.last_position;
        self.finish_at(end)
    }

    /// Concludes validation, reporting end-of-input errors at `end`.
    ///
    /// # Errors
    ///
    /// See [`finish`](Self::finish).
    pub fn finish_at(mut self, end: Position) -> Result<Summary, GrammarError> {
        if let Some(err) = self.failed {
            return Err(err);
        }
        if self.last_kind.is_none() {
            return Err(self.fail(GrammarErrorKind::EmptyDocument, end, TokenSet::VALUE, None));
        }
        if !self.stack.is_empty() {
            let error_kind = GrammarErrorKind::UnclosedContainer {
                depth: self.stack.len(),
            };
            let expected = self.expected();
            return Err(self.fail(error_kind, end, expected, None));
        }

        tracing::debug!(
            target: "jsonsieve::validator",
            tokens = self.summary.tokens,
            documents = self.summary.documents,
            max_depth = self.summary.max_depth,
            "validation succeeded"
        );
        Ok(self.summary)
    }

    /// Validates a fallible token sequence, such as a [`Tokenizer`].
    ///
    /// # Errors
    ///
    /// The first lexical error from `tokens`, or the first grammar error.
    ///
    /// [`Tokenizer`]: crate::Tokenizer
    pub fn validate<I, E>(mut self, tokens: I) -> Result<Summary, ValidationError<E>>
    where
        I: IntoIterator<Item = Result<Token, LexicalError<E>>>,
    {
        for token in tokens {
            self.push(&token?)?;
        }
        Ok(self.finish()?)
    }

    /// Validates an already materialized token sequence.
    ///
    /// # Errors
    ///
    /// The first grammar error.
    pub fn validate_tokens<I>(mut self, tokens: I) -> Result<Summary, GrammarError>
    where
        I: IntoIterator,
        I::Item: Borrow<Token>,
    {
        for token in tokens {
            self.push(token.borrow())?;
        }
        self.finish()
    }

    fn complete_value(&mut self) {
        match self.stack.last_mut() {
            Some(Scope::Object(expect)) => *expect = ObjectExpect::CommaOrEnd,
            Some(Scope::Array(expect)) => *expect = ArrayExpect::CommaOrEnd,
            None => self.summary.documents += 1,
        }
    }

    fn fail(
        &mut self,
        kind: GrammarErrorKind,
        position: Position,
        expected: TokenSet,
        actual: Option<TokenKind>,
    ) -> GrammarError {
        let err = GrammarError {
            kind,
            position,
            token_index: self.summary.tokens,
            expected,
            actual,
        };
        tracing::debug!(
            target: "jsonsieve::validator",
            kind = ?err.kind,
            offset = err.position.offset,
            token_index = err.token_index,
            "grammar error"
        );
        self.failed = Some(err.clone());
        err
    }
}
