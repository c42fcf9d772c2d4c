//! Byte-level tokenizer.
//!
//! Overview
//! - [`Tokenizer`] pulls bytes from a [`ByteSource`] into a growable buffer
//!   and turns them into [`Token`]s one call at a time.
//! - The buffer holds only bytes that have not been emitted yet. When a scan
//!   runs off the end of the buffer, the bytes scanned so far stay where they
//!   are, new bytes are appended, and scanning resumes from where it stopped.
//!   Nothing is rescanned and nothing is lost across a read boundary.
//! - Scan progress lives in `lex_state` (string escape parity, number state,
//!   remaining keyword bytes), so a refill can happen between any two bytes.
//!
//! Buffer layout
//! - `buffer[..cursor]` has been emitted and is dropped on the next refill.
//! - `buffer[cursor..cursor + scanned]` belongs to the in-flight token.
//! - `buffer[cursor + scanned..]` has not been looked at.
//!
//! End of input
//! - Reaching the end of the stream between tokens ends the sequence.
//! - Reaching it inside a string, number or keyword is an error, except for a
//!   number that is complete as it stands (`12` at the very end).

mod literal;
mod number;


use alloc::vec::Vec;
use core::{cmp, iter::FusedIterator, ops::Range};

use bstr::BString;
use literal::ExpectedLiteral;
use number::NumberState;

use crate::{
    ByteSource, LexicalError, LexicalErrorKind, Position, SieveOptions, Token, TokenKind,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    /// Between tokens.
    Default,
    /// Inside a string. `escaped` is set when the last byte scanned was a
    /// backslash that is not itself escaped.
    String { escaped: bool },
    Number(NumberState),
    Literal(ExpectedLiteral),
    /// The end of the stream has been reported.
    End,
    /// An error has been reported.
    Error,
}

/// Turns a chunked byte stream into a lazy sequence of [`Token`]s.
///
/// The tokenizer is also an [`Iterator`] over `Result<Token, LexicalError>`.
/// After the end of the stream or the first error it yields nothing more.
///
/// ```
/// use jsonsieve::{TokenKind, Tokenizer};
///
/// let kinds: Vec<_> = Tokenizer::new(&br#"{"a": [1, true]}"#[..])
///     .map(|t| t.map(|t| t.kind))
///     .collect::<Result<_, _>>()
///     .unwrap();
/// assert_eq!(
///     kinds,
///     [
///         TokenKind::ObjectStart,
///         TokenKind::String,
///         TokenKind::Colon,
///         TokenKind::ArrayStart,
///         TokenKind::Number,
///         TokenKind::Comma,
///         TokenKind::True,
///         TokenKind::ArrayEnd,
///         TokenKind::ObjectEnd,
///     ]
/// );
/// ```
#[derive(Debug)]
pub struct Tokenizer<S> {
    source: S,
    buffer: Vec<u8>,
    cursor: usize,
    scanned: usize,
    /// Position of `buffer[cursor]`.
    position: Position,
    lex_state: LexState,
    end_of_input: bool,
    tokens: usize,

    read_size: usize,
    max_buffer_len: Option<usize>,
}

impl<S: ByteSource> Tokenizer<S> {
    /// Creates a tokenizer with default options.
    pub fn new(source: S) -> Self {
        Self::with_options(source, &SieveOptions::default())
    }

    /// Creates a tokenizer honoring `read_size` and `max_buffer_len`.
    pub fn with_options(source: S, options: &SieveOptions) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            cursor: 0,
            scanned: 0,
            position: Position::START,
            lex_state: LexState::Default,
            end_of_input: false,
            tokens: 0,
            read_size: options.read_size.max(1),
            max_buffer_len: options.max_buffer_len.map(|limit| limit.max(1)),
        }
    }

    /// Position of the first byte not yet emitted as part of a token.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Number of tokens emitted so far.
    pub fn tokens_emitted(&self) -> usize {
        self.tokens
    }

    /// Returns the byte source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Produces the next token, or `None` at the end of the stream.
    ///
    /// # Errors
    ///
    /// Returns a [`LexicalError`] for malformed input or a failed read. The
    /// error is terminal: later calls return `Ok(None)`.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexicalError<S::Error>> {
        if matches!(self.lex_state, LexState::End | LexState::Error) {
            return Ok(None);
        }

        let result = self.lex();
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => self.lex_state = LexState::End,
            Err(err) => {
                tracing::debug!(
                    target: "jsonsieve::tokenizer",
                    offset = err.position.offset,
                    "lexical error"
                );
                self.lex_state = LexState::Error;
            }
        }
        result
    }

    fn lex(&mut self) -> Result<Option<Token>, LexicalError<S::Error>> {
        loop {
            let Some(&byte) = self.buffer.get(self.cursor + self.scanned) else {
                if self.end_of_input {
                    return self.lex_end_of_input();
                }
                self.refill()?;
                continue;
            };

            match self.lex_state {
                LexState::Default => {
                    if let Some(kind) = TokenKind::from_punctuator(byte) {
                        self.scanned = 1;
                        return Ok(Some(self.emit(kind, None)));
                    }
                    match byte {
                        b' ' | b'\t' | b'\n' | b'\r' => self.skip_whitespace(),
                        b'"' => {
                            self.scanned = 1;
                            self.lex_state = LexState::String { escaped: false };
                        }
                        _ => {
                            if let Some(state) = NumberState::start(byte) {
                                self.scanned = 1;
                                self.lex_state = LexState::Number(state);
                            } else if let Some(expected) = ExpectedLiteral::new(byte) {
                                self.scanned = 1;
                                self.lex_state = LexState::Literal(expected);
                            } else {
                                return Err(self.error(LexicalErrorKind::UnexpectedByte(byte), 0));
                            }
                        }
                    }
                }

                LexState::String { escaped } => {
                    if let Some(token) = self.scan_string(escaped) {
                        return Ok(Some(token));
                    }
                }

                LexState::Number(state) => match state.step(byte) {
                    number::Step::Continue(next) => {
                        self.scanned += 1;
                        self.lex_state = LexState::Number(next);
                    }
                    number::Step::End => {
                        return Ok(Some(self.emit(TokenKind::Number, Some(0..self.scanned))));
                    }
                    number::Step::Reject(err) => {
                        return Err(self.error(LexicalErrorKind::InvalidNumber(err), self.scanned));
                    }
                },

                LexState::Literal(mut expected) => match expected.step(byte) {
                    literal::Step::NeedMore => {
                        self.scanned += 1;
                        self.lex_state = LexState::Literal(expected);
                    }
                    literal::Step::Done(kind) => {
                        self.scanned += 1;
                        return Ok(Some(self.emit(kind, None)));
                    }
                    literal::Step::Reject => {
                        let kind = LexicalErrorKind::InvalidLiteral {
                            expected: expected.keyword(),
                        };
                        return Err(self.error(kind, self.scanned));
                    }
                },

                LexState::End | LexState::Error => return Ok(None),
            }
        }
    }

    fn lex_end_of_input(&mut self) -> Result<Option<Token>, LexicalError<S::Error>> {
        match self.lex_state {
            LexState::Default | LexState::End | LexState::Error => Ok(None),
            LexState::String { .. } => Err(self.error(LexicalErrorKind::UnterminatedString, 0)),
            LexState::Number(state) => match state.finish() {
                Ok(()) => Ok(Some(self.emit(TokenKind::Number, Some(0..self.scanned)))),
                Err(err) => Err(self.error(LexicalErrorKind::InvalidNumber(err), self.scanned)),
            },
            LexState::Literal(_) => {
                Err(self.error(LexicalErrorKind::UnexpectedEndOfInput, self.scanned))
            }
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.buffer[self.cursor..];
        let run = rest
            .iter()
            .take_while(|&&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
            .count();
        self.position.advance(&rest[..run]);
        self.cursor += run;
    }

    /// Scans for the closing quote, resuming after the bytes already scanned.
    fn scan_string(&mut self, mut escaped: bool) -> Option<Token> {
        let from = self.cursor + self.scanned;
        let mut closing = None;
        for (i, &b) in self.buffer[from..].iter().enumerate() {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                closing = Some(i);
                break;
            }
        }

        match closing {
            Some(i) => {
                self.scanned += i + 1;
                Some(self.emit(TokenKind::String, Some(1..self.scanned - 1)))
            }
            None => {
                self.scanned = self.buffer.len() - self.cursor;
                self.lex_state = LexState::String { escaped };
                None
            }
        }
    }

    /// Emits the `scanned` bytes at `cursor` as a token. `payload` is relative
    /// to the token start.
    fn emit(&mut self, kind: TokenKind, payload: Option<Range<usize>>) -> Token {
        let start = self.cursor;
        let end = start + self.scanned;
        let payload = payload
            .map(|r| BString::from(self.buffer[start + r.start..start + r.end].to_vec()));
        let token = Token {
            kind,
            payload,
            position: self.position,
        };

        self.position.advance(&self.buffer[start..end]);
        self.cursor = end;
        self.scanned = 0;
        self.lex_state = LexState::Default;
        self.tokens += 1;
        if self.cursor == self.buffer.len() {
            self.buffer.clear();
            self.cursor = 0;
        }

        tracing::trace!(
            target: "jsonsieve::tokenizer",
            kind = ?token.kind,
            offset = token.position.offset,
            "token"
        );
        token
    }

    /// Drops emitted bytes and appends a read from the source, keeping the
    /// in-flight token intact.
    fn refill(&mut self) -> Result<(), LexicalError<S::Error>> {
        if self.cursor > 0 {
            self.buffer.drain(..self.cursor);
            self.cursor = 0;
        }

        let filled = self.buffer.len();
        let mut request = self.read_size;
        if let Some(limit) = self.max_buffer_len {
            // A number only ends at the byte after it, which may be buffered
            // on top of a number of exactly `limit` bytes.
            let capacity = match self.lex_state {
                LexState::Number(_) => limit.saturating_add(1),
                _ => limit,
            };
            if filled >= capacity {
                return Err(self.error(LexicalErrorKind::BufferLimitExceeded { limit }, 0));
            }
            request = cmp::min(request, capacity - filled);
        }

        self.buffer.resize(filled + request, 0);
        let read = match self.source.read(&mut self.buffer[filled..]) {
            Ok(read) => cmp::min(read, request),
            Err(err) => {
                self.buffer.truncate(filled);
                let position = self.position.advanced(&self.buffer);
                return Err(LexicalError::new(LexicalErrorKind::Source(err), position));
            }
        };
        self.buffer.truncate(filled + read);
        if read == 0 {
            self.end_of_input = true;
        }

        tracing::trace!(
            target: "jsonsieve::tokenizer",
            read,
            buffered = self.buffer.len(),
            "refilled buffer"
        );
        Ok(())
    }

    /// An error located `offset` bytes into the in-flight token.
    fn error(&self, kind: LexicalErrorKind<S::Error>, offset: usize) -> LexicalError<S::Error> {
        let end = cmp::min(self.cursor + offset, self.buffer.len());
        let position = self.position.advanced(&self.buffer[self.cursor..end]);
        LexicalError::new(kind, position)
    }
}

impl<S: ByteSource> Iterator for Tokenizer<S> {
    type Item = Result<Token, LexicalError<S::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl<S: ByteSource> FusedIterator for Tokenizer<S> {}
