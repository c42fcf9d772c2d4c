use core::{fmt, ops};

use bstr::{BStr, BString};

use crate::Position;

/// The lexical alphabet of JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[repr(u8)]
pub enum TokenKind {
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// A quoted string, used either as an object key or as a value.
    String,
    /// A number in JSON's strict numeric grammar.
    Number,
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 11] = [
        TokenKind::ObjectStart,
        TokenKind::ObjectEnd,
        TokenKind::ArrayStart,
        TokenKind::ArrayEnd,
        TokenKind::Comma,
        TokenKind::Colon,
        TokenKind::String,
        TokenKind::Number,
        TokenKind::True,
        TokenKind::False,
        TokenKind::Null,
    ];

    /// Maps a structural byte to its token kind.
    #[must_use]
    pub const fn from_punctuator(byte: u8) -> Option<TokenKind> {
        Some(match byte {
            b'{' => TokenKind::ObjectStart,
            b'}' => TokenKind::ObjectEnd,
            b'[' => TokenKind::ArrayStart,
            b']' => TokenKind::ArrayEnd,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            _ => return None,
        })
    }

    /// Returns `true` for the kinds that may begin a value.
    #[must_use]
    pub const fn starts_value(self) -> bool {
        TokenSet::VALUE.contains(self)
    }

    /// Returns `true` for the kinds that carry a payload.
    #[must_use]
    pub const fn has_payload(self) -> bool {
        matches!(self, TokenKind::String | TokenKind::Number)
    }

    const fn bit(self) -> u16 {
        1 << self as u8
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenKind::ObjectStart => "'{'",
            TokenKind::ObjectEnd => "'}'",
            TokenKind::ArrayStart => "'['",
            TokenKind::ArrayEnd => "']'",
            TokenKind::Comma => "','",
            TokenKind::Colon => "':'",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Null => "null",
        })
    }
}

/// A set of [`TokenKind`]s, used to describe what the validator expects next.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenSet(u16);

impl TokenSet {
    /// The empty set.
    pub const EMPTY: TokenSet = TokenSet(0);

    /// Kinds that may begin a value.
    pub const VALUE: TokenSet = TokenSet::EMPTY
        .with(TokenKind::ObjectStart)
        .with(TokenKind::ArrayStart)
        .with(TokenKind::String)
        .with(TokenKind::Number)
        .with(TokenKind::True)
        .with(TokenKind::False)
        .with(TokenKind::Null);

    /// A set holding a single kind.
    #[must_use]
    pub const fn of(kind: TokenKind) -> TokenSet {
        TokenSet(kind.bit())
    }

    /// Returns this set with `kind` added.
    #[must_use]
    pub const fn with(self, kind: TokenKind) -> TokenSet {
        TokenSet(self.0 | kind.bit())
    }

    /// Returns `true` if `kind` is a member.
    #[must_use]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns `true` if the set has no members.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of members.
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates over the members in declaration order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl ops::BitAnd for TokenSet {
    type Output = TokenSet;

    fn bitand(self, rhs: TokenSet) -> TokenSet {
        TokenSet(self.0 & rhs.0)
    }
}

impl fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Renders as `a, b or c`; the empty set renders as `end of input`.
impl fmt::Display for TokenSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.len();
        if len == 0 {
            return f.write_str("end of input");
        }
        for (i, kind) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(if i + 1 == len { " or " } else { ", " })?;
            }
            kind.fmt(f)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TokenSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// A classified lexical unit.
///
/// For [`TokenKind::String`] the payload holds the bytes between the quotes,
/// with escape sequences left exactly as written. For [`TokenKind::Number`]
/// it holds the raw numeric span. Every other kind has no payload.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    /// What kind of token this is.
    pub kind: TokenKind,
    /// Raw payload bytes, present only for strings and numbers.
    pub payload: Option<BString>,
    /// Position of the token's first byte.
    pub position: Position,
}

impl Token {
    /// A token without payload.
    #[must_use]
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Self {
            kind,
            payload: None,
            position,
        }
    }

    /// A token carrying payload bytes.
    #[must_use]
    pub fn with_payload(kind: TokenKind, payload: impl Into<BString>, position: Position) -> Self {
        Self {
            kind,
            payload: Some(payload.into()),
            position,
        }
    }

    /// The payload as a byte string, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&BStr> {
        self.payload.as_ref().map(BStr::new)
    }
}
