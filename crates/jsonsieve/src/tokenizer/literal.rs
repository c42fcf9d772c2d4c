use crate::TokenKind;

/// What happened after feeding one more byte into the keyword matcher?
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Byte matched, but the keyword is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the keyword.
    Done(TokenKind),
    /// Byte did **not** match the expected byte.
    Reject,
}

/// An in-flight `true`, `false` or `null`: the bytes still expected and the
/// kind to emit once they have all arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExpectedLiteral {
    remaining: &'static [u8],
    kind: TokenKind,
}

impl ExpectedLiteral {
    /// Start matching after the *first* byte (`n`, `t`, or `f`).
    pub(crate) fn new(first: u8) -> Option<Self> {
        let (remaining, kind): (&'static [u8], _) = match first {
            b'n' => (b"ull", TokenKind::Null),
            b't' => (b"rue", TokenKind::True),
            b'f' => (b"alse", TokenKind::False),
            _ => return None,
        };
        Some(Self { remaining, kind })
    }

    /// The complete keyword, for error messages.
    pub(crate) fn keyword(self) -> &'static str {
        match self.kind {
            TokenKind::True => "true",
            TokenKind::False => "false",
            _ => "null",
        }
    }

    pub(crate) fn step(&mut self, byte: u8) -> Step {
        match self.remaining.split_first() {
            Some((&expected, rest)) if expected == byte => {
                if rest.is_empty() {
                    Step::Done(self.kind)
                } else {
                    self.remaining = rest;
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}
