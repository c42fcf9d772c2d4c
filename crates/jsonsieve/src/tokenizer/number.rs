use crate::NumberError;

/// Progress through `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
///
/// Each state names the last thing consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberState {
    Sign,
    Zero,
    Integer,
    Point,
    Fraction,
    Exponent,
    ExponentSign,
    ExponentInteger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// The byte belongs to the number.
    Continue(NumberState),
    /// The number ended before this byte, which is left unconsumed.
    End,
    Reject(NumberError),
}

impl NumberState {
    pub(crate) fn start(first: u8) -> Option<Self> {
        match first {
            b'-' => Some(NumberState::Sign),
            b'0' => Some(NumberState::Zero),
            b'1'..=b'9' => Some(NumberState::Integer),
            _ => None,
        }
    }

    pub(crate) fn step(self, byte: u8) -> Step {
        use NumberState::{
            Exponent, ExponentInteger, ExponentSign, Fraction, Integer, Point, Sign, Zero,
        };

        match (self, byte) {
            (Sign, b'0') => Step::Continue(Zero),
            (Sign, b'1'..=b'9') => Step::Continue(Integer),
            (Sign, _) => Step::Reject(NumberError::MissingIntegerDigit),

            (Zero, b'0'..=b'9') => Step::Reject(NumberError::LeadingZero),
            (Integer, b'0'..=b'9') => Step::Continue(Integer),
            (Zero | Integer, b'.') => Step::Continue(Point),

            (Point | Fraction, b'0'..=b'9') => Step::Continue(Fraction),
            (Point, _) => Step::Reject(NumberError::MissingFractionDigit),

            (Zero | Integer | Fraction, b'e' | b'E') => Step::Continue(Exponent),
            (Exponent, b'+' | b'-') => Step::Continue(ExponentSign),
            (Exponent | ExponentSign | ExponentInteger, b'0'..=b'9') => {
                Step::Continue(ExponentInteger)
            }
            (Exponent | ExponentSign, _) => Step::Reject(NumberError::MissingExponentDigit),

            (Zero | Integer | Fraction | ExponentInteger, _) => Step::End,
        }
    }

    /// Whether the stream may end in this state.
    pub(crate) fn finish(self) -> Result<(), NumberError> {
        match self {
            NumberState::Sign => Err(NumberError::MissingIntegerDigit),
            NumberState::Point => Err(NumberError::MissingFractionDigit),
            NumberState::Exponent | NumberState::ExponentSign => {
                Err(NumberError::MissingExponentDigit)
            }
            NumberState::Zero
            | NumberState::Integer
            | NumberState::Fraction
            | NumberState::ExponentInteger => Ok(()),
        }
    }
}
