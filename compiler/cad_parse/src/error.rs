//! Parse errors.

/// Why a source text is not a valid expression or assignment.
///
/// Offsets are byte offsets into the text handed to the parser.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unrecognized input at offset {offset}")]
    InvalidToken { offset: usize },

    #[error("expected {expected} at offset {offset}, found `{found}`")]
    Unexpected {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("invalid escape `\\{escape}` at offset {offset}")]
    InvalidEscape { escape: char, offset: usize },

    #[error("integer literal out of range at offset {offset}")]
    IntegerOverflow { offset: usize },

    #[error("expression nested too deeply at offset {offset}")]
    TooDeep { offset: usize },

    #[error("attribute name `{name}` must not be quoted")]
    QuotedName { name: String },

    #[error("expected `<name> = <expression>`")]
    NotAnAssignment,
}

impl ParseError {
    /// Byte offset of the problem, when it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::InvalidToken { offset }
            | ParseError::Unexpected { offset, .. }
            | ParseError::InvalidEscape { offset, .. }
            | ParseError::IntegerOverflow { offset }
            | ParseError::TooDeep { offset } => Some(*offset),
            ParseError::UnexpectedEnd { .. }
            | ParseError::QuotedName { .. }
            | ParseError::NotAnAssignment => None,
        }
    }
}
