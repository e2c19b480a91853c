//! Filter syntax errors.

use crate::Span;
use thiserror::Error;

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;

/// Why a filter or order-by list could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{span}: unexpected character {found:?}")]
    UnexpectedChar { found: char, span: Span },

    #[error("{span}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("{span}: unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("{span}: invalid escape \\{found} in string literal")]
    InvalidEscape { found: char, span: Span },

    #[error("{span}: integer literal {text} is out of range")]
    IntOutOfRange { text: String, span: Span },

    #[error("{span}: filter nesting exceeds maximum depth {max}")]
    NestingTooDeep { max: usize, span: Span },
}

impl ParseError {
    pub fn unexpected(expected: impl Into<String>, found: impl Into<String>, span: Span) -> Self {
        Self::UnexpectedToken {
            expected: expected.into(),
            found: found.into(),
            span,
        }
    }

    /// Where in the input the error was detected.
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedChar { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::UnterminatedString { span }
            | ParseError::InvalidEscape { span, .. }
            | ParseError::IntOutOfRange { span, .. }
            | ParseError::NestingTooDeep { span, .. } => *span,
        }
    }
}
