use super::ast::Name;
use super::lexer::LexTokenKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Missing parameter name at {index}")]
    MissingParameterName { index: usize },
    #[error("Pattern cannot start with \"?\" at {index}")]
    PatternStartsWithQuestionMark { index: usize },
    #[error("Invalid character '{character}' at {index}")]
    NonAsciiInPattern { character: char, index: usize },
    #[error("Capturing groups are not allowed at {index}")]
    CapturingGroupNotAllowed { index: usize },
    #[error("Unbalanced pattern at {index}")]
    UnbalancedPattern { index: usize },
    #[error("Missing pattern at {index}")]
    MissingPattern { index: usize },
    #[error("Unexpected end of input after escape at {index}")]
    UnexpectedEndAfterEscape { index: usize },
}

impl LexError {
    pub fn index(&self) -> usize {
        match self {
            Self::MissingParameterName { index }
            | Self::PatternStartsWithQuestionMark { index }
            | Self::NonAsciiInPattern { index, .. }
            | Self::CapturingGroupNotAllowed { index }
            | Self::UnbalancedPattern { index }
            | Self::MissingPattern { index }
            | Self::UnexpectedEndAfterEscape { index } => *index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("Unexpected {found} at {index}, expected {expected}")]
    UnexpectedToken {
        found: LexTokenKind,
        index: usize,
        expected: LexTokenKind,
    },
    #[error("Duplicate name '{name}' at {index}")]
    DuplicateName { name: Name, index: usize },
}

pub type ParseResult<T> = Result<T, ParseError>;
