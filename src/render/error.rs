use crate::pattern::Name;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("Expected \"{name}\" to not repeat, but got an array")]
    UnexpectedRepeat { name: Name },
    #[error("Expected \"{name}\" to not be empty")]
    EmptyRepeat { name: Name },
    #[error("Expected \"{name}\" to match \"{pattern}\", but got \"{value}\"")]
    PatternMismatch {
        name: Name,
        pattern: String,
        value: String,
    },
    #[error("Expected all \"{name}\" to match \"{pattern}\", but got \"{value}\"")]
    RepeatedPatternMismatch {
        name: Name,
        pattern: String,
        value: String,
    },
    #[error("Expected \"{name}\" to be {expected}")]
    MissingValue { name: Name, expected: &'static str },
}

impl RenderError {
    pub fn name(&self) -> &Name {
        match self {
            Self::UnexpectedRepeat { name }
            | Self::EmptyRepeat { name }
            | Self::PatternMismatch { name, .. }
            | Self::RepeatedPatternMismatch { name, .. }
            | Self::MissingValue { name, .. } => name,
        }
    }
}

pub type RenderResult<T> = Result<T, RenderError>;
