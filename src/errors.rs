use crate::options::OptionsError;
use crate::pattern::{LexError, ParseError};
use crate::regexp::RegexError;
use crate::render::RenderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathPatternError {
    #[error(transparent)]
    Options(#[from] OptionsError),
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Regex(#[from] RegexError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type PathPatternResult<T> = Result<T, PathPatternError>;
