use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegexError {
    #[error("failed to compile expression '{source_text}': {error}")]
    Build {
        source_text: String,
        #[source]
        error: Box<fancy_regex::Error>,
    },
}

impl RegexError {
    pub(crate) fn build(source_text: impl Into<String>, error: fancy_regex::Error) -> Self {
        Self::Build {
            source_text: source_text.into(),
            error: Box::new(error),
        }
    }
}

pub type RegexResult<T> = Result<T, RegexError>;
