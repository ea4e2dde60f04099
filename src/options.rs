use crate::pattern::Key;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const DEFAULT_DELIMITER: &str = "/#?";
pub const DEFAULT_PREFIXES: &str = "./";

/// Applied to literal fragments (and key prefixes/suffixes) at parse time.
pub type PartEncoder = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Applied to literal fragments while building the matching expression.
pub type LiteralEncoder = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Applied to each parameter value when rendering a path.
pub type ValueEncoder = Arc<dyn Fn(&str, &Key) -> String + Send + Sync>;
/// Applied to each captured value when matching a path.
pub type ValueDecoder = Arc<dyn Fn(&str, &Key) -> String + Send + Sync>;

fn identity_part() -> PartEncoder {
    Arc::new(|value: &str| value.to_string())
}

fn identity_value() -> ValueEncoder {
    Arc::new(|value: &str, _key: &Key| value.to_string())
}

#[derive(Clone)]
pub struct PathOptions {
    /// Characters separating path segments; excluded by the default key pattern.
    pub delimiter: String,
    /// Characters that become a key prefix when they directly precede `:name`.
    pub prefixes: String,
    pub encode_part: PartEncoder,
    pub sensitive: bool,
    pub strict: bool,
    pub start: bool,
    pub end: bool,
    /// Extra characters accepted as the end of a match.
    pub ends_with: String,
    pub encode_literal: LiteralEncoder,
    pub encode_value: ValueEncoder,
    pub decode_value: ValueDecoder,
    pub validate: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            prefixes: DEFAULT_PREFIXES.to_string(),
            encode_part: identity_part(),
            sensitive: false,
            strict: false,
            start: true,
            end: true,
            ends_with: String::new(),
            encode_literal: identity_part(),
            encode_value: identity_value(),
            decode_value: identity_value(),
            validate: true,
        }
    }
}

impl fmt::Debug for PathOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathOptions")
            .field("delimiter", &self.delimiter)
            .field("prefixes", &self.prefixes)
            .field("sensitive", &self.sensitive)
            .field("strict", &self.strict)
            .field("start", &self.start)
            .field("end", &self.end)
            .field("ends_with", &self.ends_with)
            .field("validate", &self.validate)
            .finish_non_exhaustive()
    }
}

impl PathOptions {
    pub fn builder() -> PathOptionsBuilder {
        PathOptionsBuilder::default()
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.delimiter.is_empty() {
            return Err(OptionsError::EmptyDelimiter);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct PathOptionsBuilder {
    options: PathOptions,
}

impl PathOptionsBuilder {
    pub fn delimiter<S: Into<String>>(mut self, value: S) -> Self {
        self.options.delimiter = value.into();
        self
    }

    pub fn prefixes<S: Into<String>>(mut self, value: S) -> Self {
        self.options.prefixes = value.into();
        self
    }

    pub fn encode_part<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.options.encode_part = Arc::new(f);
        self
    }

    pub fn sensitive(mut self, value: bool) -> Self {
        self.options.sensitive = value;
        self
    }

    pub fn strict(mut self, value: bool) -> Self {
        self.options.strict = value;
        self
    }

    pub fn start(mut self, value: bool) -> Self {
        self.options.start = value;
        self
    }

    pub fn end(mut self, value: bool) -> Self {
        self.options.end = value;
        self
    }

    pub fn ends_with<S: Into<String>>(mut self, value: S) -> Self {
        self.options.ends_with = value.into();
        self
    }

    pub fn encode_literal<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.options.encode_literal = Arc::new(f);
        self
    }

    pub fn encode_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Key) -> String + Send + Sync + 'static,
    {
        self.options.encode_value = Arc::new(f);
        self
    }

    pub fn decode_value<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &Key) -> String + Send + Sync + 'static,
    {
        self.options.decode_value = Arc::new(f);
        self
    }

    pub fn validate(mut self, value: bool) -> Self {
        self.options.validate = value;
        self
    }

    pub fn build(self) -> Result<PathOptions, OptionsError> {
        let options = self.options;
        options.validate()?;
        Ok(options)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptionsError {
    #[error("delimiter must contain at least one character")]
    EmptyDelimiter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = PathOptions::default();
        assert_eq!(options.delimiter, "/#?");
        assert_eq!(options.prefixes, "./");
        assert!(!options.sensitive);
        assert!(!options.strict);
        assert!(options.start && options.end);
        assert!(options.ends_with.is_empty());
        assert!(options.validate);
        assert_eq!((options.encode_part)("a b"), "a b");
    }

    #[test]
    fn builder_rejects_empty_delimiter() {
        let err = PathOptions::builder().delimiter("").build().unwrap_err();
        assert_eq!(err, OptionsError::EmptyDelimiter);
    }

    #[test]
    fn builder_applies_callbacks() {
        let options = PathOptions::builder()
            .encode_part(|s| s.to_uppercase())
            .strict(true)
            .build()
            .expect("builder should succeed");
        assert!(options.strict);
        assert_eq!((options.encode_part)("abc"), "ABC");
    }
}
