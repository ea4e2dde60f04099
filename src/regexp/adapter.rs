use fancy_regex::Regex;
use regex::Regex as ScanRegex;
use std::sync::LazyLock;

use super::builder::{PathRegex, tokens_to_regexp};
use crate::errors::PathPatternResult;
use crate::options::PathOptions;
use crate::pattern::{Key, Name, parse};

// Skips escapes and character classes so only real group openers are seen.
static GROUP_OPENER: LazyLock<ScanRegex> = LazyLock::new(|| {
    ScanRegex::new(r"\\.|\[(?:\\.|[^\]\\])*\]|\((\?P?<([A-Za-z_][A-Za-z0-9_]*)>|\?)?")
        .expect("group scanner should compile")
});

/// Anything `path_to_regexp` accepts.
#[derive(Debug, Clone)]
pub enum PathInput {
    Pattern(String),
    /// An expression built elsewhere. Keys are recovered from its source text.
    Regex(Regex),
    /// An expression built by this crate, keys included.
    Compiled(PathRegex),
    List(Vec<PathInput>),
}

impl From<&str> for PathInput {
    fn from(value: &str) -> Self {
        Self::Pattern(value.to_string())
    }
}

impl From<String> for PathInput {
    fn from(value: String) -> Self {
        Self::Pattern(value)
    }
}

impl From<Regex> for PathInput {
    fn from(value: Regex) -> Self {
        Self::Regex(value)
    }
}

impl From<PathRegex> for PathInput {
    fn from(value: PathRegex) -> Self {
        Self::Compiled(value)
    }
}

impl<T: Into<PathInput>> From<Vec<T>> for PathInput {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Normalizes a pattern, an expression or a list of either into one
/// expression plus its ordered keys.
pub fn path_to_regexp(
    input: impl Into<PathInput>,
    options: &PathOptions,
) -> PathPatternResult<PathRegex> {
    options.validate()?;
    input_to_regexp(input.into(), options)
}

fn input_to_regexp(input: PathInput, options: &PathOptions) -> PathPatternResult<PathRegex> {
    match input {
        PathInput::Pattern(pattern) => string_to_regexp(&pattern, options),
        PathInput::Regex(regex) => Ok(regexp_to_regexp(regex)),
        PathInput::Compiled(compiled) => Ok(compiled),
        PathInput::List(items) => list_to_regexp(items, options),
    }
}

#[tracing::instrument(level = "trace", skip(options), fields(pattern=%pattern))]
fn string_to_regexp(pattern: &str, options: &PathOptions) -> PathPatternResult<PathRegex> {
    let tokens = parse(pattern, options)?;
    tokens_to_regexp(&tokens, options)
}

fn regexp_to_regexp(regex: Regex) -> PathRegex {
    let keys = scan_group_keys(regex.as_str());
    PathRegex::from_regex(regex, keys)
}

fn list_to_regexp(items: Vec<PathInput>, options: &PathOptions) -> PathPatternResult<PathRegex> {
    let mut keys = Vec::new();
    let mut parts = Vec::with_capacity(items.len());

    for item in items {
        let compiled = input_to_regexp(item, options)?;
        // Own group per alternative keeps inline flags from leaking into the next.
        parts.push(format!("(?:{})", compiled.source()));
        keys.extend_from_slice(compiled.keys());
    }

    let source = format!("(?:{})", parts.join("|"));
    Ok(PathRegex::compile(source, keys, options.sensitive)?)
}

/// Placeholder keys for every capturing group in `source`. Named groups keep
/// their name, unnamed ones take the next ordinal.
pub fn scan_group_keys(source: &str) -> Vec<Key> {
    let mut ordinal = 0usize;
    let mut keys = Vec::new();

    for caps in GROUP_OPENER.captures_iter(source) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if !whole.as_str().starts_with('(') {
            continue;
        }

        let name = match (caps.get(2), caps.get(1)) {
            (Some(name), _) => Name::Explicit(name.as_str().to_string()),
            // (?: (?= (?! (?<= and inline flags
            (None, Some(_)) => continue,
            (None, None) => {
                let name = Name::Ordinal(ordinal);
                ordinal += 1;
                name
            }
        };
        keys.push(Key::new(name, ""));
    }

    keys
}
