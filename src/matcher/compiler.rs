use fancy_regex::Regex;
use memchr::memmem::Finder;
use std::fmt;

use super::params::{ParamValue, Params};
use crate::options::{PathOptions, ValueDecoder};
use crate::pattern::Key;
use crate::regexp::PathRegex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The matched substring.
    pub path: String,
    /// Byte offset of the match within the input.
    pub index: usize,
    pub params: Params,
}

#[derive(Clone)]
struct KeySlot {
    key: Key,
    /// `suffix + prefix`, set only for repeating keys with a non-empty separator.
    separator: Option<Finder<'static>>,
}

impl KeySlot {
    fn new(key: Key) -> Self {
        let joined = format!("{}{}", key.suffix, key.prefix);
        let separator = (key.modifier.is_repeating() && !joined.is_empty())
            .then(|| Finder::new(joined.as_bytes()).into_owned());
        Self { key, separator }
    }

    fn split<'h>(&self, value: &'h str) -> Vec<&'h str> {
        let Some(finder) = &self.separator else {
            return vec![value];
        };
        let step = finder.needle().len();
        let mut parts = Vec::new();
        let mut last = 0usize;
        for pos in finder.find_iter(value.as_bytes()) {
            parts.push(&value[last..pos]);
            last = pos + step;
        }
        parts.push(&value[last..]);
        parts
    }
}

/// Applies a compiled expression to inputs and decodes captures into params.
#[derive(Clone)]
pub struct PathMatcher {
    regex: Regex,
    slots: Vec<KeySlot>,
    decode: ValueDecoder,
}

impl fmt::Debug for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PathMatcher")
            .field("regex", &self.regex.as_str())
            .field("keys", &self.slots.iter().map(|s| &s.key).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl PathMatcher {
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.slots.iter().map(|slot| &slot.key)
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns `None` when `input` does not match.
    #[tracing::instrument(level = "trace", skip(self), fields(input=%input))]
    pub fn matches(&self, input: &str) -> Option<MatchResult> {
        let caps = match self.regex.captures(input) {
            Ok(Some(caps)) => caps,
            Ok(None) => {
                tracing::event!(tracing::Level::TRACE, operation="match", matched=false);
                return None;
            }
            Err(err) => {
                tracing::event!(tracing::Level::WARN, operation="match", error=%err, "regex engine gave up; treating as no match");
                return None;
            }
        };
        let whole = caps.get(0)?;

        let mut params = Params::with_capacity(self.slots.len());
        for (i, slot) in self.slots.iter().enumerate() {
            let Some(capture) = caps.get(i + 1) else {
                continue;
            };
            let value = if slot.key.modifier.is_repeating() {
                ParamValue::Repeated(
                    slot.split(capture.as_str())
                        .into_iter()
                        .map(|part| (self.decode)(part, &slot.key))
                        .collect(),
                )
            } else {
                ParamValue::Single((self.decode)(capture.as_str(), &slot.key))
            };
            params.insert(slot.key.name.clone(), value);
        }

        tracing::event!(tracing::Level::TRACE, operation="match", matched=true, params=params.len() as u64);
        Some(MatchResult {
            path: whole.as_str().to_string(),
            index: whole.start(),
            params,
        })
    }
}

/// Wraps a compiled expression into a matcher using the options' decoder.
pub fn regexp_to_function(compiled: PathRegex, options: &PathOptions) -> PathMatcher {
    let (regex, keys) = compiled.into_parts();
    PathMatcher {
        regex,
        slots: keys.into_iter().map(KeySlot::new).collect(),
        decode: options.decode_value.clone(),
    }
}
