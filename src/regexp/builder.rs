use fancy_regex::Regex;

use super::error::{RegexError, RegexResult};
use super::escape::{ascii_classes, char_class, escape_string};
use crate::errors::PathPatternResult;
use crate::options::PathOptions;
use crate::pattern::{Key, Modifier, Token};

/// A compiled matching expression and the keys for its capture groups, where
/// `keys[i]` describes capture group `i + 1`.
#[derive(Debug, Clone)]
pub struct PathRegex {
    regex: Regex,
    source: String,
    keys: Vec<Key>,
}

impl PathRegex {
    /// Compiles `source`, prefixing the case-insensitive flag unless `sensitive`.
    pub(crate) fn compile(source: String, keys: Vec<Key>, sensitive: bool) -> RegexResult<Self> {
        let flagged = if sensitive {
            source.clone()
        } else {
            format!("(?i){source}")
        };
        let regex = Regex::new(&flagged).map_err(|err| RegexError::build(flagged, err))?;
        Ok(Self {
            regex,
            source,
            keys,
        })
    }

    /// Wraps an expression built elsewhere; its source is taken verbatim.
    pub(crate) fn from_regex(regex: Regex, keys: Vec<Key>) -> Self {
        Self {
            source: regex.as_str().to_string(),
            regex,
            keys,
        }
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Route expression without case flags, suitable for embedding.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }

    pub fn is_match(&self, input: &str) -> bool {
        self.regex.is_match(input).unwrap_or(false)
    }

    pub fn into_parts(self) -> (Regex, Vec<Key>) {
        (self.regex, self.keys)
    }
}

/// Renders a token sequence into a single matching expression.
#[tracing::instrument(level = "trace", skip_all, fields(tokens=tokens.len() as u64))]
pub fn tokens_to_regexp(tokens: &[Token], options: &PathOptions) -> PathPatternResult<PathRegex> {
    options.validate()?;
    let mut keys = Vec::new();
    let source = build_source(tokens, options, &mut keys);
    tracing::event!(tracing::Level::TRACE, operation="tokens_to_regexp", source=%source, keys=keys.len() as u64);
    Ok(PathRegex::compile(source, keys, options.sensitive)?)
}

fn build_source(tokens: &[Token], options: &PathOptions, keys: &mut Vec<Key>) -> String {
    let delimiter = char_class(&options.delimiter).unwrap_or_default();
    let ends_with = match char_class(&options.ends_with) {
        Some(class) => format!("{class}|$"),
        None => String::from("$"),
    };

    let mut route = String::new();
    if options.start {
        route.push('^');
    }

    for token in tokens {
        match token {
            Token::Literal(value) => {
                route.push_str(&escape_string(&(options.encode_literal)(value)));
            }
            Token::Key(key) => {
                push_key(&mut route, key, options);
                if key.is_capturing() {
                    keys.push(key.clone());
                }
            }
        }
    }

    if options.end {
        if !options.strict {
            route.push_str(&delimiter);
            route.push('?');
        }
        if options.ends_with.is_empty() {
            route.push('$');
        } else {
            route.push_str(&format!("(?={ends_with})"));
        }
        return route;
    }

    let is_end_delimited = match tokens.last() {
        None => true,
        Some(Token::Literal(value)) => value
            .chars()
            .last()
            .is_some_and(|ch| options.delimiter.contains(ch)),
        Some(Token::Key(_)) => false,
    };

    if !options.strict {
        route.push_str(&format!("(?:{delimiter}(?={ends_with}))?"));
    }
    if !is_end_delimited {
        route.push_str(&format!("(?={delimiter}|{ends_with})"));
    }

    route
}

fn push_key(route: &mut String, key: &Key, options: &PathOptions) {
    let prefix = escape_string(&(options.encode_literal)(&key.prefix));
    let suffix = escape_string(&(options.encode_literal)(&key.suffix));
    let modifier = key.modifier.as_str();
    let pattern = ascii_classes(&key.pattern);

    if pattern.is_empty() {
        route.push_str(&format!("(?:{prefix}{suffix}){modifier}"));
        return;
    }

    if prefix.is_empty() && suffix.is_empty() {
        if key.modifier.is_repeating() {
            route.push_str(&format!("((?:{pattern}){modifier})"));
        } else {
            route.push_str(&format!("({pattern}){modifier}"));
        }
        return;
    }

    if key.modifier.is_repeating() {
        // Repetitions reuse suffix + prefix as the separator inside one capture.
        let optional = if key.modifier == Modifier::ZeroOrMore {
            "?"
        } else {
            ""
        };
        route.push_str(&format!(
            "(?:{prefix}((?:{pattern})(?:{suffix}{prefix}(?:{pattern}))*){suffix}){optional}"
        ));
    } else {
        route.push_str(&format!("(?:{prefix}({pattern}){suffix}){modifier}"));
    }
}
