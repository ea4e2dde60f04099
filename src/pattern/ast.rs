use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Parameter name. Explicit names come from `:name`, ordinals are handed out
/// to unnamed custom patterns and wildcards in order of appearance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Name {
    Ordinal(usize),
    Explicit(String),
}

impl Name {
    pub fn as_explicit(&self) -> Option<&str> {
        match self {
            Self::Explicit(name) => Some(name.as_str()),
            Self::Ordinal(_) => None,
        }
    }

    pub fn as_ordinal(&self) -> Option<usize> {
        match self {
            Self::Ordinal(index) => Some(*index),
            Self::Explicit(_) => None,
        }
    }

    pub(crate) fn as_ref(&self) -> NameRef<'_> {
        match self {
            Self::Explicit(name) => NameRef::Explicit(name.as_str()),
            Self::Ordinal(index) => NameRef::Ordinal(*index),
        }
    }
}

// Hash must agree with `NameRef` so borrowed lookups hit the same bucket.
impl Hash for Name {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_ref().hash(state);
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(name) => f.write_str(name),
            Self::Ordinal(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Self::Explicit(value.to_string())
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Self::Explicit(value)
    }
}

impl From<usize> for Name {
    fn from(value: usize) -> Self {
        Self::Ordinal(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NameRef<'a> {
    Explicit(&'a str),
    Ordinal(usize),
}

impl Hash for NameRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Explicit(name) => {
                0u8.hash(state);
                name.hash(state);
            }
            Self::Ordinal(index) => {
                1u8.hash(state);
                index.hash(state);
            }
        }
    }
}

impl hashbrown::Equivalent<Name> for NameRef<'_> {
    fn equivalent(&self, key: &Name) -> bool {
        *self == key.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Modifier {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "?")]
    Optional,
    #[serde(rename = "+")]
    OneOrMore,
    #[serde(rename = "*")]
    ZeroOrMore,
}

impl Modifier {
    pub fn from_symbol(value: &str) -> Option<Self> {
        match value {
            "" => Some(Self::None),
            "?" => Some(Self::Optional),
            "+" => Some(Self::OneOrMore),
            "*" => Some(Self::ZeroOrMore),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Optional => "?",
            Self::OneOrMore => "+",
            Self::ZeroOrMore => "*",
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional | Self::ZeroOrMore)
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self, Self::OneOrMore | Self::ZeroOrMore)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed parameter. `pattern` is regex source; an empty pattern marks a
/// decoration-only bracket group that captures nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    pub name: Name,
    pub prefix: String,
    pub suffix: String,
    pub pattern: String,
    pub modifier: Modifier,
}

impl Key {
    pub fn new(name: impl Into<Name>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: String::new(),
            suffix: String::new(),
            pattern: pattern.into(),
            modifier: Modifier::None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn is_capturing(&self) -> bool {
        !self.pattern.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Literal(String),
    Key(Key),
}

impl Token {
    pub fn as_key(&self) -> Option<&Key> {
        match self {
            Self::Key(key) => Some(key),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(value) => Some(value.as_str()),
            Self::Key(_) => None,
        }
    }
}

impl From<Key> for Token {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_and_ordinal_names_never_collide() {
        assert_ne!(Name::from("0"), Name::from(0usize));
        assert_eq!(Name::from("0").to_string(), Name::from(0usize).to_string());
    }

    #[test]
    fn modifier_symbols_round_trip() {
        for modifier in [
            Modifier::None,
            Modifier::Optional,
            Modifier::OneOrMore,
            Modifier::ZeroOrMore,
        ] {
            assert_eq!(Modifier::from_symbol(modifier.as_str()), Some(modifier));
        }
        assert_eq!(Modifier::from_symbol("!"), None);
    }

    #[test]
    fn modifier_flags() {
        assert!(!Modifier::None.is_optional());
        assert!(Modifier::Optional.is_optional());
        assert!(!Modifier::Optional.is_repeating());
        assert!(Modifier::OneOrMore.is_repeating());
        assert!(!Modifier::OneOrMore.is_optional());
        assert!(Modifier::ZeroOrMore.is_optional() && Modifier::ZeroOrMore.is_repeating());
    }
}
