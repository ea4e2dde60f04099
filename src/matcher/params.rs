use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::pattern::{Name, NameRef};

/// A parameter value: one string, or one string per repetition of a `+`/`*` key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Single(String),
    Repeated(Vec<String>),
}

impl ParamValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Single(value) => Some(value.as_str()),
            Self::Repeated(_) => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Repeated(values) => Some(values.as_slice()),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        Self::Repeated(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Repeated(values.into_iter().map(str::to_string).collect())
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    Self::Single(value.to_string())
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize, f64);

/// Parameter record keyed by name. Keys with an unmatched optional group are
/// absent rather than empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    inner: HashMap<Name, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: HashMap::with_capacity(capacity),
        }
    }

    pub fn with(mut self, name: impl Into<Name>, value: impl Into<ParamValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<Name>,
        value: impl Into<ParamValue>,
    ) -> Option<ParamValue> {
        self.inner.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.inner.get(&NameRef::Explicit(name))
    }

    pub fn get_ordinal(&self, ordinal: usize) -> Option<&ParamValue> {
        self.inner.get(&NameRef::Ordinal(ordinal))
    }

    pub fn get_name(&self, name: &Name) -> Option<&ParamValue> {
        self.inner.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Name, &ParamValue)> {
        self.inner.iter()
    }
}

impl<N: Into<Name>, V: Into<ParamValue>> FromIterator<(N, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl IntoIterator for Params {
    type Item = (Name, ParamValue);
    type IntoIter = hashbrown::hash_map::IntoIter<Name, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_distinguish_names_from_ordinals() {
        let params = Params::new().with("0", "named").with(0usize, "ordinal");
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("0"), Some(&ParamValue::from("named")));
        assert_eq!(params.get_ordinal(0), Some(&ParamValue::from("ordinal")));
        assert_eq!(
            params.get_name(&Name::Ordinal(0)),
            Some(&ParamValue::from("ordinal"))
        );
    }

    #[test]
    fn numbers_are_stringified() {
        assert_eq!(ParamValue::from(42u32), ParamValue::Single("42".to_string()));
        assert_eq!(ParamValue::from(-7i64).as_str(), Some("-7"));
    }

    #[test]
    fn collects_from_pairs() {
        let params: Params = vec![("a", "1"), ("b", "2")].into_iter().collect();
        assert!(params.contains("a"));
        assert!(!params.contains("c"));
    }
}
