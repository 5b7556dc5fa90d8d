use crate::common::CANONICAL_KEY_SEPARATOR;
use std::fmt::{Display, Formatter};

/// Deterministic identity of an index, derived from its field names only.
///
/// The key sorts the field names and writes each one followed by `_`, so
/// `{"b", "a"}` becomes `a_b_`. Local index models and indexes read from the
/// store catalog are both reduced to this key before they are compared.
///
/// The key ignores field order and direction. Two compound indexes over the
/// same fields declared in a different order compare equal even though a
/// store treats them differently for range and sort queries. Field names that
/// themselves contain `_` can also collide (`{"a_b"}` and `{"a", "b"}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Encodes a set of field names.
    pub fn encode<I, S>(field_names: I) -> CanonicalKey
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names: Vec<String> = field_names
            .into_iter()
            .map(|name| name.as_ref().to_string())
            .collect();
        names.sort();

        let mut key = String::with_capacity(names.iter().map(|n| n.len() + 1).sum());
        for name in names {
            key.push_str(&name);
            key.push(CANONICAL_KEY_SEPARATOR);
        }
        CanonicalKey(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CanonicalKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CanonicalKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Anything that can be reduced to a [`CanonicalKey`].
pub trait CanonicalIndex {
    fn canonical_key(&self) -> CanonicalKey;
}
