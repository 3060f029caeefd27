//! Reference identifier → correlation key

use indexmap::IndexSet;

/// Drop the final character of the identifier's text.
///
/// Identifiers of one character or none collapse to the empty key. That case
/// is not guarded: an empty key only matches an empty subject identifier.
pub fn derive_key(identifier: &str) -> String {
    let mut chars = identifier.chars();
    chars.next_back();
    chars.as_str().to_string()
}

/// Keys derived from the reference dataset, fixed for one run.
/// Iteration follows first appearance in the reference dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceKeySet {
    keys: IndexSet<String>,
}

impl ReferenceKeySet {
    pub fn from_identifiers<'a, I>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            keys: identifiers.into_iter().map(derive_key).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
