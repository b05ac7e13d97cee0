//! Per-column value canonicalization maps.
//!
//! A map holds raw spellings and the single canonical form each one stands
//! for. Lookup is case-insensitive: keys are folded to uppercase, the same way
//! for the stored entries and for the probed value.
//!
//! Every canonical value also resolves to itself, so with `{"ny": "New York"}`
//! the inputs `NY`, `ny` and `new york` all resolve to `New York`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ModelError;

fn fold(value: &str) -> String {
    value.to_uppercase()
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct CanonicalMap {
    /// Entries as configured (raw -> canonical).
    entries: BTreeMap<String, String>,
    /// Folded raw key -> canonical value.
    aliases: BTreeMap<String, String>,
    /// Folded canonical value -> canonical value.
    canonical: BTreeMap<String, String>,
}

impl CanonicalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from `(raw, canonical)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ConflictingCanonical`] when two raw keys (or two
    /// canonical values) fold to the same key but name different forms.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::new();
        for (raw, canonical) in pairs {
            map.insert(raw, canonical)?;
        }
        Ok(map)
    }

    /// Adds one entry.
    ///
    /// # Errors
    ///
    /// See [`CanonicalMap::from_pairs`].
    pub fn insert(
        &mut self,
        raw: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Result<(), ModelError> {
        let raw = raw.into();
        let canonical = canonical.into();
        insert_unique(&mut self.aliases, fold(raw.trim()), &canonical)?;
        insert_unique(&mut self.canonical, fold(canonical.trim()), &canonical)?;
        self.entries.insert(raw, canonical);
        Ok(())
    }

    /// `Y`/`N` to `Yes`/`No`.
    pub fn yes_no() -> Self {
        let mut map = Self::new();
        for (raw, canonical) in [("Y", "Yes"), ("N", "No")] {
            map.aliases.insert(fold(raw), canonical.to_string());
            map.canonical.insert(fold(canonical), canonical.to_string());
            map.entries.insert(raw.to_string(), canonical.to_string());
        }
        map
    }

    /// Canonical form for `value`, if the map knows it.
    ///
    /// Explicit entries win over the canonical self-match.
    pub fn resolve(&self, value: &str) -> Option<&str> {
        let key = fold(value);
        self.aliases
            .get(&key)
            .or_else(|| self.canonical.get(&key))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn insert_unique(
    target: &mut BTreeMap<String, String>,
    key: String,
    canonical: &str,
) -> Result<(), ModelError> {
    match target.get(&key) {
        Some(existing) if existing != canonical => Err(ModelError::ConflictingCanonical {
            key,
            first: existing.clone(),
            second: canonical.to_string(),
        }),
        Some(_) => Ok(()),
        None => {
            target.insert(key, canonical.to_string());
            Ok(())
        }
    }
}

impl TryFrom<BTreeMap<String, String>> for CanonicalMap {
    type Error = ModelError;

    fn try_from(value: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        Self::from_pairs(value)
    }
}

impl From<CanonicalMap> for BTreeMap<String, String> {
    fn from(value: CanonicalMap) -> Self {
        value.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yes_no_matches_checked_construction() {
        let checked = CanonicalMap::from_pairs([("Y", "Yes"), ("N", "No")]).expect("map");
        assert_eq!(CanonicalMap::yes_no(), checked);
        assert_eq!(CanonicalMap::yes_no().resolve("yes"), Some("Yes"));
        assert_eq!(CanonicalMap::yes_no().resolve("n"), Some("No"));
    }

    #[test]
    fn resolves_aliases_and_canonical_spellings() {
        let map = CanonicalMap::from_pairs([("ny", "New York")]).expect("map");
        assert_eq!(map.resolve("NY"), Some("New York"));
        assert_eq!(map.resolve("ny"), Some("New York"));
        assert_eq!(map.resolve("new york"), Some("New York"));
        assert_eq!(map.resolve("NEW YORK"), Some("New York"));
        assert_eq!(map.resolve("nj"), None);
    }

    #[test]
    fn rejects_conflicting_keys() {
        let err = CanonicalMap::from_pairs([("y", "Yes"), ("Y", "Yep")]).unwrap_err();
        assert!(matches!(err, ModelError::ConflictingCanonical { .. }));
    }

    #[test]
    fn repeated_key_with_same_target_is_fine() {
        let map = CanonicalMap::from_pairs([("y", "Yes"), ("Y", "Yes")]).expect("map");
        assert_eq!(map.resolve("y"), Some("Yes"));
        assert_eq!(map.len(), 2);
    }
}
