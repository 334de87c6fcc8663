//! The persistent entity collection and its hydrated-or-plain input form.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// A persistent, immutable mapping from key to entity state.
///
/// Backed by a structurally-shared persistent map: [`update`](Collection::update)
/// and [`without`](Collection::without) return new collections that share
/// structure with the old one, which is never mutated. Iteration order is
/// not semantically meaningful. Equality is structural.
///
/// The collection layer never inspects entity values; they are owned by
/// the single-entity reducer.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(
    serialize = "K: Serialize + Hash + Eq + Clone, V: Serialize + Clone",
    deserialize = "K: Deserialize<'de> + Hash + Eq + Clone, V: Deserialize<'de> + Clone"
))]
pub struct Collection<K, V> {
    entries: im::HashMap<K, V>,
}

impl<K, V> Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// An empty collection.
    pub fn new() -> Self {
        Self {
            entries: im::HashMap::new(),
        }
    }

    /// Look up the entity stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Whether an entity is stored under `key`.
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// A new collection with `key` mapped to `value`; `self` is unchanged.
    #[must_use]
    pub fn update(&self, key: K, value: V) -> Self {
        Self {
            entries: self.entries.update(key, value),
        }
    }

    /// A new collection with `key` removed; `self` is unchanged. Removing
    /// a key that was never present is not an error.
    #[must_use]
    pub fn without(&self, key: &K) -> Self {
        Self {
            entries: self.entries.without(key),
        }
    }

    /// Number of entities in the collection.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.entries.iter()
    }
}

impl<K, V> Default for Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> PartialEq for Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl<K, V> Eq for Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + Eq,
{
}

impl<K, V> fmt::Debug for Collection<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<K, V> From<HashMap<K, V>> for Collection<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn from(plain: HashMap<K, V>) -> Self {
        plain.into_iter().collect()
    }
}

/// Collection state as accepted by collection-aware functions: either an
/// already-hydrated [`Collection`] or a plain mapping (e.g. freshly
/// deserialized data) that has not been normalized yet.
///
/// [`get`](CollectionState::get) works on both forms without conversion;
/// [`into_collection`](CollectionState::into_collection) normalizes. The
/// collection reducer accepts this type so hydration happens on first
/// application, the same way a deserialized initial state flows into a
/// store.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
#[serde(bound(
    serialize = "K: Serialize + Hash + Eq + Clone, V: Serialize + Clone",
    deserialize = "K: Deserialize<'de> + Hash + Eq + Clone, V: Deserialize<'de> + Clone"
))]
pub enum CollectionState<K, V> {
    /// A plain mapping awaiting normalization.
    Plain(HashMap<K, V>),
    /// An already-normalized persistent collection.
    Hydrated(Collection<K, V>),
}

impl<K, V> CollectionState<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// An empty, already-hydrated state.
    pub fn empty() -> Self {
        CollectionState::Hydrated(Collection::new())
    }

    /// Look up the entity stored under `key`, on either form.
    pub fn get(&self, key: &K) -> Option<&V> {
        match self {
            CollectionState::Plain(plain) => plain.get(key),
            CollectionState::Hydrated(collection) => collection.get(key),
        }
    }

    /// Normalize into the persistent collection representation.
    pub fn into_collection(self) -> Collection<K, V> {
        match self {
            CollectionState::Plain(plain) => plain.into(),
            CollectionState::Hydrated(collection) => collection,
        }
    }
}

impl<K, V> Default for CollectionState<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::empty()
    }
}

/// Structural equality after normalization: a plain mapping equals the
/// hydrated collection holding the same entries.
impl<K, V> PartialEq for CollectionState<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.clone().into_collection() == other.clone().into_collection()
    }
}

impl<K, V> fmt::Debug for CollectionState<K, V>
where
    K: Hash + Eq + Clone + fmt::Debug,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionState::Plain(plain) => f.debug_tuple("Plain").field(plain).finish(),
            CollectionState::Hydrated(collection) => {
                f.debug_tuple("Hydrated").field(collection).finish()
            }
        }
    }
}

impl<K, V> From<Collection<K, V>> for CollectionState<K, V> {
    fn from(collection: Collection<K, V>) -> Self {
        CollectionState::Hydrated(collection)
    }
}

impl<K, V> From<HashMap<K, V>> for CollectionState<K, V> {
    fn from(plain: HashMap<K, V>) -> Self {
        CollectionState::Plain(plain)
    }
}

impl<K, V> FromIterator<(K, V)> for CollectionState<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        CollectionState::Hydrated(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Collection<String, u32> {
        [("a".to_string(), 1), ("b".to_string(), 2)]
            .into_iter()
            .collect()
    }

    #[test]
    fn update_leaves_original_unchanged() {
        let before = sample();
        let after = before.update("c".to_string(), 3);

        assert_eq!(before.len(), 2);
        assert_eq!(after.len(), 3);
        assert_eq!(after.get(&"c".to_string()), Some(&3));
        assert_eq!(before.get(&"c".to_string()), None);
    }

    #[test]
    fn without_leaves_original_unchanged() {
        let before = sample();
        let after = before.without(&"a".to_string());

        assert_eq!(before.get(&"a".to_string()), Some(&1));
        assert_eq!(after.get(&"a".to_string()), None);
        assert_eq!(after.len(), 1);
    }

    #[test]
    fn without_missing_key_is_not_an_error() {
        let before = sample();
        let after = before.without(&"zzz".to_string());
        assert_eq!(before, after);
    }

    #[test]
    fn equality_is_structural() {
        let left = sample();
        let right: Collection<String, u32> = [("b".to_string(), 2), ("a".to_string(), 1)]
            .into_iter()
            .collect();
        assert_eq!(left, right);
    }

    #[test]
    fn plain_state_equals_hydrated_state_with_same_entries() {
        let plain: CollectionState<String, u32> =
            HashMap::from([("a".to_string(), 1), ("b".to_string(), 2)]).into();
        let hydrated: CollectionState<String, u32> = sample().into();
        assert_eq!(plain, hydrated);
    }

    #[test]
    fn into_collection_normalizes_plain_mappings() {
        let plain: CollectionState<String, u32> = HashMap::from([("a".to_string(), 1)]).into();
        let collection = plain.into_collection();
        assert_eq!(collection.get(&"a".to_string()), Some(&1));
    }

    #[test]
    fn get_works_on_both_forms() {
        let plain: CollectionState<String, u32> = HashMap::from([("a".to_string(), 1)]).into();
        let hydrated: CollectionState<String, u32> = sample().into();

        assert_eq!(plain.get(&"a".to_string()), Some(&1));
        assert_eq!(hydrated.get(&"b".to_string()), Some(&2));
        assert_eq!(plain.get(&"missing".to_string()), None);
    }

    #[test]
    fn collection_deserializes_from_plain_json_map() {
        let collection: Collection<String, u32> =
            serde_json::from_str(r#"{"a":1,"b":2}"#).expect("deserialization should succeed");
        assert_eq!(collection, sample());
    }

    #[test]
    fn collection_serde_roundtrip() {
        let json = serde_json::to_string(&sample()).expect("serialization should succeed");
        let back: Collection<String, u32> =
            serde_json::from_str(&json).expect("deserialization should succeed");
        assert_eq!(back, sample());
    }
}
