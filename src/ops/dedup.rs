use std::collections::HashMap;
use std::hash::Hash;

/// Unique keys plus, for every input position, the slot of its key.
///
/// Keys keep first-seen order, so `keys()[inverse()[i]]` is the `i`-th
/// input key. Used to evaluate each special-function factor once per
/// distinct `(n, l)`, `l` or `(l, m)` and gather it per requested triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueIndex<K> {
    keys: Vec<K>,
    inverse: Vec<usize>,
}

impl<K: Copy + Eq + Hash> UniqueIndex<K> {
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
    {
        let mut slots: HashMap<K, usize> = HashMap::new();
        let mut unique = Vec::new();
        let inverse = keys
            .into_iter()
            .map(|key| {
                *slots.entry(key).or_insert_with(|| {
                    unique.push(key);
                    unique.len() - 1
                })
            })
            .collect();

        Self {
            keys: unique,
            inverse,
        }
    }

    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    pub fn inverse(&self) -> &[usize] {
        &self.inverse
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Slot of the `i`-th input key.
    #[inline]
    pub fn slot(&self, i: usize) -> usize {
        self.inverse[i]
    }
}
