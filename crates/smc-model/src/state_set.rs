//! Sets of state indices, backed by a compressed bitmap.

use roaring::RoaringBitmap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A set of state indices.
///
/// Used both as a state domain (the states a computation must be correct
/// for) and as a satisfaction set (the states where a boolean holds).
/// Equality and hashing are by content, so sets can key a `HashMap`.
#[derive(Clone, Default, PartialEq)]
pub struct StateSet {
    bits: RoaringBitmap,
}

impl Eq for StateSet {}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set `{0, .., n-1}`.
    pub fn full(n: usize) -> Self {
        let mut bits = RoaringBitmap::new();
        bits.insert_range(0..n as u32);
        Self { bits }
    }

    pub fn singleton(s: usize) -> Self {
        let mut set = Self::new();
        set.insert(s);
        set
    }

    /// Insert a state. Returns true if it was not already present.
    pub fn insert(&mut self, s: usize) -> bool {
        self.bits.insert(s as u32)
    }

    pub fn remove(&mut self, s: usize) -> bool {
        self.bits.remove(s as u32)
    }

    pub fn contains(&self, s: usize) -> bool {
        self.bits.contains(s as u32)
    }

    pub fn len(&self) -> usize {
        self.bits.len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Check if this set contains every state of an `n`-state model.
    pub fn is_full(&self, n: usize) -> bool {
        self.len() == n && self.bits.max().is_none_or(|m| (m as usize) < n)
    }

    /// Lowest-index member.
    pub fn first(&self) -> Option<usize> {
        self.bits.min().map(|s| s as usize)
    }

    /// Iterate members in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().map(|s| s as usize)
    }

    pub fn intersect_with(&mut self, other: &StateSet) {
        self.bits &= &other.bits;
    }

    pub fn union_with(&mut self, other: &StateSet) {
        self.bits |= &other.bits;
    }

    /// All states of an `n`-state model not in this set.
    pub fn complement(&self, n: usize) -> StateSet {
        let mut full = StateSet::full(n);
        full.bits -= &self.bits;
        full
    }

    /// Drop every member except the lowest-index one.
    pub fn retain_first(&mut self) {
        if let Some(first) = self.bits.min() {
            self.bits.clear();
            self.bits.insert(first);
        }
    }

    pub fn is_subset(&self, other: &StateSet) -> bool {
        self.bits.is_subset(&other.bits)
    }
}

impl Hash for StateSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.len().hash(state);
        for s in self.bits.iter() {
            s.hash(state);
        }
    }
}

impl FromIterator<usize> for StateSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = StateSet::new();
        for s in iter {
            set.insert(s);
        }
        set
    }
}

impl fmt::Debug for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for StateSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, s) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", s)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_full_and_complement() {
        let full = StateSet::full(5);
        assert_eq!(full.len(), 5);
        assert!(full.is_full(5));
        let some: StateSet = [1, 3].into_iter().collect();
        let rest = some.complement(5);
        assert_eq!(rest.iter().collect::<Vec<_>>(), vec![0, 2, 4]);
        assert!(!some.is_full(5));
        assert!(StateSet::new().is_full(0));
    }

    #[test]
    fn test_retain_first() {
        let mut set: StateSet = [7, 2, 9].into_iter().collect();
        set.retain_first();
        assert_eq!(set, StateSet::singleton(2));
        let mut empty = StateSet::new();
        empty.retain_first();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_intersect_union() {
        let mut a: StateSet = [0, 1, 2].into_iter().collect();
        let b: StateSet = [1, 2, 3].into_iter().collect();
        let mut c = a.clone();
        a.intersect_with(&b);
        assert_eq!(a.to_string(), "{1, 2}");
        c.union_with(&b);
        assert_eq!(c.len(), 4);
        assert!(a.is_subset(&c));
    }

    #[test]
    fn test_hash_by_content() {
        let a: StateSet = [4, 1].into_iter().collect();
        let b: StateSet = [1, 4].into_iter().collect();
        let mut index = HashMap::new();
        index.insert(a, "L0");
        assert_eq!(index.get(&b), Some(&"L0"));
    }
}
