//! Persistent (immutable) ordered map based on an AVL tree.
//!
//! This module provides [`PersistentAvlMap`], an immutable ordered map
//! that uses structural sharing for efficient operations.
//!
//! # Overview
//!
//! `PersistentAvlMap` is a height-balanced binary search tree. Every update
//! rebuilds only the path from the root to the touched node and shares all
//! other subtrees with the previous version.
//!
//! - O(log N) get
//! - O(log N) insert
//! - O(log N) remove
//! - O(log N) min/max
//! - O(N) ordered traversal, fold and equality
//! - O(1) len and `is_empty`
//!
//! # Examples
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlMap;
//!
//! let map = PersistentAvlMap::new()
//!     .insert(3, "three")
//!     .insert(1, "one")
//!     .insert(2, "two");
//!
//! // Entries are always in sorted order
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Older versions stay valid
//! let smaller = map.remove(&2);
//! assert_eq!(map.len(), 3);
//! assert_eq!(smaller.len(), 2);
//! ```
//!
//! # Internal Structure
//!
//! The AVL tree maintains the following invariants:
//! 1. Keys in a left subtree are smaller than the node's key, keys in a right subtree larger
//! 2. The heights of the two subtrees of every node differ by at most one
//! 3. Every node caches its own height
//!
//! These invariants bound the tree height by about `1.44 * log2(N)`.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::ReferenceCounter;
use super::error::InvariantViolation;
use super::node::{self, Link, Node};
use super::traversal::{self, PersistentAvlMapIterator};
use crate::typeclass::{Monoid, Semigroup};

// =============================================================================
// PersistentAvlMap Definition
// =============================================================================

/// A persistent (immutable) ordered map based on an AVL tree.
///
/// Keys must implement `Ord` for ordering. Entries are kept in ascending key
/// order. Every operation that "modifies" the map returns a new map and
/// leaves the original untouched; both share all unchanged subtrees.
///
/// # Time Complexity
///
/// | Operation       | Complexity   |
/// |-----------------|--------------|
/// | `new`           | O(1)         |
/// | `get`           | O(log N)     |
/// | `insert`        | O(log N)     |
/// | `remove`        | O(log N)     |
/// | `contains_key`  | O(log N)     |
/// | `min`/`max`     | O(log N)     |
/// | `fold_left`     | O(N)         |
/// | `structural_eq` | O(N)         |
/// | `map`/`filter`  | O(N log N)   |
/// | `merge`         | O(M log(N + M)) |
/// | `len`           | O(1)         |
///
/// # Examples
///
/// ```rust
/// use persistent_avl::persistent::PersistentAvlMap;
///
/// let map = PersistentAvlMap::singleton(42, "answer");
/// assert_eq!(map.get(&42), Some(&"answer"));
///
/// let map = PersistentAvlMap::from_list([(3, "c"), (1, "a"), (2, "b")]);
/// assert_eq!(map.to_list(), vec![(1, "a"), (2, "b"), (3, "c")]);
/// ```
#[derive(Clone)]
pub struct PersistentAvlMap<K, V> {
    /// Root node of the tree
    root: Link<K, V>,
    /// Number of entries
    length: usize,
}

#[cfg(feature = "arc")]
static_assertions::assert_impl_all!(PersistentAvlMap<i32, String>: Send, Sync);

#[cfg(not(feature = "arc"))]
static_assertions::assert_not_impl_any!(PersistentAvlMap<i32, String>: Send, Sync);

impl<K, V> PersistentAvlMap<K, V> {
    /// Creates a new empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map: PersistentAvlMap<i32, String> = PersistentAvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            root: None,
            length: 0,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1)
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns the height of the underlying tree (0 for an empty map).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map: PersistentAvlMap<i32, i32> = (0..7).map(|key| (key, key)).collect();
    /// assert_eq!(map.height(), 3);
    /// ```
    #[must_use]
    pub fn height(&self) -> usize {
        usize::from(node::height(&self.root))
    }

    /// Returns `true` if both maps share the same root node.
    ///
    /// Pointer-equal maps are always equal; the converse does not hold.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::new().insert(1, "one");
    /// assert!(map.ptr_eq(&map.remove(&2)));
    /// assert!(!map.ptr_eq(&map.insert(1, "one")));
    /// ```
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.root, &other.root) {
            (Some(left), Some(right)) => ReferenceCounter::ptr_eq(left, right),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns an iterator over entries in ascending key order.
    ///
    /// The iterator walks the tree with an explicit stack and can also be
    /// consumed from the back.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::new()
    ///     .insert(3, "three")
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    ///
    /// let descending: Vec<&i32> = map.iter().rev().map(|(key, _)| key).collect();
    /// assert_eq!(descending, vec![&3, &2, &1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> PersistentAvlMapIterator<'_, K, V> {
        PersistentAvlMapIterator::new(self.root.as_ref(), self.length)
    }

    /// Returns an iterator over keys in ascending order.
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator {
        self.iter().map(|(key, _)| key)
    }

    /// Returns an iterator over values in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::new()
    ///     .insert(1, 10)
    ///     .insert(2, 20)
    ///     .insert(3, 30);
    ///
    /// let sum: i32 = map.values().sum();
    /// assert_eq!(sum, 60);
    /// ```
    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator {
        self.iter().map(|(_, value)| value)
    }

    /// Folds the entries in ascending key order.
    ///
    /// For entries `p1 < p2 < p3` the result is
    /// `combine(combine(combine(init, p1), p2), p3)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::from_list([(2, "b"), (1, "a"), (3, "c")]);
    /// let joined = map.fold_left(String::new(), |mut accumulator, (_, value)| {
    ///     accumulator.push_str(value);
    ///     accumulator
    /// });
    /// assert_eq!(joined, "abc");
    /// ```
    pub fn fold_left<B, F>(&self, init: B, combine: F) -> B
    where
        F: FnMut(B, (&K, &V)) -> B,
    {
        self.iter().fold(init, combine)
    }

    /// Folds the entries from the largest key down.
    ///
    /// For entries `p1 < p2 < p3` the result is
    /// `combine(p1, combine(p2, combine(p3, init)))`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::from_list([(2, 'b'), (1, 'a'), (3, 'c')]);
    /// let keys = map.fold_right(Vec::new(), |(key, _), mut accumulator| {
    ///     accumulator.insert(0, *key);
    ///     accumulator
    /// });
    /// assert_eq!(keys, vec![1, 2, 3]);
    /// ```
    pub fn fold_right<B, F>(&self, init: B, mut combine: F) -> B
    where
        F: FnMut((&K, &V), B) -> B,
    {
        self.iter()
            .rev()
            .fold(init, |accumulator, entry| combine(entry, accumulator))
    }

    /// Returns all entries in ascending key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::new().insert(2, "two").insert(1, "one");
    /// assert_eq!(map.to_list(), vec![(1, "one"), (2, "two")]);
    /// ```
    #[must_use]
    pub fn to_list(&self) -> Vec<(K, V)>
    where
        K: Clone,
        V: Clone,
    {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Returns the entry with the minimum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root.as_deref().map(Node::first)
    }

    /// Returns the entry with the maximum key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root.as_deref().map(Node::last)
    }
}

impl<K: Ord, V> PersistentAvlMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    ///
    /// The key may be any borrowed form of the map's key type, but the
    /// ordering on the borrowed form must match the ordering on the key type.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::new()
    ///     .insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        Node::get(self.root.as_ref(), key)
    }

    /// Returns the value for `key`, or `default` if the key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::singleton(1, 10);
    /// assert_eq!(map.get_or(&1, &0), &10);
    /// assert_eq!(map.get_or(&2, &0), &0);
    /// ```
    #[must_use]
    pub fn get_or<'a, Q>(&'a self, key: &Q, default: &'a V) -> &'a V
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).unwrap_or(default)
    }

    /// Returns `true` if the map contains a value for the specified key.
    ///
    /// # Complexity
    ///
    /// O(log N)
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Checks the AVL search-tree invariants of this map.
    ///
    /// Maps built through this API always validate; the check is meant for
    /// tests and debugging. The first violation found is logged at debug
    /// level and returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantViolation`] found.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map: PersistentAvlMap<i32, i32> = (0..100).map(|key| (key, key)).collect();
    /// assert!(map.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), InvariantViolation> {
        let result = Node::check(self.root.as_ref(), None, None, 0).and_then(|(actual, _)| {
            if actual == self.length {
                Ok(())
            } else {
                Err(InvariantViolation::LengthMismatch {
                    cached: self.length,
                    actual,
                })
            }
        });
        if let Err(violation) = &result {
            tracing::debug!(%violation, "persistent AVL map failed validation");
        }
        result
    }
}

impl<K: Ord, V: PartialEq> PersistentAvlMap<K, V> {
    /// Returns `true` if both maps hold exactly the same entries.
    ///
    /// The trees are walked in lockstep, so the comparison stops at the
    /// first difference and never depends on the shape either tree was
    /// built into.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let first = PersistentAvlMap::from_list([(2, 'b'), (1, 'a'), (3, 'c')]);
    /// let second = PersistentAvlMap::from_list([(3, 'c'), (1, 'a'), (2, 'b')]);
    /// assert!(first.structural_eq(&second));
    /// assert!(!first.structural_eq(&second.insert(2, 'x')));
    /// ```
    #[must_use]
    pub fn structural_eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        if self.length != other.length {
            return false;
        }
        traversal::entries_equal(self.iter(), other.iter())
    }
}

impl<K: Clone + Ord, V: Clone> PersistentAvlMap<K, V> {
    /// Creates a map containing a single key-value pair.
    #[inline]
    #[must_use]
    pub fn singleton(key: K, value: V) -> Self {
        Self::new().insert(key, value)
    }

    /// Builds a map by inserting the pairs in sequence order.
    ///
    /// Later pairs overwrite earlier pairs with the same key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::from_list([(1, "first"), (2, "two"), (1, "last")]);
    /// assert_eq!(map.to_list(), vec![(1, "last"), (2, "two")]);
    /// ```
    #[must_use]
    pub fn from_list<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        pairs.into_iter().collect()
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contains the key, the value is replaced.
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map1 = PersistentAvlMap::new().insert(1, "one");
    /// let map2 = map1.insert(1, "ONE");
    ///
    /// assert_eq!(map1.get(&1), Some(&"one")); // Original unchanged
    /// assert_eq!(map2.get(&1), Some(&"ONE")); // New version
    /// ```
    #[must_use]
    pub fn insert(&self, key: K, value: V) -> Self {
        let (root, added) = Node::insert(self.root.as_ref(), key, value);
        Self {
            root: Some(root),
            length: if added { self.length + 1 } else { self.length },
        }
    }

    /// Removes a key from the map.
    ///
    /// If the key doesn't exist, the returned map shares its root with the
    /// original (see [`ptr_eq`](Self::ptr_eq)).
    ///
    /// # Complexity
    ///
    /// O(log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// let removed = map.remove(&1);
    ///
    /// assert_eq!(map.len(), 2);     // Original unchanged
    /// assert_eq!(removed.len(), 1); // New version
    /// assert_eq!(removed.get(&1), None);
    /// ```
    #[must_use]
    pub fn remove<Q>(&self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.root.as_ref().and_then(|root| Node::remove(root, key)) {
            Some(root) => Self {
                root,
                length: self.length.saturating_sub(1),
            },
            None => self.clone(),
        }
    }

    /// Transforms every entry and collects the results into a new map.
    ///
    /// `transform` is applied in ascending key order and each result is
    /// inserted into an initially empty map. When two entries are mapped to
    /// the same new key, the one with the larger original key wins.
    ///
    /// # Complexity
    ///
    /// O(N log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::from_list([(1, 10), (2, 20), (3, 30)]);
    ///
    /// let negated = map.map(|key, value| (-key, value + 1));
    /// assert_eq!(negated.to_list(), vec![(-3, 31), (-2, 21), (-1, 11)]);
    ///
    /// // Keys 2 and 3 collide; 3 is visited last and wins.
    /// let halved = map.map(|key, value| (key / 2, *value));
    /// assert_eq!(halved.to_list(), vec![(0, 10), (1, 30)]);
    /// ```
    #[must_use]
    pub fn map<L, W, F>(&self, mut transform: F) -> PersistentAvlMap<L, W>
    where
        L: Clone + Ord,
        W: Clone,
        F: FnMut(&K, &V) -> (L, W),
    {
        self.iter()
            .map(|(key, value)| transform(key, value))
            .collect()
    }

    /// Applies a function to all values, keeping keys unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::new()
    ///     .insert(1, 10)
    ///     .insert(2, 20);
    /// let doubled = map.map_values(|v| v * 2);
    /// assert_eq!(doubled.get(&1), Some(&20));
    /// assert_eq!(doubled.get(&2), Some(&40));
    /// ```
    #[must_use]
    pub fn map_values<W, F>(&self, mut transform: F) -> PersistentAvlMap<K, W>
    where
        W: Clone,
        F: FnMut(&V) -> W,
    {
        self.map(|key, value| (key.clone(), transform(value)))
    }

    /// Keeps only entries for which the predicate returns true.
    ///
    /// # Complexity
    ///
    /// O(N log N)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map = PersistentAvlMap::new()
    ///     .insert(1, 10)
    ///     .insert(2, 20)
    ///     .insert(3, 30);
    /// let even_keys = map.filter(|k, _| k % 2 == 0);
    /// assert_eq!(even_keys.len(), 1);
    /// assert_eq!(even_keys.get(&2), Some(&20));
    /// ```
    #[must_use]
    pub fn filter<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&K, &V) -> bool,
    {
        self.iter()
            .filter(|&(key, value)| predicate(key, value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Merges two maps, with values from `other` taking precedence on key conflicts.
    ///
    /// The entries of `other` are inserted into `self` in ascending key
    /// order. The empty map is the identity on both sides, and merging is
    /// associative.
    ///
    /// # Complexity
    ///
    /// O(M log(N + M)) where N is the size of self and M is the size of other
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map1 = PersistentAvlMap::new()
    ///     .insert(1, "one")
    ///     .insert(2, "two");
    /// let map2 = PersistentAvlMap::new()
    ///     .insert(2, "TWO")
    ///     .insert(3, "three");
    /// let merged = map1.merge(&map2);
    /// assert_eq!(merged.get(&1), Some(&"one"));
    /// assert_eq!(merged.get(&2), Some(&"TWO")); // From map2
    /// assert_eq!(merged.get(&3), Some(&"three"));
    /// ```
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if self.is_empty() {
            return other.clone();
        }
        other.fold_left(self.clone(), |merged, (key, value)| {
            merged.insert(key.clone(), value.clone())
        })
    }

    /// Merges two maps with a custom conflict resolver.
    ///
    /// When a key exists in both maps, `resolver` receives the key, the
    /// value from `self` and the value from `other`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    ///
    /// let map1 = PersistentAvlMap::new()
    ///     .insert(1, 100)
    ///     .insert(2, 200);
    /// let map2 = PersistentAvlMap::new()
    ///     .insert(2, 50)
    ///     .insert(3, 300);
    /// let merged = map1.merge_with(&map2, |_, v1, v2| *v1.max(v2));
    /// assert_eq!(merged.get(&1), Some(&100));
    /// assert_eq!(merged.get(&2), Some(&200)); // max(200, 50)
    /// assert_eq!(merged.get(&3), Some(&300));
    /// ```
    #[must_use]
    pub fn merge_with<F>(&self, other: &Self, mut resolver: F) -> Self
    where
        F: FnMut(&K, &V, &V) -> V,
    {
        other.fold_left(self.clone(), |merged, (key, other_value)| {
            let value = merged.get(key).map_or_else(
                || other_value.clone(),
                |self_value| resolver(key, self_value, other_value),
            );
            merged.insert(key.clone(), value)
        })
    }
}

// =============================================================================
// Owning Iterator
// =============================================================================

/// An owning iterator over key-value pairs of a [`PersistentAvlMap`].
///
/// Entries are cloned out of the tree, since its nodes may be shared with
/// other maps.
pub struct PersistentAvlMapIntoIterator<K, V> {
    entries: std::vec::IntoIter<(K, V)>,
}

impl<K, V> Iterator for PersistentAvlMapIntoIterator<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for PersistentAvlMapIntoIterator<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.entries.next_back()
    }
}

impl<K, V> ExactSizeIterator for PersistentAvlMapIntoIterator<K, V> {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V> Default for PersistentAvlMap<K, V> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Ord, V: Clone> FromIterator<(K, V)> for PersistentAvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Clone + Ord, V: Clone> Extend<(K, V)> for PersistentAvlMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            *self = self.insert(key, value);
        }
    }
}

impl<K: Clone, V: Clone> IntoIterator for PersistentAvlMap<K, V> {
    type Item = (K, V);
    type IntoIter = PersistentAvlMapIntoIterator<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        PersistentAvlMapIntoIterator {
            entries: self.to_list().into_iter(),
        }
    }
}

impl<'a, K, V> IntoIterator for &'a PersistentAvlMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = PersistentAvlMapIterator<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for PersistentAvlMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

impl<K: Ord, V: Eq> Eq for PersistentAvlMap<K, V> {}

/// Computes a hash value for this map.
///
/// The length is hashed first, then each (key, value) pair in key order, so
/// maps that compare equal hash equally whatever their tree shape. Keys are
/// compared with `Ord`, so `K`'s `Hash` must agree with its `Ord`.
impl<K: Hash, V: Hash> Hash for PersistentAvlMap<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.length.hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for PersistentAvlMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for PersistentAvlMap<K, V> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

// =============================================================================
// Type Class Implementations
// =============================================================================

/// Right-biased union: on a shared key the value from `other` wins.
impl<K: Clone + Ord, V: Clone> Semigroup for PersistentAvlMap<K, V> {
    fn combine(self, other: Self) -> Self {
        self.merge(&other)
    }

    fn combine_ref(&self, other: &Self) -> Self {
        self.merge(other)
    }
}

impl<K: Clone + Ord, V: Clone> Monoid for PersistentAvlMap<K, V> {
    fn empty() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_map() {
        let map: PersistentAvlMap<i32, String> = PersistentAvlMap::new();
        assert_eq!(format!("{map}"), "{}");
    }

    #[rstest]
    fn test_display_single_element_map() {
        let map = PersistentAvlMap::singleton(1, "one".to_string());
        assert_eq!(format!("{map}"), "{1: one}");
    }

    #[rstest]
    fn test_display_multiple_elements_sorted() {
        let map = PersistentAvlMap::new()
            .insert(3, "three".to_string())
            .insert(1, "one".to_string())
            .insert(2, "two".to_string());
        assert_eq!(format!("{map}"), "{1: one, 2: two, 3: three}");
    }

    #[rstest]
    fn test_debug_uses_map_form() {
        let map = PersistentAvlMap::new().insert(2, "b").insert(1, "a");
        assert_eq!(format!("{map:?}"), r#"{1: "a", 2: "b"}"#);
    }

    // =========================================================================
    // Persistence Tests
    // =========================================================================

    #[rstest]
    fn test_remove_absent_key_shares_root() {
        let map: PersistentAvlMap<i32, i32> = (0..10).map(|key| (key, key)).collect();
        let removed = map.remove(&42);
        assert!(removed.ptr_eq(&map));
        assert_eq!(removed.len(), map.len());
    }

    #[rstest]
    fn test_remove_from_empty_map_shares_root() {
        let map: PersistentAvlMap<i32, i32> = PersistentAvlMap::new();
        assert!(map.remove(&1).ptr_eq(&map));
    }

    #[rstest]
    fn test_insert_shares_untouched_subtree() {
        let map: PersistentAvlMap<i32, i32> = (1..=7).map(|key| (key, key)).collect();
        let updated = map.insert(7, 70);

        let original_left = map.root.as_ref().and_then(|root| root.left.as_ref());
        let updated_left = updated.root.as_ref().and_then(|root| root.left.as_ref());
        assert!(ReferenceCounter::ptr_eq(
            original_left.unwrap(),
            updated_left.unwrap()
        ));
        assert_eq!(map.get(&7), Some(&7));
        assert_eq!(updated.get(&7), Some(&70));
    }

    #[rstest]
    fn test_merge_with_empty_left_shares_other() {
        let empty: PersistentAvlMap<i32, i32> = PersistentAvlMap::new();
        let other = PersistentAvlMap::singleton(1, 1);
        assert!(empty.merge(&other).ptr_eq(&other));
    }

    #[rstest]
    fn test_merge_with_empty_right_shares_self() {
        let map = PersistentAvlMap::singleton(1, 1);
        let empty = PersistentAvlMap::new();
        assert!(map.merge(&empty).ptr_eq(&map));
    }

    // =========================================================================
    // Validation Tests
    // =========================================================================

    #[rstest]
    fn test_validate_accepts_built_maps() {
        let map: PersistentAvlMap<i32, i32> =
            (0..500).map(|index| ((index * 131) % 500, index)).collect();
        assert_eq!(map.validate(), Ok(()));
        let thinned = (0..500)
            .step_by(3)
            .fold(map, |map, key| map.remove(&key));
        assert_eq!(thinned.validate(), Ok(()));
    }

    #[rstest]
    fn test_validate_reports_length_mismatch() {
        let map = PersistentAvlMap::new().insert(1, 1).insert(2, 2);
        let corrupted = PersistentAvlMap {
            root: map.root.clone(),
            length: 5,
        };
        assert_eq!(
            corrupted.validate(),
            Err(InvariantViolation::LengthMismatch {
                cached: 5,
                actual: 2
            })
        );
    }

    // =========================================================================
    // Equality Tests
    // =========================================================================

    #[rstest]
    fn test_structural_eq_differing_shapes() {
        let ascending: PersistentAvlMap<i32, i32> = (0..32).map(|key| (key, key)).collect();
        let descending: PersistentAvlMap<i32, i32> =
            (0..32).rev().map(|key| (key, key)).collect();
        assert!(ascending.structural_eq(&descending));
        assert_eq!(ascending, descending);
    }

    #[rstest]
    fn test_structural_eq_same_length_different_keys() {
        let first = PersistentAvlMap::from_list([(1, 'a'), (2, 'b')]);
        let second = PersistentAvlMap::from_list([(1, 'a'), (3, 'b')]);
        assert!(!first.structural_eq(&second));
    }

    #[rstest]
    fn test_structural_eq_float_values_use_partial_eq() {
        let first = PersistentAvlMap::singleton(1, f64::NAN);
        let second = PersistentAvlMap::singleton(1, f64::NAN);
        assert!(!first.structural_eq(&second));
    }

    #[rstest]
    fn test_hash_agrees_with_equality_across_histories() {
        use std::collections::hash_map::DefaultHasher;

        fn hash_of(map: &PersistentAvlMap<String, i32>) -> u64 {
            let mut hasher = DefaultHasher::new();
            map.hash(&mut hasher);
            hasher.finish()
        }

        let grown: PersistentAvlMap<String, i32> = (0..16)
            .map(|index| (format!("key{index:02}"), index))
            .collect::<PersistentAvlMap<_, _>>()
            .remove("key00")
            .remove("key15");
        let direct: PersistentAvlMap<String, i32> = (1..15)
            .rev()
            .map(|index| (format!("key{index:02}"), index))
            .collect();

        assert_eq!(grown, direct);
        assert_eq!(hash_of(&grown), hash_of(&direct));
        assert_ne!(hash_of(&grown), hash_of(&direct.remove("key07")));
    }

    // =========================================================================
    // Type Class Tests
    // =========================================================================

    #[rstest]
    fn test_combine_is_right_biased() {
        let left = PersistentAvlMap::from_list([(1, "left"), (2, "left")]);
        let right = PersistentAvlMap::from_list([(2, "right"), (3, "right")]);
        let combined = left.combine(right);
        assert_eq!(
            combined.to_list(),
            vec![(1, "left"), (2, "right"), (3, "right")]
        );
    }

    #[rstest]
    fn test_combine_all_folds_from_empty() {
        let maps = vec![
            PersistentAvlMap::singleton(1, 'a'),
            PersistentAvlMap::singleton(2, 'b'),
            PersistentAvlMap::singleton(1, 'c'),
        ];
        let combined = PersistentAvlMap::combine_all(maps);
        assert_eq!(combined.to_list(), vec![(1, 'c'), (2, 'b')]);
    }

    #[rstest]
    fn test_empty_is_identity_value() {
        let empty: PersistentAvlMap<i32, i32> = Monoid::empty();
        assert!(empty.is_empty_value());
        assert!(!PersistentAvlMap::singleton(1, 1).is_empty_value());
    }
}

// =============================================================================
// Multithread Tests (arc feature only)
// =============================================================================
