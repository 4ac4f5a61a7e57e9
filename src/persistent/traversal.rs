//! Explicit-stack in-order traversal.
//!
//! [`PersistentAvlMapIterator`] walks a tree without recursion: the front
//! stack holds the path of pending "go left" frames for ascending order, the
//! back stack the mirror image for descending order. Both stacks are bounded
//! by the tree height, so they stay inline for any realistic map.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use smallvec::SmallVec;

use super::ReferenceCounter;
use super::node::Node;

/// Inline stack capacity. An AVL tree of height 32 holds millions of entries.
const INLINE_DEPTH: usize = 32;

type Stack<'a, K, V> = SmallVec<[&'a Node<K, V>; INLINE_DEPTH]>;

/// An iterator over the entries of a [`PersistentAvlMap`](super::PersistentAvlMap)
/// in ascending key order.
///
/// Supports iteration from both ends; each entry is yielded exactly once.
pub struct PersistentAvlMapIterator<'a, K, V> {
    front: Stack<'a, K, V>,
    back: Stack<'a, K, V>,
    remaining: usize,
}

impl<'a, K, V> PersistentAvlMapIterator<'a, K, V> {
    /// Creates an iterator over the tree rooted at `root`, which must hold
    /// exactly `length` entries.
    pub(crate) fn new(root: Option<&'a ReferenceCounter<Node<K, V>>>, length: usize) -> Self {
        let mut iterator = Self {
            front: SmallVec::new(),
            back: SmallVec::new(),
            remaining: length,
        };
        iterator.descend_left(root);
        iterator.descend_right(root);
        iterator
    }

    fn descend_left(&mut self, mut link: Option<&'a ReferenceCounter<Node<K, V>>>) {
        while let Some(node) = link {
            self.front.push(ReferenceCounter::as_ref(node));
            link = node.left.as_ref();
        }
    }

    fn descend_right(&mut self, mut link: Option<&'a ReferenceCounter<Node<K, V>>>) {
        while let Some(node) = link {
            self.back.push(ReferenceCounter::as_ref(node));
            link = node.right.as_ref();
        }
    }
}

impl<'a, K, V> Iterator for PersistentAvlMapIterator<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front.pop()?;
        self.descend_left(node.right.as_ref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for PersistentAvlMapIterator<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back.pop()?;
        self.descend_right(node.left.as_ref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }
}

impl<K, V> ExactSizeIterator for PersistentAvlMapIterator<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for PersistentAvlMapIterator<'_, K, V> {}

impl<K, V> Clone for PersistentAvlMapIterator<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            front: self.front.clone(),
            back: self.back.clone(),
            remaining: self.remaining,
        }
    }
}

/// Walks two trees in lockstep and reports whether they hold the same
/// entries, regardless of shape.
///
/// Keys are compared with [`Ord`], values with [`PartialEq`]. Stops at the
/// first differing entry or as soon as one side runs out before the other.
pub(crate) fn entries_equal<K: Ord, V: PartialEq>(
    mut left: PersistentAvlMapIterator<'_, K, V>,
    mut right: PersistentAvlMapIterator<'_, K, V>,
) -> bool {
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some((left_key, left_value)), Some((right_key, right_value))) => {
                if left_key.cmp(right_key) != Ordering::Equal || left_value != right_value {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
