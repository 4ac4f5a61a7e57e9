//! AVL node and rebalancing engine.
//!
//! Every operation here is persistent: nodes are never mutated, the path from
//! the touched leaf to the root is rebuilt, and every subtree off that path is
//! shared with the input tree.
//!
//! # Invariants
//!
//! For every node reachable from a root:
//! 1. Keys in `left` are less than `key`, keys in `right` are greater
//! 2. `|height(left) - height(right)| <= 1`
//! 3. `height == 1 + max(height(left), height(right))`, with an empty subtree at height 0

use std::borrow::Borrow;
use std::cmp::Ordering;

use super::ReferenceCounter;
use super::error::InvariantViolation;

/// A possibly empty subtree.
pub(crate) type Link<K, V> = Option<ReferenceCounter<Node<K, V>>>;

// =============================================================================
// Node Definition
// =============================================================================

/// Internal node structure for the AVL tree.
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    height: u8,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

/// Height of a subtree; the empty subtree has height 0.
pub(crate) fn height<K, V>(link: &Link<K, V>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

fn balance_factor<K, V>(left: &Link<K, V>, right: &Link<K, V>) -> i16 {
    i16::from(height(left)) - i16::from(height(right))
}

impl<K, V> Node<K, V> {
    /// The node constructor. Every node in a tree is built here, so the cached
    /// height is always derived from the children actually linked.
    pub(crate) fn new(key: K, value: V, left: Link<K, V>, right: Link<K, V>) -> Self {
        let height = 1 + height(&left).max(height(&right));
        Self {
            key,
            value,
            height,
            left,
            right,
        }
    }

    fn balance_factor(&self) -> i16 {
        balance_factor(&self.left, &self.right)
    }

    /// Looks up `key` by iterative descent.
    pub(crate) fn get<'a, Q>(mut link: Option<&'a ReferenceCounter<Self>>, key: &Q) -> Option<&'a V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        while let Some(node) = link {
            match key.cmp(node.key.borrow()) {
                Ordering::Less => link = node.left.as_ref(),
                Ordering::Greater => link = node.right.as_ref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Returns the leftmost entry of a subtree.
    pub(crate) fn first(mut node: &Self) -> (&K, &V) {
        while let Some(left) = &node.left {
            node = left;
        }
        (&node.key, &node.value)
    }

    /// Returns the rightmost entry of a subtree.
    pub(crate) fn last(mut node: &Self) -> (&K, &V) {
        while let Some(right) = &node.right {
            node = right;
        }
        (&node.key, &node.value)
    }
}

impl<K: Clone, V: Clone> Node<K, V> {
    /// Takes a node apart, moving out of it when this is the last reference
    /// and cloning the entry when the node is still shared.
    fn into_parts(node: ReferenceCounter<Self>) -> (K, V, Link<K, V>, Link<K, V>) {
        match ReferenceCounter::try_unwrap(node) {
            Ok(node) => (node.key, node.value, node.left, node.right),
            Err(shared) => (
                shared.key.clone(),
                shared.value.clone(),
                shared.left.clone(),
                shared.right.clone(),
            ),
        }
    }

    // =========================================================================
    // Rotations
    // =========================================================================

    /// Rotates right around the entry `(key, value)` whose left child is `pivot`.
    ///
    /// ```text
    ///       key            pivot
    ///      /   \           /   \
    ///   pivot   c   =>    a    key
    ///   /   \                 /   \
    ///  a     b               b     c
    /// ```
    fn rotate_right(
        key: K,
        value: V,
        pivot: ReferenceCounter<Self>,
        right: Link<K, V>,
    ) -> ReferenceCounter<Self> {
        let (pivot_key, pivot_value, pivot_left, pivot_right) = Self::into_parts(pivot);
        let lowered = Self::new(key, value, pivot_right, right);
        ReferenceCounter::new(Self::new(
            pivot_key,
            pivot_value,
            pivot_left,
            Some(ReferenceCounter::new(lowered)),
        ))
    }

    /// Rotates left around the entry `(key, value)` whose right child is `pivot`.
    fn rotate_left(
        key: K,
        value: V,
        left: Link<K, V>,
        pivot: ReferenceCounter<Self>,
    ) -> ReferenceCounter<Self> {
        let (pivot_key, pivot_value, pivot_left, pivot_right) = Self::into_parts(pivot);
        let lowered = Self::new(key, value, left, pivot_left);
        ReferenceCounter::new(Self::new(
            pivot_key,
            pivot_value,
            Some(ReferenceCounter::new(lowered)),
            pivot_right,
        ))
    }

    /// Left rotation of a whole subtree; a node without a right child is
    /// returned as is.
    fn rotate_subtree_left(node: ReferenceCounter<Self>) -> ReferenceCounter<Self> {
        if node.right.is_none() {
            return node;
        }
        match Self::into_parts(node) {
            (key, value, left, Some(pivot)) => Self::rotate_left(key, value, left, pivot),
            (key, value, left, None) => ReferenceCounter::new(Self::new(key, value, left, None)),
        }
    }

    /// Right rotation of a whole subtree; a node without a left child is
    /// returned as is.
    fn rotate_subtree_right(node: ReferenceCounter<Self>) -> ReferenceCounter<Self> {
        if node.left.is_none() {
            return node;
        }
        match Self::into_parts(node) {
            (key, value, Some(pivot), right) => Self::rotate_right(key, value, pivot, right),
            (key, value, None, right) => ReferenceCounter::new(Self::new(key, value, None, right)),
        }
    }

    // =========================================================================
    // Rebalancing
    // =========================================================================

    /// Builds the node `(key, value, left, right)` and restores the balance
    /// invariant at it.
    ///
    /// Both subtrees must already be balanced and their heights may differ by
    /// at most two.
    pub(crate) fn rebalance(
        key: K,
        value: V,
        left: Link<K, V>,
        right: Link<K, V>,
    ) -> ReferenceCounter<Self> {
        let factor = balance_factor(&left, &right);
        match (left, right) {
            (Some(pivot), right) if factor > 1 => {
                if pivot.balance_factor() >= 0 {
                    tracing::trace!(target: "persistent_avl::rebalance", rotation = "right");
                    Self::rotate_right(key, value, pivot, right)
                } else {
                    tracing::trace!(target: "persistent_avl::rebalance", rotation = "left-right");
                    Self::rotate_right(key, value, Self::rotate_subtree_left(pivot), right)
                }
            }
            (left, Some(pivot)) if factor < -1 => {
                if pivot.balance_factor() <= 0 {
                    tracing::trace!(target: "persistent_avl::rebalance", rotation = "left");
                    Self::rotate_left(key, value, left, pivot)
                } else {
                    tracing::trace!(target: "persistent_avl::rebalance", rotation = "right-left");
                    Self::rotate_left(key, value, left, Self::rotate_subtree_right(pivot))
                }
            }
            (left, right) => ReferenceCounter::new(Self::new(key, value, left, right)),
        }
    }

    // =========================================================================
    // Insert / Remove
    // =========================================================================

    /// Inserts or replaces `key`.
    ///
    /// Returns the new subtree root and whether a new entry was added.
    pub(crate) fn insert(
        link: Option<&ReferenceCounter<Self>>,
        key: K,
        value: V,
    ) -> (ReferenceCounter<Self>, bool)
    where
        K: Ord,
    {
        let Some(node) = link else {
            return (ReferenceCounter::new(Self::new(key, value, None, None)), true);
        };
        match key.cmp(&node.key) {
            Ordering::Less => {
                let (left, added) = Self::insert(node.left.as_ref(), key, value);
                let rebuilt = Self::rebalance(
                    node.key.clone(),
                    node.value.clone(),
                    Some(left),
                    node.right.clone(),
                );
                (rebuilt, added)
            }
            Ordering::Greater => {
                let (right, added) = Self::insert(node.right.as_ref(), key, value);
                let rebuilt = Self::rebalance(
                    node.key.clone(),
                    node.value.clone(),
                    node.left.clone(),
                    Some(right),
                );
                (rebuilt, added)
            }
            // Same position and children, so the height carries over.
            Ordering::Equal => (
                ReferenceCounter::new(Self::new(
                    key,
                    value,
                    node.left.clone(),
                    node.right.clone(),
                )),
                false,
            ),
        }
    }

    /// Removes `key` from the subtree rooted at `node`.
    ///
    /// Returns `None` when the key is absent, in which case the caller keeps
    /// its existing subtree untouched.
    pub(crate) fn remove<Q>(node: &ReferenceCounter<Self>, key: &Q) -> Option<Link<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match key.cmp(node.key.borrow()) {
            Ordering::Less => {
                let left = Self::remove(node.left.as_ref()?, key)?;
                Some(Some(Self::rebalance(
                    node.key.clone(),
                    node.value.clone(),
                    left,
                    node.right.clone(),
                )))
            }
            Ordering::Greater => {
                let right = Self::remove(node.right.as_ref()?, key)?;
                Some(Some(Self::rebalance(
                    node.key.clone(),
                    node.value.clone(),
                    node.left.clone(),
                    right,
                )))
            }
            Ordering::Equal => Some(Self::remove_root(node)),
        }
    }

    /// Drops the root entry of a subtree, promoting the in-order successor
    /// when both children are present.
    fn remove_root(node: &Self) -> Link<K, V> {
        match (&node.left, &node.right) {
            (None, None) => None,
            (Some(child), None) | (None, Some(child)) => Some(ReferenceCounter::clone(child)),
            (Some(left), Some(right)) => {
                let (key, value, rest) = Self::extract_min(right);
                Some(Self::rebalance(
                    key,
                    value,
                    Some(ReferenceCounter::clone(left)),
                    rest,
                ))
            }
        }
    }

    /// Splits off the minimum entry of a non-empty subtree.
    ///
    /// Returns the minimum key, its value and the rebalanced remainder.
    pub(crate) fn extract_min(node: &Self) -> (K, V, Link<K, V>) {
        match &node.left {
            None => (node.key.clone(), node.value.clone(), node.right.clone()),
            Some(left) => {
                let (key, value, rest) = Self::extract_min(left);
                let rebuilt = Self::rebalance(
                    node.key.clone(),
                    node.value.clone(),
                    rest,
                    node.right.clone(),
                );
                (key, value, Some(rebuilt))
            }
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

impl<K: Ord, V> Node<K, V> {
    /// Checks the search-tree, balance and height invariants of a subtree
    /// whose keys must lie strictly between `lower` and `upper`.
    ///
    /// Returns the number of nodes and the computed height.
    pub(crate) fn check(
        link: Option<&ReferenceCounter<Self>>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
    ) -> Result<(usize, u8), InvariantViolation> {
        let Some(node) = link else {
            return Ok((0, 0));
        };

        if lower.is_some_and(|bound| node.key <= *bound)
            || upper.is_some_and(|bound| node.key >= *bound)
        {
            return Err(InvariantViolation::Unordered { depth });
        }

        let (left_count, left_height) =
            Self::check(node.left.as_ref(), lower, Some(&node.key), depth + 1)?;
        let (right_count, right_height) =
            Self::check(node.right.as_ref(), Some(&node.key), upper, depth + 1)?;

        let balance_factor = i16::from(left_height) - i16::from(right_height);
        if balance_factor.abs() > 1 {
            return Err(InvariantViolation::Unbalanced {
                depth,
                balance_factor,
            });
        }

        let actual = 1 + left_height.max(right_height);
        if node.height != actual {
            return Err(InvariantViolation::StaleHeight {
                depth,
                cached: node.height,
                actual,
            });
        }

        Ok((left_count + right_count + 1, actual))
    }
}

// =============================================================================
// Tests
// =============================================================================
