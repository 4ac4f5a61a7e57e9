//! Error types for the persistent map.
//!
//! The map operations themselves are total; the only error surfaced by this
//! crate is an [`InvariantViolation`], reported by
//! [`PersistentAvlMap::validate`](super::PersistentAvlMap::validate) when a
//! tree does not satisfy the AVL search-tree invariants.

use thiserror::Error;

/// Describes the first broken invariant found while validating a map.
///
/// Depths are measured from the root, which is at depth 0.
///
/// # Examples
///
/// ```rust
/// use persistent_avl::persistent::InvariantViolation;
///
/// let violation = InvariantViolation::Unbalanced {
///     depth: 2,
///     balance_factor: -2,
/// };
/// assert_eq!(
///     violation.to_string(),
///     "subtree at depth 2 is unbalanced (balance factor -2)"
/// );
/// ```
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key is not strictly between the keys of its ancestors.
    #[error("key at depth {depth} is out of order")]
    Unordered {
        /// Depth of the misplaced node.
        depth: usize,
    },
    /// The heights of a node's subtrees differ by more than one.
    #[error("subtree at depth {depth} is unbalanced (balance factor {balance_factor})")]
    Unbalanced {
        /// Depth of the unbalanced node.
        depth: usize,
        /// `height(left) - height(right)` at that node.
        balance_factor: i16,
    },
    /// A node's cached height does not match the heights of its subtrees.
    #[error("node at depth {depth} caches height {cached}, expected {actual}")]
    StaleHeight {
        /// Depth of the node.
        depth: usize,
        /// The height stored in the node.
        cached: u8,
        /// The height computed from its subtrees.
        actual: u8,
    },
    /// The map's cached length does not match the number of nodes.
    #[error("map caches length {cached} but holds {actual} entries")]
    LengthMismatch {
        /// The length stored in the map.
        cached: usize,
        /// The number of nodes reachable from the root.
        actual: usize,
    },
}
