//! Persistent (immutable) ordered map.
//!
//! This module provides [`PersistentAvlMap`], an ordered key-value map backed
//! by a height-balanced (AVL) binary search tree.
//!
//! # Structural Sharing
//!
//! Every "modifying" operation returns a new map. Only the nodes on the path
//! from the root to the touched key are rebuilt; every other subtree is
//! shared with the previous version, so old versions stay valid and cheap to
//! keep around.
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
//! // Structural sharing: the original map is preserved
//! let updated = map.insert(1, "ONE");
//! assert_eq!(map.get(&1), Some(&"one"));     // Original unchanged
//! assert_eq!(updated.get(&1), Some(&"ONE")); // New version
//!
//! // Equality ignores how each tree was built
//! let rebuilt = PersistentAvlMap::from_list([(2, "two"), (3, "three"), (1, "ONE")]);
//! assert_eq!(updated, rebuilt);
//! ```

// =============================================================================
// Reference Counter Type Alias
// =============================================================================

/// Reference-counted smart pointer type.
///
/// When the `arc` feature is enabled, this is `std::sync::Arc`,
/// which is thread-safe but has slightly higher overhead.
///
/// When the `arc` feature is disabled (default), this is `std::rc::Rc`,
/// which is faster but not thread-safe.
#[cfg(feature = "arc")]
pub(crate) type ReferenceCounter<T> = std::sync::Arc<T>;

#[cfg(not(feature = "arc"))]
pub(crate) type ReferenceCounter<T> = std::rc::Rc<T>;

mod avl_map;
mod error;
mod node;
mod traversal;

pub use avl_map::PersistentAvlMap;
pub use avl_map::PersistentAvlMapIntoIterator;
pub use error::InvariantViolation;
pub use traversal::PersistentAvlMapIterator;

// =============================================================================
// Tests
// =============================================================================
