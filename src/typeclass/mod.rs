//! Type class traits for algebraic structures.
//!
//! - [`Semigroup`]: Associative binary operations (`combine`)
//! - [`Monoid`]: Semigroup with identity element (`empty`)
//!
//! [`PersistentAvlMap`](crate::persistent::PersistentAvlMap) is a monoid
//! under right-biased union with the empty map as identity, so a sequence of
//! maps can be layered with [`Monoid::combine_all`].
//!
//! # Examples
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlMap;
//! use persistent_avl::typeclass::{Monoid, Semigroup};
//!
//! let base = PersistentAvlMap::from_list([(1, 'a'), (2, 'b')]);
//! let patch = PersistentAvlMap::singleton(2, 'z');
//!
//! let patched = base.combine_ref(&patch);
//! assert_eq!(patched.to_list(), vec![(1, 'a'), (2, 'z')]);
//!
//! let layered = PersistentAvlMap::combine_all([base, patch, PersistentAvlMap::empty()]);
//! assert_eq!(layered, patched);
//! ```

mod monoid;
mod semigroup;

pub use monoid::Monoid;
pub use semigroup::Semigroup;
