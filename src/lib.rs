//! # persistent-avl
//!
//! A persistent ordered map for Rust, built on an AVL tree with structural
//! sharing.
//!
//! ## Overview
//!
//! - **Persistent Map**: [`PersistentAvlMap`](persistent::PersistentAvlMap),
//!   an immutable ordered map where every update returns a new version that
//!   shares all untouched subtrees with the old one
//! - **Type Classes**: [`Semigroup`](typeclass::Semigroup) and
//!   [`Monoid`](typeclass::Monoid), implemented by the map as right-biased union
//!
//! ## Feature Flags
//!
//! - `typeclass`: Semigroup and Monoid traits
//! - `persistent`: The persistent map (enables `typeclass`)
//! - `arc`: Use `Arc` instead of `Rc` for nodes, making maps `Send + Sync`
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use persistent_avl::prelude::*;
//!
//! let v1 = PersistentAvlMap::from_list([(2, "two"), (1, "one"), (3, "three")]);
//! let v2 = v1.remove(&3).insert(4, "four");
//!
//! assert_eq!(v1.to_list(), vec![(1, "one"), (2, "two"), (3, "three")]);
//! assert_eq!(v2.to_list(), vec![(1, "one"), (2, "two"), (4, "four")]);
//! assert_eq!(v1.combine_ref(&v2).len(), 4);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
// Note: Disabling redundant_closure_for_method_calls due to clippy 0.1.92 panic bug
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports commonly used types and traits.
///
/// # Usage
///
/// ```rust
/// use persistent_avl::prelude::*;
/// ```
pub mod prelude {

    #[cfg(feature = "typeclass")]
    pub use crate::typeclass::*;

    #[cfg(feature = "persistent")]
    pub use crate::persistent::*;
}

#[cfg(feature = "typeclass")]
pub mod typeclass;

#[cfg(feature = "persistent")]
pub mod persistent;
