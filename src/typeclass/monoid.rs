//! Monoid type class - semigroups with an identity element.
//!
//! A monoid extends a semigroup with an identity element `empty` such that
//! combining any value with `empty` on either side yields that value. The
//! identity of the persistent map is the empty map.
//!
//! # Laws
//!
//! For all `a` of type `T`:
//!
//! ```text
//! T::empty().combine(a) == a
//! a.combine(T::empty()) == a
//! ```
//!
//! # Examples
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlMap;
//! use persistent_avl::typeclass::{Monoid, Semigroup};
//!
//! let map = PersistentAvlMap::from_list([(1, "one"), (2, "two")]);
//! assert_eq!(PersistentAvlMap::empty().combine(map.clone()), map);
//! assert_eq!(map.clone().combine(PersistentAvlMap::empty()), map);
//! ```

use super::semigroup::Semigroup;

/// A type class for semigroups with an identity element.
///
/// # Laws
///
/// All implementations must satisfy (in addition to Semigroup laws):
///
/// ## Left Identity
///
/// For all `a`:
/// ```text
/// Self::empty().combine(a) == a
/// ```
///
/// ## Right Identity
///
/// For all `a`:
/// ```text
/// a.combine(Self::empty()) == a
/// ```
pub trait Monoid: Semigroup {
    /// Returns the identity element for this monoid.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    /// use persistent_avl::typeclass::Monoid;
    ///
    /// let map: PersistentAvlMap<i32, i32> = Monoid::empty();
    /// assert!(map.is_empty());
    /// ```
    fn empty() -> Self;

    /// Combines all elements in an iterator, starting from the identity element.
    ///
    /// Unlike [`Semigroup::reduce_all`], this method always returns a value
    /// (the identity element for empty iterators).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    /// use persistent_avl::typeclass::Monoid;
    ///
    /// let layers = vec![
    ///     PersistentAvlMap::singleton("depth", 1),
    ///     PersistentAvlMap::singleton("width", 2),
    ///     PersistentAvlMap::singleton("depth", 3),
    /// ];
    /// let merged = PersistentAvlMap::combine_all(layers);
    /// assert_eq!(merged.to_list(), vec![("depth", 3), ("width", 2)]);
    ///
    /// // Empty iterator returns the identity element
    /// let none: Vec<PersistentAvlMap<&str, i32>> = vec![];
    /// assert!(PersistentAvlMap::combine_all(none).is_empty());
    /// ```
    fn combine_all<I>(iterator: I) -> Self
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .fold(Self::empty(), |accumulator, element| {
                accumulator.combine(element)
            })
    }

    /// Returns whether this value is the identity element.
    fn is_empty_value(&self) -> bool
    where
        Self: PartialEq + Sized,
    {
        *self == Self::empty()
    }
}
