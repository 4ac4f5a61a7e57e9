//! Semigroup type class - types with an associative binary operation.
//!
//! A semigroup is a set together with an associative binary operation. In
//! this crate the persistent map is a semigroup under right-biased union.
//!
//! # Laws
//!
//! For all `a`, `b`, `c` of type `T`:
//!
//! ## Associativity
//!
//! ```text
//! (a.combine(b)).combine(c) == a.combine(b.combine(c))
//! ```
//!
//! # Examples
//!
//! ```rust
//! use persistent_avl::persistent::PersistentAvlMap;
//! use persistent_avl::typeclass::Semigroup;
//!
//! let defaults = PersistentAvlMap::from_list([("color", "red"), ("size", "m")]);
//! let overrides = PersistentAvlMap::singleton("size", "xl");
//!
//! let settings = defaults.combine(overrides);
//! assert_eq!(settings.get("size"), Some(&"xl"));
//! assert_eq!(settings.get("color"), Some(&"red"));
//! ```

/// A type class for types with an associative binary operation.
///
/// # Laws
///
/// All implementations must satisfy:
///
/// ## Associativity
///
/// For all `a`, `b`, `c`:
/// ```text
/// (a.combine(b)).combine(c) == a.combine(b.combine(c))
/// ```
pub trait Semigroup {
    /// Combines two values into one.
    ///
    /// This operation must be associative.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    /// use persistent_avl::typeclass::Semigroup;
    ///
    /// let left = PersistentAvlMap::singleton(1, "left");
    /// let right = PersistentAvlMap::singleton(1, "right");
    /// assert_eq!(left.combine(right).get(&1), Some(&"right"));
    /// ```
    #[must_use]
    fn combine(self, other: Self) -> Self;

    /// Combines two values by reference, returning a new value.
    ///
    /// The default implementation clones both values and calls `combine`.
    /// Types can override this for more efficient implementations.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    /// use persistent_avl::typeclass::Semigroup;
    ///
    /// let left = PersistentAvlMap::singleton(1, 'a');
    /// let right = PersistentAvlMap::singleton(2, 'b');
    /// let combined = left.combine_ref(&right);
    /// // Original values are still available
    /// assert_eq!(left.len(), 1);
    /// assert_eq!(combined.len(), 2);
    /// ```
    #[must_use]
    fn combine_ref(&self, other: &Self) -> Self
    where
        Self: Clone,
    {
        self.clone().combine(other.clone())
    }

    /// Combines a value with itself `n` times.
    ///
    /// `combine_n(x, 1)` returns `x`.
    /// `combine_n(x, 2)` returns `x.combine(x)`.
    ///
    /// # Panics
    ///
    /// Panics if `count` is 0.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use persistent_avl::persistent::PersistentAvlMap;
    /// use persistent_avl::typeclass::Semigroup;
    ///
    /// // Union is idempotent
    /// let map = PersistentAvlMap::from_list([(1, 'a'), (2, 'b')]);
    /// assert_eq!(map.clone().combine_n(3), map);
    /// ```
    #[must_use]
    fn combine_n(self, count: usize) -> Self
    where
        Self: Clone,
    {
        assert!(count > 0, "combine_n requires count > 0");

        if count == 1 {
            return self;
        }

        let mut result = self.clone();
        for _ in 1..count {
            result = result.combine(self.clone());
        }
        result
    }

    /// Reduces all elements in an iterator using the semigroup operation.
    ///
    /// Returns `None` if the iterator is empty.
    /// For a version that returns a default value for empty iterators, see
    /// [`Monoid::combine_all`](super::Monoid::combine_all).
    fn reduce_all<I>(iterator: I) -> Option<Self>
    where
        I: IntoIterator<Item = Self>,
        Self: Sized,
    {
        iterator
            .into_iter()
            .reduce(|accumulator, element| accumulator.combine(element))
    }
}
