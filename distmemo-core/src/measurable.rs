//! The element contract consumed by [`crate::DistanceMap`].

/// A value that can report its distance to another value of the same type.
///
/// Implementations are expected to be expensive; that is the reason the map
/// exists. The map relies on, but never checks, two properties:
///
/// - distances are non-negative;
/// - `a.distance_to(b) == b.distance_to(a)`.
///
/// Elements are registered as `Arc<Self>`. Hashing and equality are taken
/// from `Self` through the `Arc`, while identity-sensitive queries such as
/// [`crate::DistanceMap::closest`] compare handles with [`std::sync::Arc::ptr_eq`].
///
/// # Examples
/// ```
/// use distmemo_core::Measurable;
///
/// #[derive(Debug, PartialEq, Eq, Hash)]
/// struct Level(u32);
///
/// impl Measurable for Level {
///     fn distance_to(&self, other: &Self) -> f64 {
///         f64::from(self.0.abs_diff(other.0))
///     }
/// }
///
/// assert_eq!(Level(3).distance_to(&Level(7)), 4.0);
/// ```
pub trait Measurable {
    /// Computes the distance between `self` and `other`.
    fn distance_to(&self, other: &Self) -> f64;
}
