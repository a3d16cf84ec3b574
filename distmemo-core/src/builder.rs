//! Builder utilities for configuring [`DistanceMap`] instances.
//!
//! Exposes the lookup policy and neighbour ordering selection surface along
//! with the random seed used for sampling.

use std::hash::Hash;

use rand::{SeedableRng, rngs::SmallRng};

use crate::{map::DistanceMap, measurable::Measurable};

/// Decides when [`DistanceMap::distance`] consults the cache and when it
/// falls through to a raw [`Measurable::distance_to`] call.
///
/// A bypassed lookup neither stores its result nor registers anything.
///
/// # Examples
/// ```
/// use distmemo_core::LookupPolicy;
///
/// assert_eq!(LookupPolicy::default(), LookupPolicy::AutoRegister);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum LookupPolicy {
    /// Bypass when the first element is unregistered. An unregistered second
    /// element is registered on demand and the result is cached both ways.
    ///
    /// This departs from the historical rule kept in
    /// [`LookupPolicy::SourceCompatible`]: lookups between two registered
    /// elements are served from the cache instead of being recomputed.
    #[default]
    AutoRegister,
    /// Bypass unless both elements are registered. Nothing is ever registered
    /// implicitly.
    RegisteredOnly,
    /// Bypass when the first element is unregistered or the second element is
    /// already registered.
    ///
    /// Only the first lookup against an unregistered second element is cached;
    /// once registered, later lookups between the pair are recomputed. Kept for
    /// callers that depend on the historical behaviour.
    SourceCompatible,
}

/// Ordering applied by [`DistanceMap::close_elements`].
///
/// # Examples
/// ```
/// use distmemo_core::CloseOrdering;
///
/// assert_eq!(CloseOrdering::default(), CloseOrdering::TruncatedDifference);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum CloseOrdering {
    /// Compare candidates by the integer part of the difference between their
    /// distances. Differences smaller than `1.0` compare equal, so the result is
    /// only approximately sorted.
    ///
    /// A NaN difference truncates to zero, so a NaN distance compares equal to
    /// every other distance and stays where the registry placed it. Elements
    /// at NaN distance can therefore appear anywhere in the ranking, ahead of
    /// finite ones included.
    #[default]
    TruncatedDifference,
    /// Compare candidates by their exact distances using [`f64::total_cmp`].
    Strict,
}

/// Configures and constructs [`DistanceMap`] instances.
///
/// # Examples
/// ```
/// use distmemo_core::{CloseOrdering, DistanceMap, DistanceMapBuilder, LookupPolicy, Measurable};
///
/// #[derive(PartialEq, Eq, Hash)]
/// struct Tick(i32);
///
/// impl Measurable for Tick {
///     fn distance_to(&self, other: &Self) -> f64 {
///         f64::from(self.0.abs_diff(other.0))
///     }
/// }
///
/// let map: DistanceMap<Tick> = DistanceMapBuilder::new()
///     .with_lookup_policy(LookupPolicy::RegisteredOnly)
///     .with_close_ordering(CloseOrdering::Strict)
///     .with_rng_seed(7)
///     .build();
/// assert_eq!(map.lookup_policy(), LookupPolicy::RegisteredOnly);
/// assert_eq!(map.close_ordering(), CloseOrdering::Strict);
/// assert!(map.is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct DistanceMapBuilder {
    lookup_policy: LookupPolicy,
    close_ordering: CloseOrdering,
    rng_seed: Option<u64>,
    capacity: usize,
}

impl DistanceMapBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use distmemo_core::{CloseOrdering, DistanceMapBuilder, LookupPolicy};
    ///
    /// let builder = DistanceMapBuilder::new();
    /// assert_eq!(builder.lookup_policy(), LookupPolicy::AutoRegister);
    /// assert_eq!(builder.close_ordering(), CloseOrdering::TruncatedDifference);
    /// assert_eq!(builder.rng_seed(), None);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the cache lookup policy.
    #[must_use]
    pub fn with_lookup_policy(mut self, policy: LookupPolicy) -> Self {
        self.lookup_policy = policy;
        self
    }

    /// Returns the configured lookup policy.
    #[must_use]
    pub fn lookup_policy(&self) -> LookupPolicy {
        self.lookup_policy
    }

    /// Overrides the ordering used when ranking close elements.
    #[must_use]
    pub fn with_close_ordering(mut self, ordering: CloseOrdering) -> Self {
        self.close_ordering = ordering;
        self
    }

    /// Returns the configured close-element ordering.
    #[must_use]
    pub fn close_ordering(&self) -> CloseOrdering {
        self.close_ordering
    }

    /// Seeds the generator behind [`DistanceMap::random_element`].
    ///
    /// A seeded map also ranks the eligible elements by a fixed-key hash of
    /// their values before drawing, so two maps with the same seed and the
    /// same registered values produce the same sequence of draws regardless of
    /// insertion order. Unseeded maps draw from registry order.
    ///
    /// # Examples
    /// ```
    /// use distmemo_core::DistanceMapBuilder;
    ///
    /// let builder = DistanceMapBuilder::new().with_rng_seed(42);
    /// assert_eq!(builder.rng_seed(), Some(42));
    /// ```
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Returns the configured seed, if any.
    #[must_use]
    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Pre-sizes the registry for `capacity` elements.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Returns the configured registry capacity hint.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Constructs an empty [`DistanceMap`] with this configuration.
    #[must_use]
    pub fn build<T>(self) -> DistanceMap<T>
    where
        T: Measurable + Eq + Hash,
    {
        let rng = self
            .rng_seed
            .map_or_else(SmallRng::from_entropy, SmallRng::seed_from_u64);
        DistanceMap::from_parts(
            self.capacity,
            self.lookup_policy,
            self.close_ordering,
            rng,
            self.rng_seed.is_some(),
        )
    }
}
