//! Registry and memoized lookup for pairwise distances.
//!
//! The map keeps one row per registered element. A row maps other elements
//! to their cached distance; both directions of a pair are written together
//! the first time the pair is computed, so each unordered pair pays for at
//! most one [`Measurable::distance_to`] call until either side is removed
//! or updated.

mod neighbours;


use std::{collections::HashMap, fmt, hash::Hash, sync::Arc};

use rand::rngs::SmallRng;
use tracing::{debug, trace, warn};

use crate::{
    builder::{CloseOrdering, DistanceMapBuilder, LookupPolicy},
    measurable::Measurable,
    stats::CacheStats,
};

type Row<T> = HashMap<Arc<T>, f64>;

/// Memoizing cache of distances between registered elements.
///
/// Elements are held as `Arc<T>`: the registry hashes and compares them by
/// value, and the neighbour queries use [`Arc::ptr_eq`] where identity
/// matters. The map is single-threaded; every lookup takes `&mut self`
/// because a miss writes to the registry. Wrap it in a `Mutex` to share it.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use distmemo_core::{DistanceMap, Measurable};
///
/// #[derive(Debug, PartialEq, Eq, Hash)]
/// struct Point(i64, i64);
///
/// impl Measurable for Point {
///     fn distance_to(&self, other: &Self) -> f64 {
///         let dx = (self.0 - other.0) as f64;
///         let dy = (self.1 - other.1) as f64;
///         dx.hypot(dy)
///     }
/// }
///
/// let origin = Arc::new(Point(0, 0));
/// let corner = Arc::new(Point(3, 4));
///
/// let mut map = DistanceMap::new();
/// map.add(Arc::clone(&origin));
/// assert_eq!(map.distance(&origin, &corner), 5.0);
///
/// // The second argument was registered on demand and the value cached.
/// assert!(map.contains(&corner));
/// assert_eq!(map.cached_distance(&corner, &origin), Some(5.0));
/// ```
pub struct DistanceMap<T> {
    rows: HashMap<Arc<T>, Row<T>>,
    policy: LookupPolicy,
    ordering: CloseOrdering,
    rng: SmallRng,
    seeded: bool,
    stats: CacheStats,
}

impl<T> DistanceMap<T>
where
    T: Measurable + Eq + Hash,
{
    /// Creates an empty map with the default configuration.
    ///
    /// Use [`DistanceMapBuilder`] to pick a different [`LookupPolicy`],
    /// [`CloseOrdering`] or random seed.
    #[must_use]
    pub fn new() -> Self {
        DistanceMapBuilder::new().build()
    }

    pub(crate) fn from_parts(
        capacity: usize,
        policy: LookupPolicy,
        ordering: CloseOrdering,
        rng: SmallRng,
        seeded: bool,
    ) -> Self {
        Self {
            rows: HashMap::with_capacity(capacity),
            policy,
            ordering,
            rng,
            seeded,
            stats: CacheStats::default(),
        }
    }

    /// Returns the distance between `left` and `right`, consulting the cache
    /// as allowed by the configured [`LookupPolicy`].
    ///
    /// On a miss the distance is computed once and written under both
    /// `left → right` and `right → left`. Under [`LookupPolicy::AutoRegister`]
    /// and [`LookupPolicy::SourceCompatible`] a miss also registers `right` if
    /// it was unknown; this is the only implicit registration in the crate.
    /// A bypassed lookup returns the raw distance and leaves the map unchanged
    /// apart from its counters.
    ///
    /// Distances are stored as reported. Non-finite values are logged at
    /// `warn` but still cached.
    pub fn distance(&mut self, left: &Arc<T>, right: &Arc<T>) -> f64 {
        if self.bypasses(left, right) {
            self.stats.record_bypass();
            trace!(policy = ?self.policy, "distance lookup bypassed cache");
            return left.distance_to(right);
        }

        if let Some(&cached) = self.rows.get(left).and_then(|row| row.get(right)) {
            self.stats.record_hit();
            return cached;
        }

        let value = left.distance_to(right);
        if !value.is_finite() {
            warn!(%value, "caching non-finite distance");
        }
        let registering = !self.rows.contains_key(right);
        self.rows
            .entry(Arc::clone(right))
            .or_default()
            .insert(Arc::clone(left), value);
        if let Some(row) = self.rows.get_mut(left) {
            row.insert(Arc::clone(right), value);
        }
        self.stats.record_miss();
        trace!(
            %value,
            registered = registering,
            elements = self.rows.len(),
            "distance computed and cached"
        );
        value
    }

    /// Like [`Self::distance`], but accepts absent arguments.
    ///
    /// Returns [`f64::INFINITY`] when either side is `None`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use distmemo_core::{DistanceMap, Measurable};
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
    /// let mut map = DistanceMap::new();
    /// let tick = Arc::new(Tick(1));
    /// assert_eq!(map.distance_between(Some(&tick), None), f64::INFINITY);
    /// assert_eq!(map.distance_between(Some(&tick), Some(&tick)), 0.0);
    /// ```
    pub fn distance_between(&mut self, left: Option<&Arc<T>>, right: Option<&Arc<T>>) -> f64 {
        match (left, right) {
            (Some(left), Some(right)) => self.distance(left, right),
            _ => f64::INFINITY,
        }
    }

    fn bypasses(&self, left: &T, right: &T) -> bool {
        let left_known = self.rows.contains_key(left);
        match self.policy {
            LookupPolicy::AutoRegister => !left_known,
            LookupPolicy::RegisteredOnly => !left_known || !self.rows.contains_key(right),
            LookupPolicy::SourceCompatible => !left_known || self.rows.contains_key(right),
        }
    }

    /// Returns the cached distance between `left` and `right` without
    /// computing or registering anything.
    #[must_use]
    pub fn cached_distance(&self, left: &T, right: &T) -> Option<f64> {
        self.rows.get(left)?.get(right).copied()
    }

    /// Number of directed distance entries currently held across all rows.
    ///
    /// A pair filled by a lookup contributes two entries, a self-distance one.
    #[must_use]
    pub fn cached_entries(&self) -> usize {
        self.rows.values().map(HashMap::len).sum()
    }

    /// Returns `true` when `element` is registered.
    #[must_use]
    pub fn contains(&self, element: &T) -> bool {
        self.rows.contains_key(element)
    }

    /// Number of registered elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Registers `element` with an empty row.
    ///
    /// Re-adding a registered element discards its own row. Rows of other
    /// elements keep their entries for it; use [`Self::update`] to drop those
    /// too. The originally registered handle stays the key.
    pub fn add(&mut self, element: Arc<T>) {
        let previous = self.rows.insert(element, Row::new());
        debug!(
            replaced = previous.is_some(),
            elements = self.rows.len(),
            "registered element"
        );
    }

    /// Unregisters `element` and purges its cached distances from every
    /// other row.
    ///
    /// Returns whether `element` was registered. Costs one probe per
    /// registered element.
    pub fn remove(&mut self, element: &T) -> bool {
        let removed = self.rows.remove(element).is_some();
        let purged = self
            .rows
            .values_mut()
            .filter_map(|row| row.remove(element))
            .count();
        CacheStats::record_purge(purged);
        debug!(
            removed,
            purged,
            elements = self.rows.len(),
            "unregistered element"
        );
        removed
    }

    /// Forgets every cached distance involving `element` and leaves it
    /// registered with an empty row.
    ///
    /// Equivalent to [`Self::remove`] followed by [`Self::add`].
    pub fn update(&mut self, element: Arc<T>) {
        self.remove(&element);
        self.add(element);
    }

    /// Unregisters every element.
    pub fn clear(&mut self) {
        let elements = self.rows.len();
        self.rows.clear();
        debug!(elements, "cleared distance map");
    }

    /// Snapshot of the registered elements in unspecified order.
    #[must_use]
    pub fn elements(&self) -> Vec<Arc<T>> {
        self.rows.keys().cloned().collect()
    }

    /// Iterates over the registered elements in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<T>> {
        self.rows.keys()
    }

    /// Returns the active lookup policy.
    #[must_use]
    pub fn lookup_policy(&self) -> LookupPolicy {
        self.policy
    }

    /// Returns the active close-element ordering.
    #[must_use]
    pub fn close_ordering(&self) -> CloseOrdering {
        self.ordering
    }

    /// Returns the lookup counters accumulated since construction or the
    /// last [`Self::reset_stats`].
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Zeroes the lookup counters.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }
}

impl<T> Default for DistanceMap<T>
where
    T: Measurable + Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DistanceMap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DistanceMap")
            .field("elements", &self.rows.len())
            .field("policy", &self.policy)
            .field("ordering", &self.ordering)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<T> Extend<Arc<T>> for DistanceMap<T>
where
    T: Measurable + Eq + Hash,
{
    fn extend<I: IntoIterator<Item = Arc<T>>>(&mut self, iter: I) {
        for element in iter {
            self.add(element);
        }
    }
}

impl<T> FromIterator<Arc<T>> for DistanceMap<T>
where
    T: Measurable + Eq + Hash,
{
    fn from_iter<I: IntoIterator<Item = Arc<T>>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}
