//! Nearest-neighbour, ranking and sampling queries layered on the cache.
//!
//! Every query goes through [`DistanceMap::distance`], so the configured
//! [`LookupPolicy`](crate::LookupPolicy) decides what gets cached along the way.

use std::{
    cmp::Ordering,
    hash::{DefaultHasher, Hash, Hasher},
    sync::Arc,
};

use rand::seq::SliceRandom;
use tracing::{debug, instrument};

use super::DistanceMap;
use crate::{
    builder::CloseOrdering,
    error::{DistanceMapError, Result},
    measurable::Measurable,
};

impl<T> DistanceMap<T>
where
    T: Measurable + Eq + Hash,
{
    /// Returns the registered element closest to `target`.
    ///
    /// Scans every registered element except the one *identical* to `target`
    /// (the same `Arc` allocation). A distinct handle that merely compares
    /// equal to `target` is a candidate like any other and will usually win
    /// at distance zero.
    ///
    /// Ties keep the first candidate encountered. Registry order is
    /// unspecified, so equidistant candidates may resolve differently across
    /// maps. Candidates at infinite or NaN distance are never returned.
    ///
    /// Returns `None` when no other element is registered.
    #[instrument(
        name = "distmemo.closest",
        level = "debug",
        skip(self, target),
        fields(candidates = self.len()),
    )]
    pub fn closest(&mut self, target: &Arc<T>) -> Option<Arc<T>> {
        let mut minimum = f64::INFINITY;
        let mut closest = None;
        for candidate in self.elements() {
            if Arc::ptr_eq(&candidate, target) {
                continue;
            }
            let distance = self.distance(target, &candidate);
            if distance < minimum {
                minimum = distance;
                closest = Some(candidate);
            }
        }
        closest
    }

    /// Returns `target`'s closest element when the relation is mutual.
    ///
    /// With `c = closest(target)`, yields `c` only if `closest(c)` is
    /// identical to `target`. Costs two full scans.
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
    /// let (a, b, c) = (Arc::new(Tick(0)), Arc::new(Tick(1)), Arc::new(Tick(3)));
    /// let mut map: DistanceMap<Tick> = [&a, &b, &c].into_iter().cloned().collect();
    ///
    /// assert!(map.adjacent(&a).is_some_and(|found| Arc::ptr_eq(&found, &b)));
    /// // `c` is closest to `b`, but `b` prefers `a`.
    /// assert!(map.adjacent(&c).is_none());
    /// ```
    #[instrument(name = "distmemo.adjacent", level = "debug", skip(self, target))]
    pub fn adjacent(&mut self, target: &Arc<T>) -> Option<Arc<T>> {
        let candidate = self.closest(target)?;
        let reciprocal = self.closest(&candidate)?;
        Arc::ptr_eq(&reciprocal, target).then_some(candidate)
    }

    /// Ranks every registered element by distance to `target` and keeps the
    /// closest share.
    ///
    /// `target` itself is not excluded: if registered it ranks among the
    /// candidates. The result holds `max(floor(n * ratio), min(2, n))`
    /// elements for `n` registered, capped at `n`, so at least two whenever
    /// two are registered. Order follows the configured [`CloseOrdering`];
    /// both orderings are stable.
    #[instrument(
        name = "distmemo.close_elements",
        level = "debug",
        skip(self, target),
        fields(candidates = self.len(), ordering = ?self.ordering),
    )]
    pub fn close_elements(&mut self, target: &Arc<T>, ratio: f64) -> Vec<Arc<T>> {
        let mut ranked: Vec<(Arc<T>, f64)> = self
            .elements()
            .into_iter()
            .map(|candidate| {
                let distance = self.distance(target, &candidate);
                (candidate, distance)
            })
            .collect();

        match self.ordering {
            CloseOrdering::Strict => ranked.sort_by(|left, right| left.1.total_cmp(&right.1)),
            CloseOrdering::TruncatedDifference => {
                insertion_sort_by(&mut ranked, |left, right| truncated_cmp(left.1, right.1));
            }
        }

        let keep = close_count(ranked.len(), ratio);
        ranked.truncate(keep);
        debug!(kept = keep, "ranked close elements");
        ranked.into_iter().map(|(candidate, _)| candidate).collect()
    }

    /// Draws a registered element uniformly at random, skipping any element
    /// equal to one in `excluded`.
    ///
    /// When the map was built with a seed the draw is reproducible: eligible
    /// elements are first ordered by a fixed-key hash of their values, so
    /// registry order does not affect the result.
    ///
    /// # Errors
    /// Returns [`DistanceMapError::NoEligibleCandidates`] when the exclusions
    /// leave nothing to draw from, including when the map is empty.
    #[instrument(
        name = "distmemo.random_element",
        level = "debug",
        err,
        skip(self, excluded),
        fields(candidates = self.len(), excluded = excluded.len()),
    )]
    pub fn random_element(&mut self, excluded: &[Arc<T>]) -> Result<Arc<T>> {
        let mut eligible: Vec<&Arc<T>> = self
            .rows
            .keys()
            .filter(|candidate| !excluded.contains(*candidate))
            .collect();
        if self.seeded {
            eligible.sort_by_cached_key(|candidate| stable_key(&***candidate));
        }
        eligible
            .choose(&mut self.rng)
            .map(|&chosen| Arc::clone(chosen))
            .ok_or(DistanceMapError::NoEligibleCandidates {
                registered: self.rows.len(),
                excluded: excluded.len(),
            })
    }
}

/// Number of ranked elements kept for `count` candidates at `ratio`.
fn close_count(count: usize, ratio: f64) -> usize {
    // Float-to-int `as` saturates: negative and NaN products become zero.
    let share = (count as f64 * ratio).floor() as usize;
    share.max(count.min(2)).min(count)
}

/// Hash of `value` under fixed SipHash keys, identical across map instances.
///
/// Values whose keys collide keep their registry order.
fn stable_key<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Orders two distances by the integer part of their difference.
///
/// Not transitive: 0.0 ~ 0.6 and 0.6 ~ 1.2 but 0.0 < 1.2. NaN on either side
/// saturates to zero and compares equal.
fn truncated_cmp(left: f64, right: f64) -> Ordering {
    ((left - right) as i64).cmp(&0)
}

/// Stable insertion sort that tolerates comparators which are not a total
/// order. `slice::sort_by` may panic on such comparators.
fn insertion_sort_by<E, F>(items: &mut [E], mut compare: F)
where
    F: FnMut(&E, &E) -> Ordering,
{
    for unsorted in 1..items.len() {
        let mut index = unsorted;
        while index > 0 && compare(&items[index - 1], &items[index]) == Ordering::Greater {
            items.swap(index - 1, index);
            index -= 1;
        }
    }
}
