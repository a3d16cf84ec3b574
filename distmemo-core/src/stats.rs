//! Lookup counters kept by every [`crate::DistanceMap`].
//!
//! When the `metrics` feature is enabled the same events are forwarded to the
//! global recorder as:
//!
//! - `distmemo_cache_hits` (counter)
//! - `distmemo_cache_misses` (counter)
//! - `distmemo_cache_bypasses` (counter)
//! - `distmemo_cache_purged_entries` (counter)
//!
//! These metric names are stable for downstream crates.

/// Snapshot of the lookup counters accumulated by a [`crate::DistanceMap`].
///
/// # Examples
/// ```
/// use distmemo_core::CacheStats;
///
/// let stats = CacheStats::default();
/// assert_eq!(stats.lookups(), 0);
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheStats {
    hits: u64,
    misses: u64,
    bypasses: u64,
}

impl CacheStats {
    /// Lookups answered from the cache.
    #[must_use]
    pub const fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that computed a distance and stored it.
    #[must_use]
    pub const fn misses(&self) -> u64 {
        self.misses
    }

    /// Lookups that computed a distance without touching the cache.
    #[must_use]
    pub const fn bypasses(&self) -> u64 {
        self.bypasses
    }

    /// Number of underlying distance computations issued by lookups.
    #[must_use]
    pub const fn computations(&self) -> u64 {
        self.misses + self.bypasses
    }

    /// Total lookups observed.
    #[must_use]
    pub const fn lookups(&self) -> u64 {
        self.hits + self.misses + self.bypasses
    }

    pub(crate) fn record_hit(&mut self) {
        self.hits += 1;
        emit("distmemo_cache_hits", 1);
    }

    pub(crate) fn record_miss(&mut self) {
        self.misses += 1;
        emit("distmemo_cache_misses", 1);
    }

    pub(crate) fn record_bypass(&mut self) {
        self.bypasses += 1;
        emit("distmemo_cache_bypasses", 1);
    }

    pub(crate) fn record_purge(entries: usize) {
        if entries > 0 {
            emit(
                "distmemo_cache_purged_entries",
                u64::try_from(entries).unwrap_or(u64::MAX),
            );
        }
    }
}

#[cfg(feature = "metrics")]
fn emit(name: &'static str, value: u64) {
    metrics::counter!(name).increment(value);
}

#[cfg(not(feature = "metrics"))]
fn emit(_name: &'static str, _value: u64) {}
