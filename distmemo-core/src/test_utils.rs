//! Shared test utilities for `distmemo-core`.

use std::{
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use distmemo_test_support::proptest_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::measurable::Measurable;

/// Builds a standard proptest configuration from the shared run profile.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        ..ProptestConfig::default()
    }
}

/// Planar point that counts how often its Euclidean distance is computed.
///
/// Equality and hashing cover `id` and the coordinates; the counter is
/// shared by every probe built from the same `calls` handle.
#[derive(Clone, Debug)]
pub(crate) struct CountingProbe {
    id: usize,
    x: i64,
    y: i64,
    calls: Arc<AtomicUsize>,
}

impl CountingProbe {
    pub(crate) fn new(id: usize, x: i64, y: i64, calls: &Arc<AtomicUsize>) -> Self {
        Self {
            id,
            x,
            y,
            calls: Arc::clone(calls),
        }
    }

    /// Convenience wrapper returning the probe behind a fresh `Arc`.
    pub(crate) fn shared(id: usize, x: i64, y: i64, calls: &Arc<AtomicUsize>) -> Arc<Self> {
        Arc::new(Self::new(id, x, y, calls))
    }
}

impl PartialEq for CountingProbe {
    fn eq(&self, other: &Self) -> bool {
        (self.id, self.x, self.y) == (other.id, other.x, other.y)
    }
}

impl Eq for CountingProbe {}

impl Hash for CountingProbe {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.id, self.x, self.y).hash(state);
    }
}

impl Measurable for CountingProbe {
    fn distance_to(&self, other: &Self) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

/// Reads the shared distance counter.
pub(crate) fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::Relaxed)
}
