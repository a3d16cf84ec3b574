//! distmemo core library.
//!
//! A memoizing cache for pairwise distances between elements whose distance
//! computation is expensive. [`DistanceMap`] keeps a registry of elements,
//! computes each pair at most once and fills both directions of the pair in
//! one step. Nearest-neighbour, mutual-neighbour, ranking and sampling
//! queries are layered on the same cache.
//!
//! Behaviour is tuned through [`DistanceMapBuilder`]:
//!
//! - [`LookupPolicy`] decides when lookups consult the cache and whether an
//!   unknown second argument is registered on demand.
//! - [`CloseOrdering`] picks between the truncated-difference ranking and a
//!   strict floating-point ranking for [`DistanceMap::close_elements`].
//!
//! # Features
//!
//! - `metrics`: forwards the [`CacheStats`] events to the `metrics` facade.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod error;
mod map;
mod measurable;
mod stats;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{CloseOrdering, DistanceMapBuilder, LookupPolicy},
    error::{DistanceMapError, DistanceMapErrorCode, Result},
    map::DistanceMap,
    measurable::Measurable,
    stats::CacheStats,
};
