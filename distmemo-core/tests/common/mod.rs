#![allow(dead_code, reason = "each integration test uses a subset of the helpers")]
//! Elements shared by the distmemo-core integration tests.

use std::{
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use distmemo_core::Measurable;

/// Planar point with a shared counter of Euclidean distance computations.
#[derive(Clone, Debug)]
pub struct Point {
    label: &'static str,
    x: i64,
    y: i64,
    calls: Arc<AtomicUsize>,
}

impl Point {
    #[must_use]
    pub fn shared(label: &'static str, x: i64, y: i64, calls: &Arc<AtomicUsize>) -> Arc<Self> {
        Arc::new(Self {
            label,
            x,
            y,
            calls: Arc::clone(calls),
        })
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        (self.label, self.x, self.y) == (other.label, other.x, other.y)
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.label, self.x, self.y).hash(state);
    }
}

impl Measurable for Point {
    fn distance_to(&self, other: &Self) -> f64 {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        dx.hypot(dy)
    }
}

/// Three sites with a fixed distance table: d(A,B)=1, d(A,C)=5, d(B,C)=5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Site {
    A,
    B,
    C,
}

impl Measurable for Site {
    fn distance_to(&self, other: &Self) -> f64 {
        let pair = if self <= other {
            (*self, *other)
        } else {
            (*other, *self)
        };
        match pair {
            (Self::A, Self::B) => 1.0,
            (Self::A, Self::C) | (Self::B, Self::C) => 5.0,
            _ => 0.0,
        }
    }
}

/// Sensor reading whose distance degrades to infinity or NaN for faulty
/// readings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reading {
    At(u32),
    Unreachable,
    Corrupt,
}

impl Measurable for Reading {
    fn distance_to(&self, other: &Self) -> f64 {
        match (self, other) {
            (Self::At(left), Self::At(right)) => f64::from(left.abs_diff(*right)),
            (Self::Corrupt, _) | (_, Self::Corrupt) => f64::NAN,
            _ => f64::INFINITY,
        }
    }
}

#[must_use]
pub fn counter() -> Arc<AtomicUsize> {
    Arc::new(AtomicUsize::new(0))
}

#[must_use]
pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::Relaxed)
}

#[must_use]
pub fn labels(points: &[Arc<Point>]) -> Vec<&'static str> {
    points.iter().map(|point| point.label()).collect()
}
