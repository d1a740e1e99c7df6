//! Black-hole sink that keeps measured values observable.

use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};

/// A consumer that treats every value it receives as escaped.
///
/// Implementations must be safe to call from several threads at once.
pub trait Sink: Sync {
    fn consume<T: Send + 'static>(&self, value: T);
}

/// Default sink: routes values through [`black_box`] and counts them.
#[derive(Debug, Default)]
pub struct Blackhole {
    consumed: AtomicU64,
}

impl Blackhole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of values consumed so far.
    #[must_use]
    pub fn consumed(&self) -> u64 {
        self.consumed.load(Ordering::Relaxed)
    }
}

impl Sink for Blackhole {
    #[inline]
    fn consume<T: Send + 'static>(&self, value: T) {
        drop(black_box(value));
        self.consumed.fetch_add(1, Ordering::Relaxed);
    }
}
