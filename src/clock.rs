//! Clock Module
//!
//! Monotonic seconds sources used by the cache to stamp and check expiry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

// == Clock Trait ==
/// A monotonic source of seconds.
///
/// Only differences between readings matter, so the epoch is arbitrary.
pub trait Clock {
    /// Returns the current time in seconds.
    fn now(&self) -> f64;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

// == System Clock ==
/// Wall-independent clock counting seconds since its creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

// == Manual Clock ==
/// Clock that only moves when told to.
///
/// Clones share the same reading, so a test can keep one handle and give
/// another to the store under test.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    /// Current reading, stored as `f64` bits
    seconds: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock reading zero seconds.
    pub fn new() -> Self {
        Self::starting_at(0.0)
    }

    /// Creates a clock with an initial reading.
    pub fn starting_at(seconds: f64) -> Self {
        Self {
            seconds: Arc::new(AtomicU64::new(seconds.to_bits())),
        }
    }

    /// Moves the clock forward. Negative or non-finite steps are ignored.
    pub fn advance(&self, seconds: f64) {
        if !seconds.is_finite() || seconds <= 0.0 {
            return;
        }
        let next = self.now() + seconds;
        self.seconds.store(next.to_bits(), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        f64::from_bits(self.seconds.load(Ordering::SeqCst))
    }
}
