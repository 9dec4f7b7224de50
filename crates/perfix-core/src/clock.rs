//! Monotonic time source abstraction.

use std::rc::Rc;
use std::time::{Duration, Instant};

/// A monotonic clock.
///
/// The frame clock and the timing aggregator read time only through this
/// trait so that tests can drive them with a manually advanced clock.
/// Implementations must never go backwards.
pub trait MonotonicClock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// [`MonotonicClock`] backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl MonotonicClock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for Rc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

impl<T: MonotonicClock + ?Sized> MonotonicClock for Box<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Milliseconds elapsed from `start` to `end`, clamped at zero.
#[inline]
pub fn elapsed_ms(start: Instant, end: Instant) -> f64 {
    end.saturating_duration_since(start).as_secs_f64() * 1000.0
}

/// Convert milliseconds to a [`Duration`], treating negatives and NaN as
/// zero and saturating on overflow.
pub fn ms_to_duration(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}
