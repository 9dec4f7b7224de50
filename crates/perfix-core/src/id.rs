//! Strongly-typed tick identifiers.

use std::fmt;

/// Monotonically increasing tick counter value.
///
/// Advanced exactly once per simulation tick by the host integration and
/// never reset for the lifetime of a profiler context. Throttle decisions
/// are pure functions of this value and the cached settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl TickId {
    /// The tick following this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Number of ticks elapsed since `earlier`, saturating at zero.
    pub fn since(self, earlier: TickId) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
